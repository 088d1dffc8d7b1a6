//! Gini impurity and exhaustive best-split search over the two axes.
//!
//! The search follows the textbook greedy rule: for each feature, every
//! midpoint between two adjacent distinct sorted values is a candidate
//! threshold; the candidate with the largest impurity decrease wins.
//! Ties keep the first candidate found, scanning `x` before `y` and
//! thresholds in ascending order.

use crate::dataset::PointSet;
use crate::types::{Feature, PointIndex};

/// Running class counts for a set of points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub total: usize,
    pub ones: usize,
}

impl LabelCounts {
    pub fn of(points: &PointSet, indices: &[PointIndex]) -> Self {
        let ones = indices
            .iter()
            .filter(|&&i| points.get(i).label.is_one())
            .count();
        Self {
            total: indices.len(),
            ones,
        }
    }

    #[inline]
    pub fn zeros(&self) -> usize {
        self.total - self.ones
    }

    /// Gini impurity `1 - (p1^2 + p0^2)`, zero for an empty set.
    #[inline]
    pub fn gini(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        let p1 = self.ones as f32 / self.total as f32;
        let p0 = 1.0 - p1;
        1.0 - (p1 * p1 + p0 * p0)
    }

    /// Fraction of class-one points, `0.5` for an empty set.
    #[inline]
    pub fn prediction(&self) -> f32 {
        if self.total == 0 {
            0.5
        } else {
            self.ones as f32 / self.total as f32
        }
    }
}

/// Gini impurity of the points at `indices`.
pub fn gini(points: &PointSet, indices: &[PointIndex]) -> f32 {
    LabelCounts::of(points, indices).gini()
}

/// Best threshold found for a point set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitCandidate {
    pub feature: Feature,
    pub threshold: f32,
    pub gain: f32,
    /// Counts of the `<= threshold` side.
    pub left: LabelCounts,
    /// Counts of the `> threshold` side.
    pub right: LabelCounts,
}

/// Searches both features for the threshold with maximum Gini gain.
///
/// Returns `None` when no threshold leaves both sides non-empty, which is
/// the case for fewer than two points or when every point shares the same
/// coordinates.
pub fn find_best_split(points: &PointSet, indices: &[PointIndex]) -> Option<SplitCandidate> {
    let parent = LabelCounts::of(points, indices);
    let parent_gini = parent.gini();
    let n = indices.len() as f32;

    let mut best: Option<SplitCandidate> = None;
    let mut sorted: Vec<(f32, bool)> = Vec::with_capacity(indices.len());

    for feature in Feature::ALL {
        sorted.clear();
        sorted.extend(indices.iter().map(|&i| {
            let p = points.get(i);
            (feature.value(p.pos), p.label.is_one())
        }));
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Prefix count of ones: ones_before[k] = ones among sorted[..k].
        let mut ones_before = Vec::with_capacity(sorted.len() + 1);
        ones_before.push(0usize);
        for &(_, one) in &sorted {
            let last = ones_before[ones_before.len() - 1];
            ones_before.push(last + usize::from(one));
        }

        for w in 1..sorted.len() {
            let (lo, hi) = (sorted[w - 1].0, sorted[w].0);
            if lo == hi {
                continue;
            }
            let threshold = (lo + hi) / 2.0;

            // The midpoint may round onto `hi` for adjacent floats, so count
            // `<= threshold` explicitly instead of assuming `w` elements.
            let split_at = sorted.partition_point(|&(v, _)| v <= threshold);
            if split_at == 0 || split_at == sorted.len() {
                continue;
            }

            let left = LabelCounts {
                total: split_at,
                ones: ones_before[split_at],
            };
            let right = LabelCounts {
                total: sorted.len() - split_at,
                ones: parent.ones - left.ones,
            };

            let weighted =
                (left.total as f32 * left.gini() + right.total as f32 * right.gini()) / n;
            let gain = parent_gini - weighted;

            if best.is_none_or(|b| gain > b.gain) {
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    gain,
                    left,
                    right,
                });
            }
        }
    }

    best
}

/// Splits `indices` into the `<= threshold` and `> threshold` sides,
/// keeping the original order on each side.
pub fn partition(
    points: &PointSet,
    indices: &[PointIndex],
    feature: Feature,
    threshold: f32,
) -> (Vec<PointIndex>, Vec<PointIndex>) {
    indices
        .iter()
        .copied()
        .partition(|&i| feature.value(points.get(i).pos) <= threshold)
}
