use crate::types::{Label, PointIndex};
use glam::Vec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub pos: Vec2,
    pub label: Label,
}

#[derive(Clone, Debug, Default)]
pub struct PointSet {
    pub points: Vec<Point>,
}

/// Number of points generated for a viewport: one per `area_per_point`
/// square pixels, rounded down.
pub fn point_count_for(viewport: Vec2, area_per_point: f32) -> usize {
    if !viewport.is_finite() || viewport.x <= 0.0 || viewport.y <= 0.0 {
        return 0;
    }
    (viewport.x * viewport.y / area_per_point).floor() as usize
}

/// Draws the label of a point at `pos` using the fixed quadrant rule.
///
/// Left half: mostly class 1 above 60% of the height, mostly class 0
/// below. Right half: mostly class 0 above 40%, mostly class 1 below.
pub fn sample_label(pos: Vec2, viewport: Vec2, rng: &mut impl Rng) -> Label {
    let p_one = if pos.x < viewport.x * 0.5 {
        if pos.y < viewport.y * 0.6 { 0.8 } else { 0.3 }
    } else if pos.y < viewport.y * 0.4 {
        0.2
    } else {
        0.9
    };
    Label::from_bool(rng.random_bool(p_one))
}

impl PointSet {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Builds a set from `(x, y, label)` triples, label `1` meaning class one.
    pub fn from_triples(triples: &[(f32, f32, u8)]) -> Self {
        let points = triples
            .iter()
            .map(|&(x, y, l)| Point {
                pos: Vec2::new(x, y),
                label: Label::from_bool(l == 1),
            })
            .collect();
        Self { points }
    }

    /// Generates a labelled cloud uniformly inside the central 80% x 80%
    /// of `viewport`.
    pub fn generate(viewport: Vec2, area_per_point: f32, rng: &mut impl Rng) -> Self {
        let count = point_count_for(viewport, area_per_point);
        let lo = viewport * 0.1;
        let hi = viewport * 0.9;

        let points = (0..count)
            .map(|_| {
                let x = rng.random_range(lo.x..hi.x);
                let y = rng.random_range(lo.y..hi.y);
                let pos = Vec2::new(x, y);
                Point {
                    pos,
                    label: sample_label(pos, viewport, &mut *rng),
                }
            })
            .collect();

        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: PointIndex) -> &Point {
        &self.points[idx as usize]
    }

    /// Every index of the set, in order. This is the root node's point list.
    pub fn all_indices(&self) -> Vec<PointIndex> {
        (0..self.points.len() as PointIndex).collect()
    }

    /// Scales every coordinate by the per-axis factor `scale`.
    pub fn rescale(&mut self, scale: Vec2) {
        for p in &mut self.points {
            p.pos *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn point_count_follows_viewport_area() {
        assert_eq!(point_count_for(Vec2::new(800.0, 600.0), 4000.0), 120);
        assert_eq!(point_count_for(Vec2::new(100.0, 39.0), 4000.0), 0);
        assert_eq!(point_count_for(Vec2::new(-1.0, 600.0), 4000.0), 0);
        assert_eq!(point_count_for(Vec2::new(f32::NAN, 600.0), 4000.0), 0);
    }

    #[test]
    fn generated_points_stay_in_central_region() {
        let viewport = Vec2::new(1000.0, 800.0);
        let mut rng = StdRng::seed_from_u64(7);
        let set = PointSet::generate(viewport, 4000.0, &mut rng);

        assert_eq!(set.len(), 200);
        for p in &set.points {
            assert!(p.pos.x >= 100.0 && p.pos.x < 900.0, "x out of range: {:?}", p);
            assert!(p.pos.y >= 80.0 && p.pos.y < 720.0, "y out of range: {:?}", p);
        }
    }

    #[test]
    fn same_seed_generates_same_cloud() {
        let viewport = Vec2::new(640.0, 480.0);
        let a = PointSet::generate(viewport, 4000.0, &mut StdRng::seed_from_u64(42));
        let b = PointSet::generate(viewport, 4000.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.points, b.points);
    }

    #[test]
    fn label_rule_favours_expected_class_per_region() {
        let viewport = Vec2::new(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(3);
        let regions = [
            (Vec2::new(10.0, 10.0), 0.8),
            (Vec2::new(10.0, 90.0), 0.3),
            (Vec2::new(90.0, 10.0), 0.2),
            (Vec2::new(90.0, 90.0), 0.9),
        ];

        for (pos, expected) in regions {
            let trials = 4000;
            let ones = (0..trials)
                .filter(|_| sample_label(pos, viewport, &mut rng).is_one())
                .count();
            let freq = ones as f64 / trials as f64;
            assert!(
                (freq - expected).abs() < 0.05,
                "region at {:?}: frequency {} far from {}",
                pos,
                freq,
                expected
            );
        }
    }

    #[test]
    fn rescale_scales_each_axis_independently() {
        let mut set = PointSet::from_triples(&[(10.0, 20.0, 1), (30.0, 40.0, 0)]);
        set.rescale(Vec2::new(2.0, 0.5));
        assert_eq!(set.points[0].pos, Vec2::new(20.0, 10.0));
        assert_eq!(set.points[1].pos, Vec2::new(60.0, 20.0));
        assert_eq!(set.points[1].label, Label::Zero);
    }
}
