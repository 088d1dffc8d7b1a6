use crate::{
    config::Config,
    dataset::PointSet,
    split::{self, LabelCounts, SplitCandidate},
    types::{Feature, NodeId, PointIndex},
};
use glam::Vec2;
use thiserror::Error;
use tracing::debug;

/// Decision attached to an internal node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRule {
    pub feature: Feature,
    pub threshold: f32,
    pub gain: f32,
    pub left: NodeId,
    pub right: NodeId,
}

#[derive(Clone, Debug)]
pub struct TreeNode {
    pub id: NodeId,
    /// Drawing position in viewport coordinates.
    pub pos: Vec2,
    pub depth: u32,
    /// Indices into the session's [`PointSet`] that fall into this node.
    pub points: Vec<PointIndex>,
    /// Fraction of class-one points, `0.5` when `points` is empty.
    pub prediction: f32,
    /// `Some` once the node has been split; never cleared afterwards.
    pub split: Option<SplitRule>,
    /// Set on a leaf that admits no split at all; it is never offered again.
    pub settled: bool,
    /// Best gain of a split rejected for falling below `min_gain`. The leaf
    /// is offered again once `min_gain` drops to this value.
    pub rejected_gain: Option<f32>,
}

#[derive(Debug)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Where children are placed relative to their parent.
///
/// Children sit `base_spread / (depth + 1)` left and right of the parent
/// and `level_spacing` below it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildLayout {
    pub base_spread: f32,
    pub level_spacing: f32,
}

impl ChildLayout {
    pub fn for_viewport(viewport: Vec2, cfg: &Config) -> Self {
        Self {
            base_spread: viewport.x * cfg.base_spread_frac,
            level_spacing: viewport.y * cfg.level_spacing_frac,
        }
    }

    fn children_of(&self, parent: Vec2, depth: u32) -> (Vec2, Vec2) {
        let offset = self.base_spread / (depth + 1) as f32;
        let y = parent.y + self.level_spacing;
        (
            Vec2::new(parent.x - offset, y),
            Vec2::new(parent.x + offset, y),
        )
    }
}

/// Why a split request was refused.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SplitRejection {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} is already split")]
    NotALeaf(NodeId),

    #[error("node {0} was settled by an earlier rejected split")]
    Settled(NodeId),

    #[error("node {node} holds {count} points, fewer than {min}")]
    TooFewPoints {
        node: NodeId,
        count: usize,
        min: usize,
    },

    #[error("node {node} is at depth {depth}, limit is {max_depth}")]
    TooDeep {
        node: NodeId,
        depth: u32,
        max_depth: u32,
    },

    #[error("node {0} has no threshold that leaves both sides non-empty")]
    NoCandidate(NodeId),

    #[error("best gain {gain:.4} on node {node} is below {min_gain}")]
    GainBelowThreshold {
        node: NodeId,
        gain: f32,
        min_gain: f32,
    },
}

impl SplitRejection {
    /// Rejections that depend only on the node's data and cannot change
    /// without new points. A low gain is not one of them: it is judged
    /// against the current `min_gain`.
    pub fn is_permanent(&self) -> bool {
        matches!(self, SplitRejection::NoCandidate(_))
    }
}

/// A fully evaluated split, ready to be committed with [`Tree::apply_split`].
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPlan {
    pub node: NodeId,
    pub candidate: SplitCandidate,
    pub left_points: Vec<PointIndex>,
    pub right_points: Vec<PointIndex>,
    pub left_pos: Vec2,
    pub right_pos: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SplitOutcome {
    Applied {
        node: NodeId,
        left: NodeId,
        right: NodeId,
        feature: Feature,
        threshold: f32,
        gain: f32,
    },
    Rejected(SplitRejection),
}

impl SplitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SplitOutcome::Applied { .. })
    }
}

impl TreeNode {
    pub fn new_root(pos: Vec2, points: &PointSet) -> Self {
        let indices = points.all_indices();
        let prediction = LabelCounts::of(points, &indices).prediction();
        Self {
            id: 0,
            pos,
            depth: 0,
            points: indices,
            prediction,
            split: None,
            settled: false,
            rejected_gain: None,
        }
    }

    fn new_child(
        id: NodeId,
        pos: Vec2,
        depth: u32,
        points: Vec<PointIndex>,
        counts: LabelCounts,
    ) -> Self {
        Self {
            id,
            pos,
            depth,
            points,
            prediction: counts.prediction(),
            split: None,
            settled: false,
            rejected_gain: None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    /// Whether the node has been split.
    #[inline]
    pub fn grown(&self) -> bool {
        self.split.is_some()
    }

    pub fn split_feature(&self) -> Option<Feature> {
        self.split.map(|s| s.feature)
    }

    pub fn split_value(&self) -> Option<f32> {
        self.split.map(|s| s.threshold)
    }

    pub fn left_child(&self) -> Option<NodeId> {
        self.split.map(|s| s.left)
    }

    pub fn right_child(&self) -> Option<NodeId> {
        self.split.map(|s| s.right)
    }

    /// Gini impurity of the node's points.
    pub fn impurity(&self, points: &PointSet) -> f32 {
        split::gini(points, &self.points)
    }
}

impl Tree {
    pub fn new(root_pos: Vec2, points: &PointSet) -> Self {
        Self {
            nodes: vec![TreeNode::new_root(root_pos, points)],
        }
    }

    /// Id the next created node will receive.
    #[inline]
    pub fn next_id(&self) -> NodeId {
        self.nodes.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Checks the structural preconditions for splitting `id`.
    pub fn check_eligible(&self, id: NodeId, cfg: &Config) -> Result<&TreeNode, SplitRejection> {
        let node = self.node(id).ok_or(SplitRejection::UnknownNode(id))?;
        if !node.is_leaf() {
            return Err(SplitRejection::NotALeaf(id));
        }
        if node.settled {
            return Err(SplitRejection::Settled(id));
        }
        if let Some(gain) = node.rejected_gain
            && gain < cfg.min_gain
        {
            return Err(SplitRejection::GainBelowThreshold {
                node: id,
                gain,
                min_gain: cfg.min_gain,
            });
        }
        if node.points.len() < cfg.min_points_to_split {
            return Err(SplitRejection::TooFewPoints {
                node: id,
                count: node.points.len(),
                min: cfg.min_points_to_split,
            });
        }
        if node.depth >= cfg.max_depth {
            return Err(SplitRejection::TooDeep {
                node: id,
                depth: node.depth,
                max_depth: cfg.max_depth,
            });
        }
        Ok(node)
    }

    pub fn eligible_leaves<'a>(&'a self, cfg: &'a Config) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .filter(move |n| self.check_eligible(n.id, cfg).is_ok())
            .map(|n| n.id)
    }

    /// Picks the eligible leaf with the highest impurity.
    ///
    /// Ties go to the earliest created node.
    pub fn select_leaf(&self, points: &PointSet, cfg: &Config) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for id in self.eligible_leaves(cfg) {
            let impurity = self.nodes[id].impurity(points);
            if best.is_none_or(|(_, b)| impurity > b) {
                best = Some((id, impurity));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Evaluates the best split of `id` without touching the tree.
    pub fn plan_split(
        &self,
        id: NodeId,
        points: &PointSet,
        cfg: &Config,
        layout: &ChildLayout,
    ) -> Result<SplitPlan, SplitRejection> {
        let node = self.check_eligible(id, cfg)?;

        let candidate =
            split::find_best_split(points, &node.points).ok_or(SplitRejection::NoCandidate(id))?;
        if candidate.gain < cfg.min_gain {
            return Err(SplitRejection::GainBelowThreshold {
                node: id,
                gain: candidate.gain,
                min_gain: cfg.min_gain,
            });
        }

        let (left_points, right_points) =
            split::partition(points, &node.points, candidate.feature, candidate.threshold);
        let (left_pos, right_pos) = layout.children_of(node.pos, node.depth);

        Ok(SplitPlan {
            node: id,
            candidate,
            left_points,
            right_points,
            left_pos,
            right_pos,
        })
    }

    /// Commits a plan produced by [`Tree::plan_split`] on this tree.
    ///
    /// Returns the ids of the new left and right children. The planned node
    /// must still be an unsplit leaf; a plan that was already applied is
    /// refused.
    pub fn apply_split(&mut self, plan: SplitPlan) -> Result<(NodeId, NodeId), SplitRejection> {
        let target = self
            .node(plan.node)
            .ok_or(SplitRejection::UnknownNode(plan.node))?;
        if !target.is_leaf() {
            return Err(SplitRejection::NotALeaf(plan.node));
        }
        let depth = target.depth + 1;

        let SplitPlan {
            node,
            candidate,
            left_points,
            right_points,
            left_pos,
            right_pos,
        } = plan;

        let left = self.next_id();
        let right = left + 1;

        self.nodes.push(TreeNode::new_child(
            left,
            left_pos,
            depth,
            left_points,
            candidate.left,
        ));
        self.nodes.push(TreeNode::new_child(
            right,
            right_pos,
            depth,
            right_points,
            candidate.right,
        ));

        self.nodes[node].split = Some(SplitRule {
            feature: candidate.feature,
            threshold: candidate.threshold,
            gain: candidate.gain,
            left,
            right,
        });
        self.nodes[node].rejected_gain = None;

        Ok((left, right))
    }

    /// Remembers the gain of a split refused for being too small.
    fn reject_gain(&mut self, id: NodeId, gain: f32) {
        if let Some(node) = self.nodes.get_mut(id)
            && node.is_leaf()
        {
            node.rejected_gain = Some(gain);
        }
    }

    /// Marks a leaf as permanently unsplittable.
    pub fn settle(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id)
            && node.is_leaf()
        {
            node.settled = true;
        }
    }

    /// Plans and applies the best split of `id`.
    ///
    /// A leaf whose data admits no split is settled, so later selections
    /// skip it. A leaf whose best split gains too little is skipped until
    /// `min_gain` is lowered far enough.
    pub fn try_split(
        &mut self,
        id: NodeId,
        points: &PointSet,
        cfg: &Config,
        layout: &ChildLayout,
    ) -> SplitOutcome {
        let applied = self.plan_split(id, points, cfg, layout).and_then(|plan| {
            let candidate = plan.candidate;
            self.apply_split(plan).map(|children| (candidate, children))
        });
        match applied {
            Ok((candidate, (left, right))) => {
                let SplitCandidate {
                    feature,
                    threshold,
                    gain,
                    ..
                } = candidate;
                debug!(node = id, %feature, threshold, gain, left, right, "split applied");
                SplitOutcome::Applied {
                    node: id,
                    left,
                    right,
                    feature,
                    threshold,
                    gain,
                }
            }
            Err(reason) => {
                if reason.is_permanent() {
                    self.settle(id);
                } else if let SplitRejection::GainBelowThreshold { gain, .. } = reason {
                    self.reject_gain(id, gain);
                }
                debug!(node = id, %reason, "split rejected");
                SplitOutcome::Rejected(reason)
            }
        }
    }

    /// Scales node positions and split thresholds by `scale`.
    ///
    /// Each threshold is scaled by the factor of its own axis, so every
    /// point keeps its side of every split.
    pub fn rescale(&mut self, scale: Vec2) {
        for node in &mut self.nodes {
            node.pos *= scale;
            if let Some(rule) = node.split.as_mut() {
                rule.threshold *= rule.feature.scale_of(scale);
            }
        }
    }

    /// Leaf id holding each point, indexed by point.
    pub fn leaf_assignment(&self, point_count: usize) -> Vec<Option<NodeId>> {
        let mut owner = vec![None; point_count];
        for leaf in self.leaves() {
            for &p in &leaf.points {
                if let Some(slot) = owner.get_mut(p as usize) {
                    *slot = Some(leaf.id);
                }
            }
        }
        owner
    }

    /// Leaf holding point `idx`, found by following the split rules.
    pub fn leaf_for(&self, points: &PointSet, idx: PointIndex) -> Option<NodeId> {
        if (idx as usize) >= points.len() {
            return None;
        }
        self.leaf_at(points.get(idx).pos)
    }

    /// Leaf whose region contains `pos`.
    pub fn leaf_at(&self, pos: Vec2) -> Option<NodeId> {
        let mut id = 0;
        loop {
            let node = self.node(id)?;
            match node.split {
                None => return Some(id),
                Some(rule) if rule.feature.value(pos) <= rule.threshold => id = rule.left,
                Some(rule) => id = rule.right,
            }
        }
    }

    /// Class-one probability the tree assigns to `pos`.
    pub fn predict(&self, pos: Vec2) -> f32 {
        self.leaf_at(pos)
            .map(|id| self.nodes[id].prediction)
            .unwrap_or(0.5)
    }

    /// Multi-line outline of the tree, one node per line, indented by depth.
    pub fn outline(&self, points: &PointSet) -> String {
        let mut out = String::new();
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            let indent = "  ".repeat(node.depth as usize);
            let line = match node.split {
                Some(rule) => {
                    stack.push(rule.right);
                    stack.push(rule.left);
                    format!(
                        "{indent}#{id} {} <= {:.1} gain={:.3} n={} gini={:.3}",
                        rule.feature,
                        rule.threshold,
                        rule.gain,
                        node.points.len(),
                        node.impurity(points),
                    )
                }
                None => format!(
                    "{indent}#{id} leaf p1={:.2} n={}{}",
                    node.prediction,
                    node.points.len(),
                    if node.settled { " settled" } else { "" },
                ),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Fraction of points whose leaf majority matches their label.
    pub fn training_accuracy(&self, points: &PointSet) -> f32 {
        if points.is_empty() {
            return 0.0;
        }
        let correct = self
            .leaves()
            .flat_map(|leaf| {
                let majority_one = leaf.prediction > 0.5;
                leaf.points
                    .iter()
                    .filter(move |&&p| points.get(p).label.is_one() == majority_one)
            })
            .count();
        correct as f32 / points.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ChildLayout {
        ChildLayout {
            base_spread: 120.0,
            level_spacing: 50.0,
        }
    }

    /// Ten points on the left labelled 1, ten on the right labelled 0.
    fn separable_set() -> PointSet {
        let mut triples = Vec::new();
        for i in 0..10 {
            triples.push((10.0 + i as f32, 10.0 + i as f32, 1));
            triples.push((100.0 + i as f32, 10.0 + i as f32, 0));
        }
        PointSet::from_triples(&triples)
    }

    #[test]
    fn new_tree_has_single_root_leaf_with_all_points() {
        let points = separable_set();
        let tree = Tree::new(Vec2::new(50.0, 5.0), &points);

        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.next_id(), 1);
        let root = &tree.nodes[0];
        assert!(root.is_leaf());
        assert!(!root.grown());
        assert_eq!(root.points.len(), 20);
        assert_eq!(root.prediction, 0.5);
        assert_eq!(root.split_feature(), None);
        assert_eq!(root.left_child(), None);
    }

    #[test]
    fn try_split_creates_two_pure_children() {
        let points = separable_set();
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::new(200.0, 20.0), &points);

        let outcome = tree.try_split(0, &points, &cfg, &layout());
        let SplitOutcome::Applied {
            left,
            right,
            feature,
            gain,
            ..
        } = outcome
        else {
            panic!("expected split, got {:?}", outcome);
        };

        assert_eq!((left, right), (1, 2));
        assert_eq!(feature, Feature::X);
        assert_eq!(gain, 0.5);

        let root = &tree.nodes[0];
        assert!(root.grown());
        assert_eq!(root.left_child(), Some(1));
        assert_eq!(root.right_child(), Some(2));

        let (l, r) = (&tree.nodes[left], &tree.nodes[right]);
        assert_eq!((l.depth, r.depth), (1, 1));
        assert_eq!(l.prediction, 1.0);
        assert_eq!(r.prediction, 0.0);
        assert_eq!(l.points.len() + r.points.len(), 20);

        // offset = 120 / (0 + 1), one level of 50 below.
        assert_eq!(l.pos, Vec2::new(80.0, 70.0));
        assert_eq!(r.pos, Vec2::new(320.0, 70.0));
    }

    #[test]
    fn pure_leaf_remembers_rejected_gain_and_is_not_retried() {
        let points = PointSet::from_triples(&(0..12).map(|i| (i as f32, 0.0, 1)).collect::<Vec<_>>());
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::ZERO, &points);

        let outcome = tree.try_split(0, &points, &cfg, &layout());
        assert!(matches!(
            outcome,
            SplitOutcome::Rejected(SplitRejection::GainBelowThreshold { node: 0, .. })
        ));
        assert!(tree.nodes[0].is_leaf());
        assert!(!tree.nodes[0].grown());
        assert!(!tree.nodes[0].settled);
        assert_eq!(tree.nodes[0].rejected_gain, Some(0.0));
        assert_eq!(tree.select_leaf(&points, &cfg), None);

        assert_eq!(
            tree.try_split(0, &points, &cfg, &layout()),
            SplitOutcome::Rejected(SplitRejection::GainBelowThreshold {
                node: 0,
                gain: 0.0,
                min_gain: cfg.min_gain,
            })
        );
    }

    #[test]
    fn leaf_without_any_threshold_is_settled() {
        let points = PointSet::from_triples(&(0..12).map(|i| (5.0, 5.0, (i % 2) as u8)).collect::<Vec<_>>());
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::ZERO, &points);

        assert_eq!(
            tree.try_split(0, &points, &cfg, &layout()),
            SplitOutcome::Rejected(SplitRejection::NoCandidate(0))
        );
        assert!(tree.nodes[0].settled);
        assert_eq!(
            tree.try_split(0, &points, &cfg, &layout()),
            SplitOutcome::Rejected(SplitRejection::Settled(0))
        );
    }

    /// Sixty points on a line with alternating labels; the best split
    /// peels off one end point and gains 1/118.
    fn weak_signal_set() -> PointSet {
        PointSet::from_triples(&(0..60).map(|i| (i as f32, 0.0, (i % 2) as u8)).collect::<Vec<_>>())
    }

    #[test]
    fn small_positive_gain_is_rejected() {
        let points = weak_signal_set();
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::ZERO, &points);

        let outcome = tree.try_split(0, &points, &cfg, &layout());
        let SplitOutcome::Rejected(SplitRejection::GainBelowThreshold { gain, .. }) = outcome else {
            panic!("expected low-gain rejection, got {:?}", outcome);
        };
        assert!(gain > 0.0 && gain < 0.01, "gain {gain}");
        assert!((gain - 1.0 / 118.0).abs() < 1e-5);
        assert_eq!(tree.nodes.len(), 1);
    }

    #[test]
    fn gain_equal_to_min_gain_is_accepted() {
        let points = weak_signal_set();
        let best = split::find_best_split(&points, &points.all_indices()).expect("candidate");

        let mut cfg = Config::default();
        cfg.min_gain = best.gain;
        let mut tree = Tree::new(Vec2::ZERO, &points);
        assert!(tree.try_split(0, &points, &cfg, &layout()).is_applied());

        cfg.min_gain = f32::from_bits(best.gain.to_bits() + 1);
        let mut tree = Tree::new(Vec2::ZERO, &points);
        assert!(matches!(
            tree.try_split(0, &points, &cfg, &layout()),
            SplitOutcome::Rejected(SplitRejection::GainBelowThreshold { .. })
        ));
    }

    #[test]
    fn low_gain_leaf_is_retried_after_min_gain_drops() {
        let points = weak_signal_set();
        let mut cfg = Config::default();
        let mut tree = Tree::new(Vec2::ZERO, &points);

        assert!(!tree.try_split(0, &points, &cfg, &layout()).is_applied());
        assert_eq!(tree.select_leaf(&points, &cfg), None);

        cfg.min_gain = 0.005;
        assert_eq!(tree.select_leaf(&points, &cfg), Some(0));
        assert!(tree.try_split(0, &points, &cfg, &layout()).is_applied());
        assert_eq!(tree.nodes[0].rejected_gain, None);
    }

    #[test]
    fn applying_a_plan_twice_is_refused() {
        let points = separable_set();
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::ZERO, &points);

        let plan = tree.plan_split(0, &points, &cfg, &layout()).expect("plan");
        assert_eq!(tree.apply_split(plan.clone()), Ok((1, 2)));
        assert_eq!(tree.apply_split(plan), Err(SplitRejection::NotALeaf(0)));

        assert_eq!(tree.nodes.len(), 3);
        let total: usize = tree.leaves().map(|l| l.points.len()).sum();
        assert_eq!(total, tree.nodes[0].points.len());
    }

    #[test]
    fn plan_for_missing_node_is_refused() {
        let points = separable_set();
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::ZERO, &points);

        let mut plan = tree.plan_split(0, &points, &cfg, &layout()).expect("plan");
        plan.node = 7;
        assert_eq!(tree.apply_split(plan), Err(SplitRejection::UnknownNode(7)));
        assert_eq!(tree.nodes.len(), 1);
    }

    #[test]
    fn small_or_deep_leaves_are_not_eligible() {
        let points = separable_set();
        let mut cfg = Config::default();
        cfg.min_points_to_split = 21;
        let tree = Tree::new(Vec2::ZERO, &points);
        assert!(matches!(
            tree.check_eligible(0, &cfg),
            Err(SplitRejection::TooFewPoints { count: 20, min: 21, .. })
        ));

        let mut cfg = Config::default();
        cfg.max_depth = 1;
        let mut tree = Tree::new(Vec2::ZERO, &points);
        assert!(tree.try_split(0, &points, &cfg, &layout()).is_applied());
        assert!(matches!(
            tree.check_eligible(1, &cfg),
            Err(SplitRejection::TooDeep { depth: 1, max_depth: 1, .. })
        ));
        assert_eq!(tree.select_leaf(&points, &cfg), None);
        assert_eq!(
            tree.check_eligible(0, &cfg).map(|n| n.id),
            Err(SplitRejection::NotALeaf(0))
        );
        assert_eq!(
            tree.check_eligible(9, &cfg).map(|n| n.id),
            Err(SplitRejection::UnknownNode(9))
        );
    }

    #[test]
    fn plan_split_does_not_mutate_tree() {
        let points = separable_set();
        let cfg = Config::default();
        let tree = Tree::new(Vec2::ZERO, &points);

        let plan = tree.plan_split(0, &points, &cfg, &layout()).expect("plan");
        assert_eq!(plan.candidate.feature, Feature::X);
        assert_eq!(plan.left_points.len(), 10);
        assert_eq!(tree.nodes.len(), 1);
        assert!(tree.nodes[0].is_leaf());
    }

    #[test]
    fn select_leaf_prefers_highest_impurity_then_lowest_id() {
        // Left cluster alternates labels, right cluster is all zeros.
        let mut triples = Vec::new();
        for i in 0..12 {
            triples.push((i as f32, 0.0, (i % 2) as u8));
            triples.push((100.0 + i as f32, 0.0, 0));
        }
        let points = PointSet::from_triples(&triples);
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::ZERO, &points);
        assert!(tree.try_split(0, &points, &cfg, &layout()).is_applied());
        assert_eq!(tree.nodes[0].split_value(), Some(55.5));
        assert!(tree.nodes[1].impurity(&points) > tree.nodes[2].impurity(&points));
        assert_eq!(tree.select_leaf(&points, &cfg), Some(1));

        // Both children pure: the first created wins.
        let uniform = separable_set();
        let mut tree = Tree::new(Vec2::ZERO, &uniform);
        assert!(tree.try_split(0, &uniform, &cfg, &layout()).is_applied());
        assert_eq!(tree.select_leaf(&uniform, &cfg), Some(1));
    }

    #[test]
    fn rescale_scales_positions_and_thresholds_per_axis() {
        let points = separable_set();
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::new(200.0, 20.0), &points);
        assert!(tree.try_split(0, &points, &cfg, &layout()).is_applied());
        let before = tree.nodes[0].split_value().expect("split");

        tree.rescale(Vec2::new(2.0, 0.5));

        assert_eq!(tree.nodes[0].pos, Vec2::new(400.0, 10.0));
        assert_eq!(tree.nodes[0].split_value(), Some(before * 2.0));
        assert_eq!(tree.nodes[1].pos, Vec2::new(160.0, 35.0));
    }

    #[test]
    fn leaf_lookup_agrees_with_membership() {
        let points = separable_set();
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::ZERO, &points);
        assert!(tree.try_split(0, &points, &cfg, &layout()).is_applied());

        let owners = tree.leaf_assignment(points.len());
        for (i, owner) in owners.iter().enumerate() {
            assert!(owner.is_some());
            assert_eq!(*owner, tree.leaf_for(&points, i as PointIndex));
        }
        assert_eq!(tree.leaf_for(&points, 999), None);
        assert_eq!(tree.predict(Vec2::new(0.0, 0.0)), 1.0);
        assert_eq!(tree.predict(Vec2::new(500.0, 0.0)), 0.0);
        assert_eq!(tree.training_accuracy(&points), 1.0);
    }

    #[test]
    fn outline_lists_nodes_depth_first() {
        let points = separable_set();
        let cfg = Config::default();
        let mut tree = Tree::new(Vec2::ZERO, &points);
        assert!(tree.try_split(0, &points, &cfg, &layout()).is_applied());

        let text = tree.outline(&points);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#0 x <= 59.5"), "{}", lines[0]);
        assert_eq!(lines[1], "  #1 leaf p1=1.00 n=10");
        assert_eq!(lines[2], "  #2 leaf p1=0.00 n=10");
    }
}
