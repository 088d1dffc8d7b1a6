use glam::Vec2;
use std::fmt;

/// Identifier for a node in a [`crate::tree::Tree`].
///
/// This is an index into `Tree::nodes`. Ids are handed out in creation
/// order and stay valid for the lifetime of the tree, since nodes are
/// never removed.
pub type NodeId = usize;

/// Index of a point inside a [`crate::dataset::PointSet`].
pub type PointIndex = u32;

/// Axis a decision node splits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    X,
    Y,
}

impl Feature {
    /// Search order used by the best-split scan.
    pub const ALL: [Feature; 2] = [Feature::X, Feature::Y];

    #[inline]
    pub fn value(self, pos: Vec2) -> f32 {
        match self {
            Feature::X => pos.x,
            Feature::Y => pos.y,
        }
    }

    /// Picks the component of a per-axis scale factor matching this feature.
    #[inline]
    pub fn scale_of(self, scale: Vec2) -> f32 {
        self.value(scale)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::X => f.write_str("x"),
            Feature::Y => f.write_str("y"),
        }
    }
}

/// Binary class label of a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Zero,
    One,
}

impl Label {
    #[inline]
    pub fn is_one(self) -> bool {
        matches!(self, Label::One)
    }

    #[inline]
    pub fn from_bool(one: bool) -> Self {
        if one { Label::One } else { Label::Zero }
    }
}
