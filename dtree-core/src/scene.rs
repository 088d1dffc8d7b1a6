use crate::{
    dataset::PointSet,
    render::{
        CLASS_ONE, CLASS_ZERO, NodeGlyph, NodeLabel, PointGlyph, RenderSurface, Rgb, SPLIT_NODE,
        Segment,
    },
    tree::Tree,
    types::Feature,
};
use glam::Vec2;

pub const LEAF_RADIUS: f32 = 8.0;
pub const SPLIT_RADIUS: f32 = 12.0;
/// Opacity of points that no leaf claims.
pub const UNASSIGNED_OPACITY: f32 = 0.7;
/// Labels are drawn this far above their node.
pub const LABEL_LIFT: f32 = 20.0;

/// Everything a surface needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub points: Vec<PointGlyph>,
    pub edges: Vec<Segment>,
    pub nodes: Vec<NodeGlyph>,
    pub boundaries: Vec<Segment>,
    pub labels: Vec<NodeLabel>,
}

/// Colour of the class a leaf predicts; ties fall to class zero.
#[inline]
pub fn majority_color(prediction: f32) -> Rgb {
    if prediction > 0.5 { CLASS_ONE } else { CLASS_ZERO }
}

/// Point opacity grows with the confidence of the owning leaf.
#[inline]
pub fn confidence_opacity(prediction: f32) -> f32 {
    0.4 + 0.6 * (prediction - 0.5).abs() * 2.0
}

fn label_color(one: bool) -> Rgb {
    if one { CLASS_ONE } else { CLASS_ZERO }
}

impl Scene {
    /// Projects the current tree and points into drawable geometry.
    ///
    /// Pure: calling it twice on the same state yields equal scenes.
    pub fn project(tree: &Tree, points: &PointSet, viewport: Vec2) -> Self {
        let owners = tree.leaf_assignment(points.len());

        let point_glyphs = points
            .points
            .iter()
            .zip(&owners)
            .map(|(p, owner)| match owner {
                Some(id) => {
                    let prediction = tree.nodes[*id].prediction;
                    PointGlyph {
                        pos: p.pos,
                        color: majority_color(prediction),
                        opacity: confidence_opacity(prediction),
                    }
                }
                None => PointGlyph {
                    pos: p.pos,
                    color: label_color(p.label.is_one()),
                    opacity: UNASSIGNED_OPACITY,
                },
            })
            .collect();

        let mut edges = Vec::with_capacity(tree.nodes.len());
        let mut boundaries = Vec::new();
        let mut labels = Vec::new();

        for node in &tree.nodes {
            let Some(rule) = node.split else {
                continue;
            };
            for child in [rule.left, rule.right] {
                if let Some(c) = tree.node(child) {
                    edges.push(Segment {
                        from: node.pos,
                        to: c.pos,
                    });
                }
            }

            let v = rule.threshold;
            boundaries.push(match rule.feature {
                Feature::X => Segment {
                    from: Vec2::new(v, 0.0),
                    to: Vec2::new(v, viewport.y),
                },
                Feature::Y => Segment {
                    from: Vec2::new(0.0, v),
                    to: Vec2::new(viewport.x, v),
                },
            });

            labels.push(NodeLabel {
                pos: node.pos - Vec2::new(0.0, LABEL_LIFT),
                text: format!("{} {:.0}", rule.feature, v),
            });
        }

        let nodes = tree
            .nodes
            .iter()
            .map(|n| NodeGlyph {
                pos: n.pos,
                radius: if n.is_leaf() { LEAF_RADIUS } else { SPLIT_RADIUS },
                fill: if n.is_leaf() {
                    majority_color(n.prediction)
                } else {
                    SPLIT_NODE
                },
                stroke_opacity: if n.grown() { 1.0 } else { 0.5 },
            })
            .collect();

        Self {
            points: point_glyphs,
            edges,
            nodes,
            boundaries,
            labels,
        }
    }

    /// Draws the scene, back to front.
    pub fn render_to(&self, surface: &mut impl RenderSurface) {
        surface.draw_points(&self.points);
        surface.draw_split_boundaries(&self.boundaries);
        surface.draw_edges(&self.edges);
        surface.draw_nodes(&self.nodes);
        surface.draw_labels(&self.labels);
    }
}
