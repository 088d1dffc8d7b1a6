//! Geometry handed to a drawing backend.
//!
//! The core never draws. Once per frame it passes the full current
//! geometry to a [`RenderSurface`]; backends replace what they drew
//! before rather than applying deltas.

use glam::Vec2;

/// Opaque sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Colour of points and leaves predicted as class zero.
pub const CLASS_ZERO: Rgb = Rgb::new(0xAA, 0x74, 0xE6);
/// Colour of points and leaves predicted as class one.
pub const CLASS_ONE: Rgb = Rgb::new(0x74, 0xE6, 0xAA);
/// Fill of internal nodes and colour of split boundaries.
pub const SPLIT_NODE: Rgb = Rgb::new(0xE6, 0xAA, 0x74);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointGlyph {
    pub pos: Vec2,
    pub color: Rgb,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGlyph {
    pub pos: Vec2,
    pub radius: f32,
    pub fill: Rgb,
    pub stroke_opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeLabel {
    pub pos: Vec2,
    pub text: String,
}

/// Drawing backend fed by [`crate::scene::Scene::render_to`].
pub trait RenderSurface {
    fn draw_points(&mut self, points: &[PointGlyph]);
    fn draw_edges(&mut self, edges: &[Segment]);
    fn draw_nodes(&mut self, nodes: &[NodeGlyph]);
    fn draw_split_boundaries(&mut self, lines: &[Segment]);

    fn draw_labels(&mut self, _labels: &[NodeLabel]) {}
}
