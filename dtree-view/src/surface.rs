//! egui backend for [`RenderSurface`].
//!
//! Simulation coordinates are viewport pixels with the origin at the
//! top-left corner, matching egui's screen space up to a translation.

use dtree_core::render::{NodeGlyph, NodeLabel, PointGlyph, RenderSurface, Rgb, Segment};
use glam::Vec2;

const POINT_RADIUS: f32 = 2.0;
const EDGE_OPACITY: f32 = 0.6;
const BOUNDARY_OPACITY: f32 = 0.7;
const NODE_STROKE_WIDTH: f32 = 2.0;
const DASH: f32 = 5.0;

pub fn color(rgb: Rgb, opacity: f32) -> egui::Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(rgb.r, rgb.g, rgb.b, alpha)
}

fn white(opacity: f32) -> egui::Color32 {
    color(Rgb::new(0xFF, 0xFF, 0xFF), opacity)
}

/// Paints scene layers into a rectangle of an egui [`egui::Painter`].
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    show_labels: bool,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter, rect: egui::Rect, show_labels: bool) -> Self {
        Self {
            painter,
            origin: rect.min,
            show_labels,
        }
    }

    /// Converts a simulation position to screen space.
    pub fn to_screen(&self, p: Vec2) -> egui::Pos2 {
        to_screen(self.origin, p)
    }
}

#[inline]
pub fn to_screen(origin: egui::Pos2, p: Vec2) -> egui::Pos2 {
    egui::pos2(origin.x + p.x, origin.y + p.y)
}

impl RenderSurface for PainterSurface<'_> {
    fn draw_points(&mut self, points: &[PointGlyph]) {
        for p in points {
            self.painter
                .circle_filled(self.to_screen(p.pos), POINT_RADIUS, color(p.color, p.opacity));
        }
    }

    fn draw_edges(&mut self, edges: &[Segment]) {
        let stroke = egui::Stroke::new(1.0, white(EDGE_OPACITY));
        for e in edges {
            self.painter
                .line_segment([self.to_screen(e.from), self.to_screen(e.to)], stroke);
        }
    }

    fn draw_nodes(&mut self, nodes: &[NodeGlyph]) {
        for n in nodes {
            // The whole glyph fades with the stroke opacity.
            self.painter.circle(
                self.to_screen(n.pos),
                n.radius,
                color(n.fill, n.stroke_opacity),
                egui::Stroke::new(NODE_STROKE_WIDTH, white(n.stroke_opacity)),
            );
        }
    }

    fn draw_split_boundaries(&mut self, lines: &[Segment]) {
        let stroke = egui::Stroke::new(
            2.0,
            color(dtree_core::render::SPLIT_NODE, BOUNDARY_OPACITY),
        );
        for l in lines {
            let path = [self.to_screen(l.from), self.to_screen(l.to)];
            self.painter
                .extend(egui::Shape::dashed_line(&path, stroke, DASH, DASH));
        }
    }

    fn draw_labels(&mut self, labels: &[NodeLabel]) {
        if !self.show_labels {
            return;
        }
        for l in labels {
            self.painter.text(
                self.to_screen(l.pos),
                egui::Align2::CENTER_CENTER,
                &l.text,
                egui::FontId::monospace(12.0),
                egui::Color32::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_screen_offsets_by_rect_origin() {
        let origin = egui::pos2(10.0, 30.0);
        assert_eq!(to_screen(origin, Vec2::new(5.0, 7.0)), egui::pos2(15.0, 37.0));
    }

    #[test]
    fn color_maps_opacity_to_alpha() {
        let c = color(Rgb::new(0xAA, 0x74, 0xE6), 1.0);
        assert_eq!(c, egui::Color32::from_rgb(0xAA, 0x74, 0xE6));
        assert_eq!(color(Rgb::new(1, 2, 3), 0.0).a(), 0);
        assert_eq!(color(Rgb::new(1, 2, 3), 7.0).a(), 255);
    }
}
