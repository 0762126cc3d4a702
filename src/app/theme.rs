use std::collections::HashMap;

use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::dataset::NodeKind;

const CATEGORY10: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

pub(super) const DEFAULT_LINK_COLOR: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);

/// Ordinal color scale for kinds without a fixed color. A kind keeps the
/// slot it was first given for the life of the palette.
#[derive(Default)]
pub(super) struct CategoricalPalette {
    slots: HashMap<String, usize>,
}

impl CategoricalPalette {
    pub(super) fn color_for(&mut self, key: &str) -> Color32 {
        let next = self.slots.len();
        let slot = *self.slots.entry(key.to_owned()).or_insert(next);
        CATEGORY10[slot % CATEGORY10.len()]
    }

    pub(super) fn node_color(&mut self, kind: &NodeKind) -> Color32 {
        match kind {
            NodeKind::Person => Color32::from_rgb(0xff, 0x7f, 0x0e),
            NodeKind::Organization => Color32::from_rgb(0x1f, 0x77, 0xb4),
            NodeKind::Location => Color32::from_rgb(0x2c, 0xa0, 0x2c),
            NodeKind::Concept => Color32::from_rgb(0xd6, 0x27, 0x28),
            NodeKind::Time => Color32::from_rgb(0x94, 0x67, 0xbd),
            NodeKind::Event => Color32::from_rgb(0x8c, 0x56, 0x4b),
            NodeKind::Other(raw) => self.color_for(raw),
        }
    }
}

pub(super) fn node_glyph(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Person => "P",
        NodeKind::Organization => "O",
        NodeKind::Location => "L",
        NodeKind::Concept => "C",
        NodeKind::Time => "T",
        NodeKind::Event => "E",
        NodeKind::Other(_) => "",
    }
}

pub(super) fn link_color(kind: &str) -> Color32 {
    match kind {
        "is_a" => Color32::from_rgb(0xaa, 0xaa, 0xaa),
        "part_of" => Color32::from_rgb(0x77, 0x77, 0x77),
        "created_by" => Color32::from_rgb(0xff, 0x7f, 0x0e),
        "located_in" => Color32::from_rgb(0x2c, 0xa0, 0x2c),
        _ => DEFAULT_LINK_COLOR,
    }
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, translate: Vec2, scale: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(250, 250, 252));

    let step = (56.0 * scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + translate;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(200, 205, 215, 90));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}
