use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui};

use super::super::ViewModel;
use super::super::interaction::PointerState;
use super::super::theme::{circle_visible, draw_background, segment_visible, with_opacity};

const LINK_LABEL_MIN_SCALE: f32 = 1.0;
const NODE_LABEL_MIN_RADIUS: f32 = 5.0;
const SELECTED_RING: Color32 = Color32::from_rgb(245, 206, 93);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.engine.resize(rect.size());
        self.handle_canvas_input(ui, rect, &response);

        let now = ui.input(|input| input.time);
        if self.engine.step(now) {
            ui.ctx().request_repaint();
        }

        let painter = ui.painter_at(rect);
        let transform = self.engine.transform();
        draw_background(&painter, rect, transform.translate, transform.scale);

        let offset = rect.min.to_vec2();
        let frame = self.engine.frame();
        let zoom_sqrt = frame.scale.sqrt();

        for link in frame.links.iter().filter(|link| link.visible) {
            let start = link.start + offset;
            let end = link.end + offset;
            if !segment_visible(rect, start, end, 4.0) {
                continue;
            }

            let color = with_opacity(link.stroke, link.opacity);
            let stroke = Stroke::new((1.5 * zoom_sqrt).clamp(0.6, 3.0), color);
            let direction = end - start;
            let length = direction.length();
            let target_radius = self.engine.options().node_radius * frame.scale;

            if length > target_radius * 2.0 {
                let tip = end - direction / length * target_radius;
                painter.arrow(start, tip - start, stroke);
            } else {
                painter.line_segment([start, end], stroke);
            }

            if self.show_link_labels
                && frame.scale > LINK_LABEL_MIN_SCALE
                && let Some(text) = self.engine.link_label(link.index)
            {
                painter.text(
                    link.midpoint() + offset,
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(10.0),
                    with_opacity(Color32::from_gray(90), link.opacity),
                );
            }
        }

        for sprite in frame.nodes.iter().filter(|sprite| sprite.visible) {
            let center = sprite.center + offset;
            if !circle_visible(rect, center, sprite.radius + 40.0) {
                continue;
            }

            let is_selected = self
                .engine
                .node_record(sprite.index)
                .is_some_and(|record| self.selected.as_deref() == Some(record.id.as_str()));
            let outline = if is_selected {
                Stroke::new(3.0, with_opacity(SELECTED_RING, sprite.opacity))
            } else {
                Stroke::new(1.5, with_opacity(Color32::WHITE, sprite.opacity))
            };

            painter.circle(
                center,
                sprite.radius,
                with_opacity(sprite.fill, sprite.opacity),
                outline,
            );

            if !sprite.glyph.is_empty() {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    sprite.glyph,
                    FontId::proportional((sprite.radius * 0.9).max(6.0)),
                    with_opacity(Color32::WHITE, sprite.opacity),
                );
            }

            if sprite.radius >= NODE_LABEL_MIN_RADIUS
                && let Some(record) = self.engine.node_record(sprite.index)
            {
                painter.text(
                    center + egui::vec2(0.0, sprite.radius + 3.0),
                    Align2::CENTER_TOP,
                    record.name.as_str(),
                    FontId::proportional((11.0 * zoom_sqrt).clamp(9.0, 16.0)),
                    with_opacity(Color32::from_gray(40), sprite.opacity),
                );
            }
        }

        if let PointerState::Hovered { node } = self.engine.pointer_state()
            && let Some(record) = self.engine.node_record(node).cloned()
        {
            response.on_hover_ui_at_pointer(|ui| {
                ui.strong(record.name.as_str());
                ui.label(format!("Type: {}", record.kind));
                if let Some(description) = &record.description {
                    ui.label(description.as_str());
                }
            });
        }
    }
}
