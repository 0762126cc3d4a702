use eframe::egui::{self, Rect, Ui};

use super::super::ViewModel;
use super::super::interaction::PointerState;

impl ViewModel {
    /// Feeds this frame's pointer input into the engine in canvas-local
    /// coordinates.
    pub(in crate::app) fn handle_canvas_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let (pointer, pressed, released, scroll) = ui.input(|input| {
            (
                input.pointer.interact_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.raw_scroll_delta.y,
            )
        });

        let captured = matches!(
            self.engine.pointer_state(),
            PointerState::Dragging { .. } | PointerState::Panning { .. }
        );
        let Some(pointer) = pointer.filter(|pointer| captured || rect.contains(*pointer)) else {
            self.engine.pointer_left();
            return;
        };
        let local = (pointer - rect.min).to_pos2();

        if response.hovered() && scroll.abs() > f32::EPSILON {
            let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
            self.engine.zoom_by(zoom_factor, local);
        }

        self.engine.pointer_moved(local);

        if pressed && response.hovered() {
            self.engine.pointer_pressed(local);
        }

        if released
            && matches!(
                self.engine.pointer_state(),
                PointerState::Dragging { .. } | PointerState::Panning { .. }
            )
        {
            self.engine.pointer_released(local);
        }

        let cursor = match self.engine.pointer_state() {
            PointerState::Dragging { .. } | PointerState::Panning { .. } => {
                Some(egui::CursorIcon::Grabbing)
            }
            PointerState::Hovered { .. } => Some(egui::CursorIcon::PointingHand),
            PointerState::Idle => None,
        };
        if let Some(cursor) = cursor {
            ui.output_mut(|output| {
                output.cursor_icon = cursor;
            });
        }
    }
}
