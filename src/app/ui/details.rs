use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;
use super::super::highlight::HighlightMode;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let now = ui.input(|input| input.time);

        ui.heading("Selection Details");
        ui.add_space(6.0);

        if !matches!(self.engine.highlight(), HighlightMode::None)
            && ui.button("Clear highlight").clicked()
        {
            self.engine.highlight_path(None);
        }

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a node in the graph or a search result.");
            return;
        };

        let Some(record) = self.engine.find_record(&selected_id).cloned() else {
            ui.label("Selected node no longer exists in the graph.");
            return;
        };

        ui.label(RichText::new(record.name.as_str()).strong());
        ui.small(record.id.as_str());
        ui.add_space(6.0);
        ui.label(format!("Type: {}", record.kind));
        if let Some(description) = &record.description {
            ui.add_space(4.0);
            ui.label(description.as_str());
        }

        ui.add_space(6.0);
        ui.horizontal_wrapped(|ui| {
            if ui.button("Focus").clicked() {
                self.engine.focus_on_node(&record.id, now);
            }
            if self.engine.is_pinned(&record.id)
                && ui
                    .button("Unpin")
                    .on_hover_text("Let the layout move this node again.")
                    .clicked()
            {
                self.engine.unpin(&record.id);
            }
        });

        ui.separator();
        ui.label(RichText::new("Path tracing").strong());
        if self.trace_origin.as_deref() == Some(record.id.as_str()) {
            ui.label("Click another node to highlight the shortest path to it.");
            if ui.button("Cancel").clicked() {
                self.trace_origin = None;
            }
        } else if ui
            .button("Trace path from here")
            .on_hover_text("The next node you click becomes the path's end.")
            .clicked()
        {
            self.trace_origin = Some(record.id.clone());
        }

        ui.separator();
        ui.label(RichText::new("Relationships").strong());
        let relations = self
            .engine
            .relations_of(&record.id)
            .into_iter()
            .map(|(other, kind, outgoing)| {
                let arrow = if outgoing { "->" } else { "<-" };
                (other.id.clone(), format!("{arrow} {kind}  {}", other.name))
            })
            .collect::<Vec<_>>();

        if relations.is_empty() {
            ui.label("No relationships for this node.");
            return;
        }

        let mut next_selection = None;
        egui::ScrollArea::vertical()
            .id_salt("relations_scroll")
            .max_height(360.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (id, label) in &relations {
                    if ui.link(label.as_str()).on_hover_text(id.as_str()).clicked() {
                        next_selection = Some(id.clone());
                    }
                }
            });

        if let Some(id) = next_selection {
            self.select_and_focus(&id, now);
        }
    }
}
