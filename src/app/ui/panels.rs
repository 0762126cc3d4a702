use std::sync::mpsc;

use eframe::egui::{self, Align, Context, Layout};
use tracing::{debug, warn};

use crate::dataset::{Dataset, NodeRecord};

use super::super::engine::{EngineOptions, GraphEngine, NodeClickHandler};
use super::super::{ViewModel, highlight::HighlightMode};

impl ViewModel {
    pub(in crate::app) fn new(dataset: &Dataset, options: EngineOptions, source_label: String) -> Self {
        let (clicked_tx, clicked_rx) = mpsc::channel::<NodeRecord>();
        let on_node_click: NodeClickHandler = Box::new(move |record: &NodeRecord| {
            let _ = clicked_tx.send(record.clone());
        });

        let mut engine = GraphEngine::new(options.clone(), Some(on_node_click));
        engine.load(dataset, options);

        Self {
            engine,
            clicked_rx,
            source_label,
            node_kinds: dataset.node_kinds(),
            relationship_kinds: dataset.relationship_kinds(),
            filter_choice: None,
            search: String::new(),
            selected: None,
            trace_origin: None,
            show_link_labels: true,
        }
    }

    /// Swaps in a freshly loaded snapshot, keeping the current options.
    pub(in crate::app) fn reload(&mut self, dataset: &Dataset) {
        if !self.engine.update_data(dataset) {
            warn!("reloaded dataset is empty, keeping the current graph");
            return;
        }

        self.node_kinds = dataset.node_kinds();
        self.relationship_kinds = dataset.relationship_kinds();
        self.filter_choice = None;
        self.trace_origin = None;
        if let Some(selected) = &self.selected
            && self.engine.find_record(selected).is_none()
        {
            self.selected = None;
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected != selected {
            debug!(?selected, "selection changed");
            self.selected = selected;
        }
    }

    /// Selects `node_id` and animates the camera to it.
    pub(in crate::app) fn select_and_focus(&mut self, node_id: &str, now: f64) {
        self.set_selected(Some(node_id.to_owned()));
        self.engine.focus_on_node(node_id, now);
    }

    fn drain_clicked_nodes(&mut self) {
        while let Ok(record) = self.clicked_rx.try_recv() {
            if let Some(origin) = self.trace_origin.take() {
                match self.engine.trace_path(&origin, &record.id) {
                    Some(path) => self.engine.highlight_path(Some(&path)),
                    None => debug!(from = %origin, to = %record.id, "no path between nodes"),
                }
            }
            self.set_selected(Some(record.id));
        }
    }

    fn status_text(&self) -> String {
        let mut parts = vec![format!(
            "zoom {:.0}%",
            self.engine.transform().scale * 100.0
        )];
        if let Some(kind) = self.engine.type_filter() {
            parts.push(format!("showing {kind}"));
        }
        if matches!(self.engine.highlight(), HighlightMode::Path(_)) {
            parts.push("path highlighted".to_owned());
        }
        if let Some(alpha) = self.engine.layout_alpha() {
            parts.push(format!("laying out (alpha {alpha:.3})"));
        } else if !self.engine.is_settled() {
            parts.push("moving camera".to_owned());
        }
        parts.join("  |  ")
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, reload_requested: &mut bool, is_loading: bool) {
        self.drain_clicked_nodes();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Knowledge Graph Explorer");
                    ui.separator();
                    ui.label(format!("source: {}", self.source_label));
                    ui.label(format!("nodes: {}", self.engine.node_count()));
                    ui.label(format!("links: {}", self.engine.link_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.status_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }
}
