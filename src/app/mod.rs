use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{error, info, warn};

use crate::dataset::{Dataset, NodeKind, NodeRecord, load_dataset};

mod engine;
mod graph;
mod highlight;
mod interaction;
mod model;
mod physics;
mod render_sync;
mod theme;
mod ui;
mod viewport;

pub use engine::EngineOptions;
use engine::GraphEngine;

type LoadResult = Result<Dataset, String>;

pub struct GraphExplorerApp {
    source: Option<PathBuf>,
    options: EngineOptions,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    engine: GraphEngine,
    clicked_rx: Receiver<NodeRecord>,
    source_label: String,
    node_kinds: Vec<NodeKind>,
    relationship_kinds: Vec<String>,
    filter_choice: Option<NodeKind>,
    search: String,
    selected: Option<String>,
    trace_origin: Option<String>,
    show_link_labels: bool,
}

impl GraphExplorerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: Option<PathBuf>,
        options: EngineOptions,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: Option<PathBuf>) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(source.as_deref()).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: Option<PathBuf>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn source_label(&self) -> String {
        self.source
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "bundled sample".to_owned())
    }

    fn ready_state(&self, dataset: Dataset) -> AppState {
        if dataset.is_empty() {
            warn!("dataset contains no nodes");
            return AppState::Error(format!("{} contains no nodes", self.source_label()));
        }
        AppState::Ready(Box::new(ViewModel::new(
            &dataset,
            self.options.clone(),
            self.source_label(),
        )))
    }
}

impl eframe::App for GraphExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut loaded = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(dataset)) => loaded = Some(dataset),
                    Ok(Err(message)) => {
                        error!(%message, "failed to load dataset");
                        transition = Some(AppState::Error(message));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading knowledge graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load knowledge graph");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        info!("retrying dataset load");
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(dataset)) => model.reload(&dataset),
                        Ok(Err(message)) => {
                            error!(%message, "failed to reload dataset");
                            transition = Some(AppState::Error(message));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(dataset) = loaded {
            transition = Some(self.ready_state(dataset));
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
