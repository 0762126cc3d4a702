use std::collections::VecDeque;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{Color32, Pos2, Vec2};
use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::dataset::{Dataset, NodeKind, NodeRecord};

use super::highlight::{ElementStyles, HighlightMode, TypeFilter, compute_styles, shortest_path};
use super::interaction::{InteractionEffect, InteractionHandler, PointerState};
use super::model::GraphModel;
use super::physics::{ForceParams, Simulation, TickEvent};
use super::render_sync::{FrameInputs, RenderFrame, RenderSync};
use super::theme::CategoricalPalette;
use super::viewport::{ViewTransform, Viewport};

const OPTIONS_REHEAT_ALPHA: f32 = 0.3;

/// Layout and interaction settings. Field names follow the JSON config
/// file (`nodeRadius`, `linkDistance`, ...).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    pub node_radius: f32,
    pub link_distance: f32,
    pub charge_strength: f32,
    pub fix_nodes_after_drag: bool,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            node_radius: 12.0,
            link_distance: 150.0,
            charge_strength: -400.0,
            fix_nodes_after_drag: false,
            min_zoom: 0.1,
            max_zoom: 4.0,
        }
    }
}

impl EngineOptions {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    fn scale_extent(&self) -> RangeInclusive<f32> {
        let low = self.min_zoom.min(self.max_zoom).max(f32::EPSILON);
        let high = self.min_zoom.max(self.max_zoom).max(low);
        low..=high
    }
}

pub(super) type NodeClickHandler = Box<dyn FnMut(&NodeRecord)>;

/// Owns the geometry model and wires solver, viewport, interaction,
/// highlight and render sync together through explicit calls:
/// solver ticks are queued and drained into the synchronizer, pointer input
/// becomes [`InteractionEffect`]s that are applied here.
pub(super) struct GraphEngine {
    options: EngineOptions,
    model: GraphModel,
    simulation: Simulation,
    viewport: Viewport,
    interaction: InteractionHandler,
    highlight: HighlightMode,
    type_filter: TypeFilter,
    styles: ElementStyles,
    palette: CategoricalPalette,
    render: RenderSync,
    pending_ticks: VecDeque<TickEvent>,
    needs_redraw: bool,
    on_node_click: Option<NodeClickHandler>,
}

impl GraphEngine {
    pub(super) fn new(options: EngineOptions, on_node_click: Option<NodeClickHandler>) -> Self {
        Self {
            simulation: Simulation::new(ForceParams::from(&options)),
            viewport: Viewport::new(options.scale_extent()),
            interaction: InteractionHandler::new(options.fix_nodes_after_drag),
            options,
            model: GraphModel::default(),
            highlight: HighlightMode::None,
            type_filter: TypeFilter::default(),
            styles: ElementStyles::default(),
            palette: CategoricalPalette::default(),
            render: RenderSync::default(),
            pending_ticks: VecDeque::new(),
            needs_redraw: true,
            on_node_click,
        }
    }

    /// Replaces the whole engine state with `dataset`. An empty dataset is
    /// ignored and leaves the current graph in place.
    pub(super) fn load(&mut self, dataset: &Dataset, options: EngineOptions) -> bool {
        if !self.model.load(dataset) {
            return false;
        }

        self.apply_options(options);
        self.highlight = HighlightMode::None;
        self.type_filter = TypeFilter::default();
        self.interaction.reset();
        self.viewport.snap_to_default(self.model.bounds());
        self.simulation.restart();
        self.restyle();

        info!(
            generation = self.model.generation(),
            nodes = self.model.nodes.len(),
            links = self.model.links.len(),
            "graph loaded"
        );
        true
    }

    pub(super) fn update_data(&mut self, dataset: &Dataset) -> bool {
        self.load(dataset, self.options.clone())
    }

    pub(super) fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Applies new options to the live graph and reheats the layout when a
    /// force parameter changed.
    pub(super) fn set_options(&mut self, options: EngineOptions) {
        let forces_changed = ForceParams::from(&options) != ForceParams::from(&self.options);
        self.apply_options(options);
        if forces_changed && !self.model.is_empty() {
            self.simulation.reheat(OPTIONS_REHEAT_ALPHA);
        }
        self.needs_redraw = true;
    }

    fn apply_options(&mut self, options: EngineOptions) {
        self.simulation.set_params(ForceParams::from(&options));
        self.viewport.set_scale_extent(options.scale_extent());
        self.interaction
            .set_keep_pinned_after_drag(options.fix_nodes_after_drag);
        self.options = options;
    }

    fn restyle(&mut self) {
        self.styles = compute_styles(&self.highlight, &self.type_filter, &self.model);
        self.needs_redraw = true;
    }

    /// `None`, an empty string or `"all"` clear the filter.
    pub(super) fn filter_by_type(&mut self, kind: Option<&str>) {
        self.type_filter = TypeFilter::parse(kind);
        debug!(filter = ?self.type_filter.kind(), "type filter changed");
        self.restyle();
    }

    pub(super) fn type_filter(&self) -> Option<&NodeKind> {
        self.type_filter.kind()
    }

    /// `None` or an empty list clears the highlight.
    pub(super) fn highlight_path(&mut self, node_ids: Option<&[String]>) {
        self.highlight = match node_ids {
            Some(ids) => HighlightMode::path(ids.iter().cloned()),
            None => HighlightMode::None,
        };
        self.restyle();
    }

    pub(super) fn highlight(&self) -> &HighlightMode {
        &self.highlight
    }

    pub(super) fn focus_on_node(&mut self, node_id: &str, now: f64) -> bool {
        let Some(node) = self.model.find_node(node_id) else {
            debug!(node_id, "focus ignored for unknown node");
            return false;
        };
        self.viewport.focus(node.display_position(), now)
    }

    pub(super) fn reset_view(&mut self, now: f64) {
        self.viewport.reset(self.model.bounds(), now);
    }

    pub(super) fn zoom_by(&mut self, factor: f32, center: Pos2) {
        self.viewport.zoom_by(factor, center);
        self.needs_redraw = true;
    }

    pub(super) fn zoom_at_center(&mut self, factor: f32) {
        self.zoom_by(factor, self.viewport.screen_center());
    }

    pub(super) fn resize(&mut self, size: Vec2) {
        if size != self.viewport.size() {
            self.viewport.set_size(size);
            self.needs_redraw = true;
        }
    }

    pub(super) fn transform(&self) -> ViewTransform {
        self.viewport.transform()
    }

    pub(super) fn pointer_state(&self) -> PointerState {
        self.interaction.state()
    }

    /// Current solver alpha while the layout is still moving.
    pub(super) fn layout_alpha(&self) -> Option<f32> {
        self.simulation
            .is_running()
            .then(|| self.simulation.alpha())
    }

    pub(super) fn is_settled(&self) -> bool {
        !self.simulation.is_running() && !self.viewport.is_animating()
    }

    pub(super) fn node_count(&self) -> usize {
        self.model.nodes.len()
    }

    pub(super) fn link_count(&self) -> usize {
        self.model.links.len()
    }

    pub(super) fn node_record(&self, index: usize) -> Option<&NodeRecord> {
        self.model.nodes.get(index).map(|node| &node.record)
    }

    /// Text drawn on a link: its explicit label, else its relationship kind.
    pub(super) fn link_label(&self, index: usize) -> Option<&str> {
        self.model
            .links
            .get(index)
            .map(|link| link.record.label.as_deref().unwrap_or(&link.record.kind))
    }

    pub(super) fn find_record(&self, node_id: &str) -> Option<&NodeRecord> {
        self.model.find_node(node_id).map(|node| &node.record)
    }

    pub(super) fn is_pinned(&self, node_id: &str) -> bool {
        self.model
            .find_node(node_id)
            .is_some_and(|node| node.pin.is_some())
    }

    pub(super) fn unpin(&mut self, node_id: &str) -> bool {
        let unpinned = self.model.unpin(node_id);
        if unpinned {
            self.simulation.reheat(OPTIONS_REHEAT_ALPHA);
        }
        unpinned
    }

    /// Neighbour records with the relationship kinds linking them to
    /// `node_id`, in link order.
    pub(super) fn relations_of(&self, node_id: &str) -> Vec<(&NodeRecord, &str, bool)> {
        let Some(center) = self.model.index_of(node_id) else {
            return Vec::new();
        };

        self.model
            .links
            .iter()
            .filter_map(|link| {
                let (source, target) = link.endpoints()?;
                if source == center {
                    Some((&self.model.nodes[target].record, link.record.kind.as_str(), true))
                } else if target == center {
                    Some((&self.model.nodes[source].record, link.record.kind.as_str(), false))
                } else {
                    None
                }
            })
            .collect()
    }

    pub(super) fn kind_color(&mut self, kind: &NodeKind) -> Color32 {
        self.palette.node_color(kind)
    }

    pub(super) fn trace_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        shortest_path(&self.model, from, to)
    }

    /// Nearest visible node whose disc contains `screen`.
    pub(super) fn node_at(&self, screen: Pos2) -> Option<usize> {
        let transform = self.viewport.transform();
        let radius = self.options.node_radius * transform.scale;
        self.model
            .nodes
            .iter()
            .enumerate()
            .filter(|(index, _)| self.styles.node_visible.get(*index).copied().unwrap_or(true))
            .filter_map(|(index, node)| {
                let distance = transform.apply(node.display_position()).distance(screen);
                (distance <= radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(super) fn pointer_moved(&mut self, screen: Pos2) {
        let hit = self.node_at(screen);
        let model_position = self.viewport.transform().invert(screen);
        let model = &self.model;
        let effects = self
            .interaction
            .pointer_moved(hit, screen, model_position, |index| {
                model.nodes.get(index).map(|node| node.record.id.clone())
            });
        self.apply_effects(effects);
    }

    pub(super) fn pointer_pressed(&mut self, screen: Pos2) {
        let hit = self.node_at(screen);
        let effects = self.interaction.pointer_pressed(hit, screen);
        self.apply_effects(effects);
    }

    pub(super) fn pointer_released(&mut self, screen: Pos2) {
        let hit = self.node_at(screen);
        let model = &self.model;
        let effects = self.interaction.pointer_released(hit, |index| {
            model.nodes.get(index).map(|node| node.record.id.clone())
        });
        self.apply_effects(effects);
    }

    pub(super) fn pointer_left(&mut self) {
        let effects = self.interaction.pointer_left();
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Vec<InteractionEffect>) {
        for effect in effects {
            trace!(?effect, "interaction effect");
            match effect {
                InteractionEffect::Highlight(mode) => {
                    self.highlight = mode;
                    self.restyle();
                }
                InteractionEffect::Grab { node } => {
                    if let Some(position) = self.model.display_position(node) {
                        self.model.pin_index(node, position);
                    }
                    self.simulation.heat();
                }
                InteractionEffect::DragTo { node, position } => {
                    self.model.pin_index(node, position);
                }
                InteractionEffect::Release { node, keep_pinned } => {
                    self.simulation.cool();
                    if !keep_pinned {
                        self.model.unpin_index(node);
                    }
                }
                InteractionEffect::Select { node } => {
                    if let (Some(handler), Some(sim_node)) =
                        (self.on_node_click.as_mut(), self.model.nodes.get(node))
                    {
                        handler(&sim_node.record);
                    }
                }
                InteractionEffect::Pan(delta) => self.viewport.pan_by(delta),
            }
            self.needs_redraw = true;
        }
    }

    /// Steps a running viewport transition.
    pub(super) fn advance(&mut self, now: f64) -> bool {
        if !self.viewport.is_animating() {
            return false;
        }
        self.needs_redraw = true;
        self.viewport.advance(now)
    }

    /// Runs one solver step and queues its tick for the synchronizer.
    pub(super) fn tick(&mut self) -> bool {
        match self.simulation.tick(&mut self.model) {
            Some(tick) => {
                self.pending_ticks.push_back(tick);
                true
            }
            None => false,
        }
    }

    /// Drains queued ticks into the render frame, then redraws for any
    /// interaction or viewport change that no tick already covered.
    pub(super) fn sync(&mut self) {
        while let Some(tick) = self.pending_ticks.pop_front() {
            let inputs = FrameInputs {
                model: &self.model,
                styles: &self.styles,
                transform: self.viewport.transform(),
                node_radius: self.options.node_radius,
            };
            if self.render.apply_tick(&tick, inputs, &mut self.palette) {
                trace!(alpha = tick.alpha, "tick applied");
                self.needs_redraw = false;
            }
        }

        if self.needs_redraw {
            let inputs = FrameInputs {
                model: &self.model,
                styles: &self.styles,
                transform: self.viewport.transform(),
                node_radius: self.options.node_radius,
            };
            self.render.redraw(inputs, &mut self.palette);
            self.needs_redraw = false;
        }
        debug_assert_eq!(self.render.frame().generation, self.model.generation());
    }

    /// One frame of the rendering clock. Returns `true` while another frame
    /// is wanted.
    pub(super) fn step(&mut self, now: f64) -> bool {
        let animating = self.advance(now);
        let ticked = self.tick();
        self.sync();
        animating || ticked || self.simulation.is_running()
    }

    pub(super) fn frame(&self) -> &RenderFrame {
        self.render.frame()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::app::highlight::DIMMED_OPACITY;
    use crate::dataset::LinkRecord;

    fn chain() -> Dataset {
        Dataset {
            nodes: vec![
                NodeRecord::new("a", NodeKind::Person, "Alice"),
                NodeRecord::new("b", NodeKind::Concept, "Babbage engine"),
                NodeRecord::new("c", NodeKind::Location, "London"),
            ],
            links: vec![
                LinkRecord::new("a", "b", "created_by"),
                LinkRecord::new("b", "c", "located_in"),
            ],
        }
    }

    fn engine_with(options: EngineOptions, on_node_click: Option<NodeClickHandler>) -> GraphEngine {
        let mut engine = GraphEngine::new(options.clone(), on_node_click);
        engine.resize(vec2(800.0, 600.0));
        assert!(engine.load(&chain(), options));
        engine.sync();
        engine
    }

    fn engine() -> GraphEngine {
        engine_with(EngineOptions::default(), None)
    }

    fn screen_of(engine: &GraphEngine, id: &str) -> Pos2 {
        let index = engine.model.index_of(id).expect("node");
        let position = engine.model.display_position(index).expect("position");
        engine.transform().apply(position)
    }

    fn assert_close(a: ViewTransform, b: ViewTransform) {
        assert!((a.scale - b.scale).abs() < 1e-4, "{a:?} != {b:?}");
        assert!((a.translate - b.translate).length() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: EngineOptions =
            serde_json::from_str(r#"{ "linkDistance": 90, "fixNodesAfterDrag": true }"#)
                .expect("options");
        assert_eq!(options.link_distance, 90.0);
        assert!(options.fix_nodes_after_drag);
        assert_eq!(options.node_radius, 12.0);
        assert_eq!(options.charge_strength, -400.0);
    }

    #[test]
    fn options_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{ "nodeRadius": 8 }"#).expect("write");
        let options = EngineOptions::from_json_file(&path).expect("options");
        assert_eq!(options.node_radius, 8.0);

        fs::write(&path, "not json").expect("write");
        let err = EngineOptions::from_json_file(&path).expect_err("parse error");
        assert!(format!("{err:#}").contains("engine.json"));
    }

    #[test]
    fn reset_view_centers_bounds_and_is_idempotent() {
        let mut engine = engine();
        for _ in 0..20 {
            engine.tick();
        }
        engine.zoom_by(3.0, pos2(10.0, 10.0));

        engine.reset_view(0.0);
        assert!(engine.advance(0.1));
        assert!(!engine.advance(1.0));
        let first = engine.transform();
        assert!((first.scale - 0.8).abs() < 1e-6);
        let center = engine.model.bounds().expect("bounds").center().to_vec2();
        assert!(first.apply(center).distance(pos2(400.0, 300.0)) < 1e-3);

        engine.reset_view(1.0);
        engine.advance(5.0);
        assert_close(engine.transform(), first);
    }

    #[test]
    fn hover_highlights_neighbors_and_restores() {
        let mut engine = engine();
        let initial = engine.styles.clone();

        engine.pointer_moved(screen_of(&engine, "a"));
        assert_eq!(engine.highlight(), &HighlightMode::Neighbors("a".to_owned()));
        assert_eq!(engine.styles.node_opacity, vec![1.0, 1.0, DIMMED_OPACITY]);
        assert_eq!(engine.styles.link_opacity, vec![1.0, DIMMED_OPACITY]);

        engine.pointer_moved(pos2(-5000.0, -5000.0));
        assert_eq!(engine.highlight(), &HighlightMode::None);
        assert_eq!(engine.styles, initial);
    }

    #[test]
    fn type_filter_round_trip() {
        let mut engine = engine();
        let initial = engine.styles.clone();

        engine.filter_by_type(Some("person"));
        assert_eq!(engine.type_filter(), Some(&NodeKind::Person));
        assert_eq!(engine.styles.node_visible, vec![true, false, false]);
        assert_eq!(engine.styles.link_visible, vec![true, false]);

        engine.filter_by_type(Some("all"));
        assert_eq!(engine.type_filter(), None);
        assert_eq!(engine.styles, initial);
    }

    #[test]
    fn highlight_path_dims_everything_else() {
        let mut engine = engine();
        engine.highlight_path(Some(&["a".to_owned(), "b".to_owned()]));
        assert_eq!(engine.styles.node_opacity, vec![1.0, 1.0, DIMMED_OPACITY]);
        assert_eq!(engine.styles.link_opacity, vec![1.0, DIMMED_OPACITY]);

        engine.highlight_path(Some(&[]));
        assert_eq!(engine.highlight(), &HighlightMode::None);
        assert!(engine.styles.node_opacity.iter().all(|value| *value == 1.0));
    }

    #[test]
    fn drag_pins_node_then_releases_it() {
        let mut engine = engine();
        let start = screen_of(&engine, "a");
        let drop_at = start + vec2(120.0, 40.0);

        engine.pointer_pressed(start);
        engine.pointer_moved(drop_at);
        let expected = engine.transform().invert(drop_at);
        assert_eq!(engine.model.nodes[0].pin, Some(expected));

        for _ in 0..10 {
            engine.tick();
        }
        assert_eq!(engine.model.nodes[0].display_position(), expected);

        engine.pointer_released(drop_at);
        assert!(!engine.is_pinned("a"));
    }

    #[test]
    fn drag_keeps_pin_when_configured() {
        let options = EngineOptions {
            fix_nodes_after_drag: true,
            ..EngineOptions::default()
        };
        let mut engine = engine_with(options, None);
        let start = screen_of(&engine, "c");

        engine.pointer_pressed(start);
        engine.pointer_moved(start + vec2(0.0, 80.0));
        engine.pointer_released(start + vec2(0.0, 80.0));
        assert!(engine.is_pinned("c"));
        assert!(engine.unpin("c"));
        assert!(!engine.is_pinned("c"));
    }

    #[test]
    fn click_reports_full_record() {
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicked);
        let handler: NodeClickHandler =
            Box::new(move |record: &NodeRecord| sink.borrow_mut().push(record.clone()));
        let mut engine = engine_with(EngineOptions::default(), Some(handler));

        let at = screen_of(&engine, "b");
        engine.pointer_pressed(at);
        engine.pointer_released(at + vec2(1.0, 0.0));

        assert_eq!(*clicked.borrow(), vec![chain().nodes[1].clone()]);
        assert!(!engine.is_pinned("b"));
    }

    #[test]
    fn zoom_in_then_out_restores_transform() {
        let mut engine = engine();
        let before = engine.transform();
        engine.zoom_by(2.0, pos2(250.0, 120.0));
        assert!((engine.transform().scale - before.scale * 2.0).abs() < 1e-5);
        engine.zoom_by(0.5, pos2(250.0, 120.0));
        assert_close(engine.transform(), before);
    }

    #[test]
    fn zoom_is_clamped_to_extent() {
        let mut engine = engine();
        engine.zoom_by(100.0, pos2(0.0, 0.0));
        assert_eq!(engine.transform().scale, 4.0);
        engine.zoom_by(0.0001, pos2(0.0, 0.0));
        assert_eq!(engine.transform().scale, 0.1);
    }

    #[test]
    fn focus_on_known_and_unknown_nodes() {
        let mut engine = engine();
        let before = engine.transform();
        assert!(!engine.focus_on_node("ghost", 0.0));
        assert!(!engine.advance(1.0));
        assert_eq!(engine.transform(), before);

        assert!(engine.focus_on_node("b", 0.0));
        engine.advance(2.0);
        assert!((engine.transform().scale - 1.5).abs() < 1e-6);
        assert!(screen_of(&engine, "b").distance(pos2(400.0, 300.0)) < 1e-3);
    }

    #[test]
    fn stale_ticks_never_reach_the_frame() {
        let mut engine = engine();
        assert!(engine.tick());
        let replacement = Dataset {
            nodes: vec![NodeRecord::new("solo", NodeKind::Event, "Solo")],
            links: Vec::new(),
        };
        assert!(engine.update_data(&replacement));
        assert_eq!(engine.pending_ticks.len(), 1);

        engine.sync();
        let frame = engine.frame();
        assert_eq!(frame.generation, engine.model.generation());
        assert_eq!(frame.nodes.len(), 1);
        assert!(frame.links.is_empty());
    }

    #[test]
    fn single_person_renders_one_colored_node() {
        let mut engine = GraphEngine::new(EngineOptions::default(), None);
        engine.resize(vec2(640.0, 480.0));
        let dataset = Dataset {
            nodes: vec![NodeRecord::new("n1", NodeKind::Person, "Alice")],
            links: Vec::new(),
        };
        assert!(engine.load(&dataset, EngineOptions::default()));
        engine.step(0.0);

        let frame = engine.frame();
        assert_eq!(frame.nodes.len(), 1);
        assert_eq!(frame.nodes[0].fill, Color32::from_rgb(0xff, 0x7f, 0x0e));
        assert!(frame.nodes[0].center.x.is_finite() && frame.nodes[0].center.y.is_finite());
        assert!(frame.links.is_empty());
    }

    #[test]
    fn empty_dataset_keeps_current_graph_and_options() {
        let mut engine = engine();
        let generation = engine.model.generation();
        let changed = EngineOptions {
            node_radius: 30.0,
            ..EngineOptions::default()
        };

        assert!(!engine.load(&Dataset::default(), changed));
        assert_eq!(engine.node_count(), 3);
        assert_eq!(engine.model.generation(), generation);
        assert_eq!(engine.options().node_radius, 12.0);
    }

    #[test]
    fn load_resets_highlight_and_filter() {
        let mut engine = engine();
        engine.filter_by_type(Some("concept"));
        engine.highlight_path(Some(&["a".to_owned()]));
        assert!(engine.update_data(&chain()));
        assert_eq!(engine.highlight(), &HighlightMode::None);
        assert_eq!(engine.type_filter(), None);
    }

    #[test]
    fn simulation_settles_and_step_stops_requesting_frames() {
        let mut engine = engine();
        let mut now = 0.0;
        let mut frames = 0;
        while engine.step(now) {
            now += 1.0 / 60.0;
            frames += 1;
            assert!(frames < 2000, "layout never settled");
        }
        assert!(engine.is_settled());
        for sprite in &engine.frame().nodes {
            assert!(sprite.center.x.is_finite() && sprite.center.y.is_finite());
        }
    }

    #[test]
    fn relations_and_paths_follow_links() {
        let engine = engine();
        let relations = engine.relations_of("b");
        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].0.id, "a");
        assert_eq!(relations[0].1, "created_by");
        assert!(!relations[0].2);
        assert_eq!(relations[1].0.id, "c");
        assert!(relations[1].2);

        assert_eq!(
            engine.trace_path("a", "c"),
            Some(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()])
        );
    }
}
