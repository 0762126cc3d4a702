use eframe::egui::{Color32, Pos2};
use tracing::trace;

use super::highlight::ElementStyles;
use super::model::GraphModel;
use super::physics::TickEvent;
use super::theme::{CategoricalPalette, link_color, node_glyph};
use super::viewport::ViewTransform;

#[derive(Clone, Debug, PartialEq)]
pub(super) struct NodeSprite {
    pub(super) index: usize,
    pub(super) center: Pos2,
    pub(super) radius: f32,
    pub(super) fill: Color32,
    pub(super) glyph: &'static str,
    pub(super) opacity: f32,
    pub(super) visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct LinkSprite {
    pub(super) index: usize,
    pub(super) start: Pos2,
    pub(super) end: Pos2,
    pub(super) stroke: Color32,
    pub(super) opacity: f32,
    pub(super) visible: bool,
}

impl LinkSprite {
    pub(super) fn midpoint(&self) -> Pos2 {
        self.start + (self.end - self.start) * 0.5
    }
}

/// Canvas-relative geometry for one frame. Links with an unresolved
/// endpoint have no sprite.
#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct RenderFrame {
    pub(super) generation: u64,
    pub(super) scale: f32,
    pub(super) nodes: Vec<NodeSprite>,
    pub(super) links: Vec<LinkSprite>,
}

/// Turns model positions into on-screen sprites. The model is only ever
/// borrowed immutably here.
#[derive(Default)]
pub(super) struct RenderSync {
    frame: RenderFrame,
}

pub(super) struct FrameInputs<'a> {
    pub(super) model: &'a GraphModel,
    pub(super) styles: &'a ElementStyles,
    pub(super) transform: ViewTransform,
    pub(super) node_radius: f32,
}

impl RenderSync {
    pub(super) fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    /// Applies a solver tick. Ticks from a superseded dataset are dropped.
    pub(super) fn apply_tick(
        &mut self,
        tick: &TickEvent,
        inputs: FrameInputs<'_>,
        palette: &mut CategoricalPalette,
    ) -> bool {
        if tick.generation != inputs.model.generation() {
            trace!(
                stale = tick.generation,
                current = inputs.model.generation(),
                "dropping stale tick"
            );
            return false;
        }
        self.redraw(inputs, palette);
        true
    }

    /// Rebuilds the frame after an interaction or viewport change.
    pub(super) fn redraw(&mut self, inputs: FrameInputs<'_>, palette: &mut CategoricalPalette) {
        let FrameInputs {
            model,
            styles,
            transform,
            node_radius,
        } = inputs;

        let frame = &mut self.frame;
        frame.generation = model.generation();
        frame.scale = transform.scale;

        frame.nodes.clear();
        frame.nodes.reserve(model.nodes.len());
        for (index, node) in model.nodes.iter().enumerate() {
            frame.nodes.push(NodeSprite {
                index,
                center: transform.apply(node.display_position()),
                radius: node_radius * transform.scale,
                fill: palette.node_color(&node.record.kind),
                glyph: node_glyph(&node.record.kind),
                opacity: styles.node_opacity.get(index).copied().unwrap_or(1.0),
                visible: styles.node_visible.get(index).copied().unwrap_or(true),
            });
        }

        frame.links.clear();
        for (index, link) in model.links.iter().enumerate() {
            let Some((source, target)) = link.endpoints() else {
                continue;
            };
            frame.links.push(LinkSprite {
                index,
                start: frame.nodes[source].center,
                end: frame.nodes[target].center,
                stroke: link_color(&link.record.kind),
                opacity: styles.link_opacity.get(index).copied().unwrap_or(1.0),
                visible: styles.link_visible.get(index).copied().unwrap_or(false),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::app::highlight::{HighlightMode, TypeFilter, compute_styles};
    use crate::dataset::{Dataset, LinkRecord, NodeKind, NodeRecord};

    fn model() -> GraphModel {
        let mut model = GraphModel::default();
        model.load(&Dataset {
            nodes: vec![
                NodeRecord::new("n1", NodeKind::Person, "Alice"),
                NodeRecord::new("n2", NodeKind::Other("artifact".to_owned()), "Loom"),
            ],
            links: vec![
                LinkRecord::new("n1", "n2", "created_by"),
                LinkRecord::new("n1", "ghost", "is_a"),
            ],
        });
        model
    }

    fn inputs<'a>(model: &'a GraphModel, styles: &'a ElementStyles) -> FrameInputs<'a> {
        FrameInputs {
            model,
            styles,
            transform: ViewTransform {
                scale: 2.0,
                translate: vec2(100.0, 50.0),
            },
            node_radius: 12.0,
        }
    }

    #[test]
    fn redraw_projects_positions_through_transform() {
        let mut model = model();
        model.pin("n1", vec2(10.0, -5.0));
        let styles = compute_styles(&HighlightMode::None, &TypeFilter::default(), &model);
        let mut sync = RenderSync::default();
        let mut palette = CategoricalPalette::default();
        sync.redraw(inputs(&model, &styles), &mut palette);

        let frame = sync.frame();
        assert_eq!(frame.nodes.len(), 2);
        assert_eq!(frame.nodes[0].center, pos2(120.0, 40.0));
        assert_eq!(frame.nodes[0].radius, 24.0);
        assert_eq!(frame.nodes[0].fill, palette.node_color(&NodeKind::Person));
        assert_eq!(frame.links.len(), 1);
        assert_eq!(frame.links[0].start, frame.nodes[0].center);
        assert_eq!(frame.links[0].end, frame.nodes[1].center);
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let mut model = model();
        let styles = compute_styles(&HighlightMode::None, &TypeFilter::default(), &model);
        let mut sync = RenderSync::default();
        let mut palette = CategoricalPalette::default();
        let stale = TickEvent {
            generation: model.generation(),
            alpha: 0.9,
        };

        model.load(&Dataset {
            nodes: vec![NodeRecord::new("solo", NodeKind::Event, "Solo")],
            links: Vec::new(),
        });
        let styles_after = compute_styles(&HighlightMode::None, &TypeFilter::default(), &model);
        assert_ne!(styles, styles_after);

        assert!(!sync.apply_tick(&stale, inputs(&model, &styles_after), &mut palette));
        assert!(sync.frame().nodes.is_empty());

        let fresh = TickEvent {
            generation: model.generation(),
            alpha: 0.9,
        };
        assert!(sync.apply_tick(&fresh, inputs(&model, &styles_after), &mut palette));
        assert_eq!(sync.frame().nodes.len(), 1);
        assert_eq!(sync.frame().generation, model.generation());
    }
}
