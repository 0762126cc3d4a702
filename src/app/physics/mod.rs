mod forces;
mod quadtree;

use eframe::egui::Vec2;
use tracing::debug;

use super::EngineOptions;
use super::model::GraphModel;
use forces::{
    CollisionParams, LinkSprings, accumulate_charge_for_node, accumulate_collision_pairs,
    accumulate_link_springs,
};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f32 = 0.9;
const ALPHA_MIN: f32 = 0.001;
const DRAG_ALPHA_TARGET: f32 = 0.3;
const VELOCITY_DECAY: f32 = 0.4;
const COLLISION_STRENGTH: f32 = 1.0;
const CENTER_STRENGTH: f32 = 1.0;

/// Emitted after every integration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct TickEvent {
    pub(super) generation: u64,
    pub(super) alpha: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ForceParams {
    pub(super) link_distance: f32,
    pub(super) charge_strength: f32,
    pub(super) collision_radius: f32,
}

impl From<&EngineOptions> for ForceParams {
    fn from(options: &EngineOptions) -> Self {
        Self {
            link_distance: options.link_distance,
            charge_strength: options.charge_strength,
            collision_radius: options.node_radius * 2.0,
        }
    }
}

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    predicted: Vec<Vec2>,
    deltas: Vec<Vec2>,
    links: Vec<(usize, usize)>,
    degree: Vec<usize>,
}

/// Alpha-cooled force simulation. Every tick reads one snapshot of the model
/// and only writes positions back once all forces have been accumulated.
pub(super) struct Simulation {
    params: ForceParams,
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_decay: f32,
    running: bool,
    scratch: PhysicsScratch,
}

impl Simulation {
    pub(super) fn new(params: ForceParams) -> Self {
        Self {
            params,
            alpha: 1.0,
            alpha_min: ALPHA_MIN,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: VELOCITY_DECAY,
            running: false,
            scratch: PhysicsScratch::default(),
        }
    }

    pub(super) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(super) fn is_running(&self) -> bool {
        self.running
    }

    pub(super) fn set_params(&mut self, params: ForceParams) {
        self.params = params;
    }

    /// Full restart, used when a new dataset is loaded.
    pub(super) fn restart(&mut self) {
        self.alpha = 1.0;
        self.alpha_target = 0.0;
        self.running = true;
    }

    pub(super) fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
        self.running = true;
    }

    /// Keeps the simulation hot for the duration of a drag.
    pub(super) fn heat(&mut self) {
        self.alpha_target = DRAG_ALPHA_TARGET;
        self.running = true;
    }

    pub(super) fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub(super) fn tick(&mut self, model: &mut GraphModel) -> Option<TickEvent> {
        if !self.running || model.is_empty() {
            return None;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;
        let node_count = model.nodes.len();

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.predicted.clear();
        scratch.deltas.clear();
        scratch.deltas.resize(node_count, Vec2::ZERO);
        for node in &model.nodes {
            let position = node.display_position();
            let velocity = if node.pin.is_some() {
                Vec2::ZERO
            } else {
                node.velocity
            };
            scratch.positions.push(position);
            scratch.predicted.push(position + velocity);
        }

        scratch.links.clear();
        scratch
            .links
            .extend(model.links.iter().filter_map(|link| link.endpoints()));
        scratch.degree.clear();
        scratch
            .degree
            .extend((0..node_count).map(|index| model.degree(index)));

        accumulate_link_springs(
            LinkSprings {
                links: &scratch.links,
                degree: &scratch.degree,
                rest_length: self.params.link_distance,
                alpha,
            },
            &scratch.predicted,
            &mut scratch.deltas,
        );

        if let Some(tree) = QuadNode::build(&scratch.positions) {
            let strength_alpha = self.params.charge_strength * alpha;
            for (index, delta) in scratch.deltas.iter_mut().enumerate() {
                accumulate_charge_for_node(
                    &tree,
                    index,
                    &scratch.positions,
                    strength_alpha,
                    BARNES_HUT_THETA,
                    delta,
                );
            }
        }

        if self.params.collision_radius > 0.0
            && let Some(tree) = QuadNode::build(&scratch.predicted)
        {
            accumulate_collision_pairs(
                &tree,
                &tree,
                true,
                &scratch.predicted,
                CollisionParams {
                    radius: self.params.collision_radius,
                    strength: COLLISION_STRENGTH,
                },
                &mut scratch.deltas,
            );
        }

        let centroid =
            scratch.positions.iter().fold(Vec2::ZERO, |sum, p| sum + *p) / node_count as f32;
        let center_shift = -centroid * CENTER_STRENGTH;

        let retain = 1.0 - self.velocity_decay;
        for (index, node) in model.nodes.iter_mut().enumerate() {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity = (node.velocity + scratch.deltas[index]) * retain;
            node.position = scratch.positions[index] + center_shift + node.velocity;
        }

        if self.alpha < self.alpha_min {
            self.running = false;
            debug!(generation = model.generation(), "simulation settled");
        }

        Some(TickEvent {
            generation: model.generation(),
            alpha,
        })
    }
}
