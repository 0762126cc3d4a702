use std::collections::HashMap;
use std::f32::consts::PI;

use eframe::egui::{Rect, Vec2, pos2, vec2};
use tracing::{debug, warn};

use crate::dataset::{Dataset, LinkRecord, NodeRecord};

const INITIAL_RADIUS: f32 = 10.0;

pub(super) struct SimNode {
    pub(super) record: NodeRecord,
    pub(super) position: Vec2,
    pub(super) velocity: Vec2,
    pub(super) pin: Option<Vec2>,
}

impl SimNode {
    pub(super) fn display_position(&self) -> Vec2 {
        self.pin.unwrap_or(self.position)
    }
}

pub(super) struct SimLink {
    pub(super) record: LinkRecord,
    pub(super) source: Option<usize>,
    pub(super) target: Option<usize>,
}

impl SimLink {
    pub(super) fn endpoints(&self) -> Option<(usize, usize)> {
        Some((self.source?, self.target?))
    }

    pub(super) fn touches(&self, index: usize) -> bool {
        self.source == Some(index) || self.target == Some(index)
    }
}

/// Live node/link arena for the current dataset. Positions and pins are
/// owned here; everything else is copied from the snapshot at load time.
#[derive(Default)]
pub(super) struct GraphModel {
    pub(super) nodes: Vec<SimNode>,
    pub(super) links: Vec<SimLink>,
    index_by_id: HashMap<String, usize>,
    neighbors: Vec<Vec<usize>>,
    degree: Vec<usize>,
    generation: u64,
}

/// Seed position for the `index`-th node: a phyllotaxis spiral around the
/// model origin, so no two nodes start on the same spot.
pub(super) fn seed_position(index: usize) -> Vec2 {
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * PI * (3.0 - 5.0_f32.sqrt());
    vec2(radius * angle.cos(), radius * angle.sin())
}

impl GraphModel {
    /// Replaces every node and link with the contents of `dataset`.
    /// Returns `false` without touching state when the dataset is empty.
    pub(super) fn load(&mut self, dataset: &Dataset) -> bool {
        if dataset.is_empty() {
            debug!("ignoring empty dataset");
            return false;
        }

        let mut nodes = Vec::with_capacity(dataset.nodes.len());
        let mut index_by_id = HashMap::with_capacity(dataset.nodes.len());
        for record in &dataset.nodes {
            if index_by_id.contains_key(&record.id) {
                warn!(id = %record.id, "duplicate node id; keeping the first occurrence");
                continue;
            }

            let index = nodes.len();
            index_by_id.insert(record.id.clone(), index);
            nodes.push(SimNode {
                record: record.clone(),
                position: seed_position(index),
                velocity: Vec2::ZERO,
                pin: None,
            });
        }

        let mut neighbors = vec![Vec::new(); nodes.len()];
        let mut degree = vec![0usize; nodes.len()];
        let mut links = Vec::with_capacity(dataset.links.len());
        let mut dangling = 0usize;
        for record in &dataset.links {
            let source = index_by_id.get(&record.source).copied();
            let target = index_by_id.get(&record.target).copied();

            if let (Some(source), Some(target)) = (source, target) {
                degree[source] += 1;
                degree[target] += 1;
                if !neighbors[source].contains(&target) {
                    neighbors[source].push(target);
                }
                if !neighbors[target].contains(&source) {
                    neighbors[target].push(source);
                }
            } else {
                dangling += 1;
                warn!(
                    id = ?record.id,
                    source = %record.source,
                    target = %record.target,
                    kind = %record.kind,
                    "link references an unknown node and will not be drawn"
                );
            }

            links.push(SimLink {
                record: record.clone(),
                source,
                target,
            });
        }

        self.nodes = nodes;
        self.links = links;
        self.index_by_id = index_by_id;
        self.neighbors = neighbors;
        self.degree = degree;
        self.generation += 1;

        debug!(
            generation = self.generation,
            nodes = self.nodes.len(),
            links = self.links.len(),
            dangling,
            "geometry model replaced"
        );
        true
    }

    pub(super) fn generation(&self) -> u64 {
        self.generation
    }

    pub(super) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(super) fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub(super) fn find_node(&self, id: &str) -> Option<&SimNode> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub(super) fn pin(&mut self, id: &str, position: Vec2) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(id, "pin ignored for unknown node");
            return false;
        };
        self.pin_index(index, position)
    }

    pub(super) fn unpin(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(id, "unpin ignored for unknown node");
            return false;
        };
        self.unpin_index(index)
    }

    pub(super) fn pin_index(&mut self, index: usize, position: Vec2) -> bool {
        let Some(node) = self.nodes.get_mut(index) else {
            return false;
        };
        node.pin = Some(position);
        true
    }

    pub(super) fn unpin_index(&mut self, index: usize) -> bool {
        let Some(node) = self.nodes.get_mut(index) else {
            return false;
        };
        node.pin = None;
        true
    }

    pub(super) fn display_position(&self, index: usize) -> Option<Vec2> {
        self.nodes.get(index).map(SimNode::display_position)
    }

    pub(super) fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(super) fn degree(&self, index: usize) -> usize {
        self.degree.get(index).copied().unwrap_or(0)
    }

    pub(super) fn bounds(&self) -> Option<Rect> {
        let mut positions = self
            .nodes
            .iter()
            .map(SimNode::display_position)
            .filter(|position| position.x.is_finite() && position.y.is_finite());
        let first = positions.next()?;
        let mut rect = Rect::from_min_max(pos2(first.x, first.y), pos2(first.x, first.y));
        for position in positions {
            rect.extend_with(pos2(position.x, position.y));
        }
        Some(rect)
    }
}
