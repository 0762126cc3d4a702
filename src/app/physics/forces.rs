use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

const MIN_DISTANCE_SQ: f32 = 1.0;

/// Deterministic unit direction for a pair of coincident points. Swapping
/// the pair flips the sign so both ends are pushed apart.
pub(super) fn jiggle(a: usize, b: usize) -> Vec2 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214 + 0.37) * TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if a <= b { direction } else { -direction }
}

pub(super) struct LinkSprings<'a> {
    pub(super) links: &'a [(usize, usize)],
    pub(super) degree: &'a [usize],
    pub(super) rest_length: f32,
    pub(super) alpha: f32,
}

/// Spring pull toward `rest_length`, evaluated on predicted positions.
/// Strength is `1 / min(degree)` and the correction is split by degree so
/// hubs move less than leaves.
pub(super) fn accumulate_link_springs(
    springs: LinkSprings<'_>,
    predicted: &[Vec2],
    deltas: &mut [Vec2],
) {
    for &(source, target) in springs.links {
        if source == target || source >= predicted.len() || target >= predicted.len() {
            continue;
        }

        let source_degree = springs.degree[source].max(1) as f32;
        let target_degree = springs.degree[target].max(1) as f32;
        let strength = 1.0 / source_degree.min(target_degree);
        let bias = source_degree / (source_degree + target_degree);

        let mut delta = predicted[target] - predicted[source];
        let mut distance = delta.length();
        if distance <= f32::EPSILON {
            delta = jiggle(source, target) * 1e-3;
            distance = delta.length();
        }

        let stretch = (distance - springs.rest_length) / distance * springs.alpha * strength;
        let correction = delta * stretch;
        deltas[target] -= correction * bias;
        deltas[source] += correction * (1.0 - bias);
    }
}

fn charge_between(index: usize, other: usize, point: Vec2, other_point: Vec2, weight: f32) -> Vec2 {
    let mut delta = other_point - point;
    let mut distance_sq = delta.length_sq();
    if distance_sq <= f32::EPSILON {
        delta = jiggle(index, other);
        distance_sq = 1.0;
    }
    delta * (weight / distance_sq.max(MIN_DISTANCE_SQ))
}

/// Many-body charge on `index` through the Barnes-Hut tree. A negative
/// `strength_alpha` repels.
pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength_alpha: f32,
    theta: f32,
    delta: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            *delta += charge_between(index, other, point, positions[other], strength_alpha);
        }
        return;
    }

    let offset = node.center_of_mass - point;
    let distance_sq = offset.length_sq().max(MIN_DISTANCE_SQ);
    let can_approximate = !node.bounds.contains(point)
        && (node.bounds.side_length() / distance_sq.sqrt()) < theta;

    if can_approximate {
        *delta += offset * (strength_alpha * node.mass / distance_sq);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, strength_alpha, theta, delta);
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) radius: f32,
    pub(super) strength: f32,
}

fn resolve_overlap(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    let min_distance = params.radius * 2.0;
    let mut offset = predicted[from] - predicted[to];
    let mut distance_sq = offset.length_sq();
    if distance_sq >= min_distance * min_distance {
        return;
    }

    if distance_sq <= f32::EPSILON {
        offset = jiggle(from, to) * 1e-3;
        distance_sq = offset.length_sq();
    }

    let distance = distance_sq.sqrt();
    // Equal radii: each side takes half of the overlap.
    let push = offset * ((min_distance - distance) / distance * params.strength * 0.5);
    deltas[from] += push;
    deltas[to] -= push;
}

/// Dual-tree traversal over predicted positions, pruning node pairs whose
/// bounds are further apart than one collision diameter.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    predicted: &[Vec2],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    let reach = params.radius * 2.0;
    if node_a.bounds.distance_sq_to(node_b.bounds) > reach * reach {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (position, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[position + 1..] {
                    resolve_overlap(from, to, predicted, params, deltas);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_overlap(from, to, predicted, params, deltas);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_deref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, predicted, params, deltas);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_deref() else {
                    continue;
                };
                accumulate_collision_pairs(child_a, child_b, false, predicted, params, deltas);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, predicted, params, deltas);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, predicted, params, deltas);
        }
    }
}
