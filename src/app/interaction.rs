use eframe::egui::{Pos2, Vec2};

use super::highlight::HighlightMode;

/// Pointer travel (screen px) that still counts as a click.
const CLICK_TOLERANCE: f32 = 3.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(super) enum PointerState {
    #[default]
    Idle,
    Hovered {
        node: usize,
    },
    Dragging {
        node: usize,
        origin: Pos2,
        moved: bool,
    },
    Panning {
        last: Pos2,
    },
}

/// What the engine must do in response to a pointer event.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum InteractionEffect {
    Highlight(HighlightMode),
    /// Pin the node where it currently is and keep the solver hot.
    Grab {
        node: usize,
    },
    DragTo {
        node: usize,
        position: Vec2,
    },
    Release {
        node: usize,
        keep_pinned: bool,
    },
    Select {
        node: usize,
    },
    Pan(Vec2),
}

/// Hover/drag/click state machine. Reads nothing but its inputs; all
/// mutation happens in the engine when it applies the returned effects.
#[derive(Default)]
pub(super) struct InteractionHandler {
    state: PointerState,
    keep_pinned_after_drag: bool,
}

impl InteractionHandler {
    pub(super) fn new(keep_pinned_after_drag: bool) -> Self {
        Self {
            state: PointerState::Idle,
            keep_pinned_after_drag,
        }
    }

    pub(super) fn state(&self) -> PointerState {
        self.state
    }

    pub(super) fn set_keep_pinned_after_drag(&mut self, keep: bool) {
        self.keep_pinned_after_drag = keep;
    }

    pub(super) fn reset(&mut self) {
        self.state = PointerState::Idle;
    }

    fn hover_effects(
        &mut self,
        hit: Option<usize>,
        node_id: impl Fn(usize) -> Option<String>,
    ) -> Vec<InteractionEffect> {
        let current = match self.state {
            PointerState::Hovered { node } => Some(node),
            _ => None,
        };
        if current == hit {
            return Vec::new();
        }

        match hit.and_then(|node| node_id(node).map(|id| (node, id))) {
            Some((node, id)) => {
                self.state = PointerState::Hovered { node };
                vec![InteractionEffect::Highlight(HighlightMode::Neighbors(id))]
            }
            None => {
                self.state = PointerState::Idle;
                if current.is_some() {
                    vec![InteractionEffect::Highlight(HighlightMode::None)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// `hit` is the node under the pointer, `model` the pointer in model
    /// coordinates.
    pub(super) fn pointer_moved(
        &mut self,
        hit: Option<usize>,
        screen: Pos2,
        model: Vec2,
        node_id: impl Fn(usize) -> Option<String>,
    ) -> Vec<InteractionEffect> {
        match self.state {
            PointerState::Dragging {
                node,
                origin,
                moved,
            } => {
                let moved = moved || screen.distance(origin) > CLICK_TOLERANCE;
                self.state = PointerState::Dragging {
                    node,
                    origin,
                    moved,
                };
                if moved {
                    vec![InteractionEffect::DragTo {
                        node,
                        position: model,
                    }]
                } else {
                    Vec::new()
                }
            }
            PointerState::Panning { last } => {
                self.state = PointerState::Panning { last: screen };
                vec![InteractionEffect::Pan(screen - last)]
            }
            PointerState::Idle | PointerState::Hovered { .. } => self.hover_effects(hit, node_id),
        }
    }

    pub(super) fn pointer_pressed(
        &mut self,
        hit: Option<usize>,
        screen: Pos2,
    ) -> Vec<InteractionEffect> {
        match hit {
            Some(node) => {
                self.state = PointerState::Dragging {
                    node,
                    origin: screen,
                    moved: false,
                };
                vec![InteractionEffect::Grab { node }]
            }
            None => {
                let mut effects = Vec::new();
                if matches!(self.state, PointerState::Hovered { .. }) {
                    effects.push(InteractionEffect::Highlight(HighlightMode::None));
                }
                self.state = PointerState::Panning { last: screen };
                effects
            }
        }
    }

    pub(super) fn pointer_released(
        &mut self,
        hit: Option<usize>,
        node_id: impl Fn(usize) -> Option<String>,
    ) -> Vec<InteractionEffect> {
        match self.state {
            PointerState::Dragging { node, moved, .. } => {
                let mut effects = vec![InteractionEffect::Release {
                    node,
                    keep_pinned: self.keep_pinned_after_drag,
                }];
                if !moved {
                    effects.push(InteractionEffect::Select { node });
                }

                if hit == Some(node) {
                    self.state = PointerState::Hovered { node };
                } else {
                    self.state = PointerState::Idle;
                    effects.push(InteractionEffect::Highlight(HighlightMode::None));
                    effects.extend(self.hover_effects(hit, node_id));
                }
                effects
            }
            PointerState::Panning { .. } => {
                self.state = PointerState::Idle;
                self.hover_effects(hit, node_id)
            }
            PointerState::Idle | PointerState::Hovered { .. } => Vec::new(),
        }
    }

    /// Pointer left the canvas. Drags keep going; hover ends.
    pub(super) fn pointer_left(&mut self) -> Vec<InteractionEffect> {
        match self.state {
            PointerState::Hovered { .. } => {
                self.state = PointerState::Idle;
                vec![InteractionEffect::Highlight(HighlightMode::None)]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn ids(node: usize) -> Option<String> {
        Some(format!("n{node}"))
    }

    #[test]
    fn hover_enter_and_leave() {
        let mut handler = InteractionHandler::default();
        let effects = handler.pointer_moved(Some(2), pos2(10.0, 10.0), Vec2::ZERO, ids);
        assert_eq!(
            effects,
            vec![InteractionEffect::Highlight(HighlightMode::Neighbors("n2".to_owned()))]
        );
        assert_eq!(handler.state(), PointerState::Hovered { node: 2 });

        assert!(handler.pointer_moved(Some(2), pos2(11.0, 10.0), Vec2::ZERO, ids).is_empty());

        let effects = handler.pointer_moved(None, pos2(90.0, 90.0), Vec2::ZERO, ids);
        assert_eq!(effects, vec![InteractionEffect::Highlight(HighlightMode::None)]);
        assert_eq!(handler.state(), PointerState::Idle);
    }

    #[test]
    fn moving_between_nodes_switches_highlight() {
        let mut handler = InteractionHandler::default();
        handler.pointer_moved(Some(1), pos2(0.0, 0.0), Vec2::ZERO, ids);
        let effects = handler.pointer_moved(Some(4), pos2(5.0, 0.0), Vec2::ZERO, ids);
        assert_eq!(
            effects,
            vec![InteractionEffect::Highlight(HighlightMode::Neighbors("n4".to_owned()))]
        );
    }

    #[test]
    fn click_selects_without_drag() {
        let mut handler = InteractionHandler::default();
        handler.pointer_moved(Some(3), pos2(50.0, 50.0), Vec2::ZERO, ids);
        assert_eq!(
            handler.pointer_pressed(Some(3), pos2(50.0, 50.0)),
            vec![InteractionEffect::Grab { node: 3 }]
        );
        assert!(
            handler
                .pointer_moved(Some(3), pos2(51.0, 51.0), vec2(1.0, 1.0), ids)
                .is_empty()
        );

        let effects = handler.pointer_released(Some(3), ids);
        assert_eq!(
            effects,
            vec![
                InteractionEffect::Release {
                    node: 3,
                    keep_pinned: false
                },
                InteractionEffect::Select { node: 3 },
            ]
        );
        assert_eq!(handler.state(), PointerState::Hovered { node: 3 });
    }

    #[test]
    fn drag_moves_pin_and_suppresses_click() {
        let mut handler = InteractionHandler::new(true);
        handler.pointer_pressed(Some(0), pos2(0.0, 0.0));
        let effects = handler.pointer_moved(Some(0), pos2(40.0, 0.0), vec2(20.0, 0.0), ids);
        assert_eq!(
            effects,
            vec![InteractionEffect::DragTo {
                node: 0,
                position: vec2(20.0, 0.0)
            }]
        );

        let effects = handler.pointer_moved(Some(0), pos2(41.0, 0.0), vec2(20.5, 0.0), ids);
        assert_eq!(effects.len(), 1);

        let effects = handler.pointer_released(Some(0), ids);
        assert_eq!(
            effects,
            vec![InteractionEffect::Release {
                node: 0,
                keep_pinned: true
            }]
        );
    }

    #[test]
    fn releasing_away_from_node_clears_highlight() {
        let mut handler = InteractionHandler::default();
        handler.pointer_moved(Some(0), pos2(0.0, 0.0), Vec2::ZERO, ids);
        handler.pointer_pressed(Some(0), pos2(0.0, 0.0));
        handler.pointer_moved(None, pos2(100.0, 0.0), vec2(100.0, 0.0), ids);
        let effects = handler.pointer_released(None, ids);
        assert!(effects.contains(&InteractionEffect::Highlight(HighlightMode::None)));
        assert_eq!(handler.state(), PointerState::Idle);
    }

    #[test]
    fn background_drag_pans() {
        let mut handler = InteractionHandler::default();
        assert!(handler.pointer_pressed(None, pos2(10.0, 10.0)).is_empty());
        assert_eq!(
            handler.pointer_moved(None, pos2(25.0, 5.0), Vec2::ZERO, ids),
            vec![InteractionEffect::Pan(vec2(15.0, -5.0))]
        );
        assert!(handler.pointer_released(None, ids).is_empty());
        assert_eq!(handler.state(), PointerState::Idle);
    }

    #[test]
    fn leaving_canvas_ends_hover_but_not_drag() {
        let mut handler = InteractionHandler::default();
        handler.pointer_moved(Some(1), pos2(0.0, 0.0), Vec2::ZERO, ids);
        assert_eq!(
            handler.pointer_left(),
            vec![InteractionEffect::Highlight(HighlightMode::None)]
        );

        handler.pointer_pressed(Some(1), pos2(0.0, 0.0));
        assert!(handler.pointer_left().is_empty());
        assert!(matches!(handler.state(), PointerState::Dragging { node: 1, .. }));
    }
}
