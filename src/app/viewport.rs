use std::ops::RangeInclusive;

use eframe::egui::{Pos2, Rect, Vec2, pos2};
use tracing::debug;

const RESET_SCALE: f32 = 0.8;
const FOCUS_SCALE: f32 = 1.5;
const RESET_DURATION_SECS: f64 = 0.5;
const FOCUS_DURATION_SECS: f64 = 0.75;

/// Model → screen mapping: `screen = model * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ViewTransform {
    pub(super) scale: f32,
    pub(super) translate: Vec2,
}

impl ViewTransform {
    pub(super) const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    pub(super) fn apply(self, model: Vec2) -> Pos2 {
        (model * self.scale + self.translate).to_pos2()
    }

    pub(super) fn invert(self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.translate) / self.scale
    }

    /// Transform that puts `model_center` in the middle of a `size` canvas.
    fn centered_on(model_center: Vec2, scale: f32, size: Vec2) -> Self {
        Self {
            scale,
            translate: size * 0.5 - model_center * scale,
        }
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            scale: self.scale + (other.scale - self.scale) * t,
            translate: self.translate + (other.translate - self.translate) * t,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    from: ViewTransform,
    to: ViewTransform,
    start: f64,
    duration: f64,
}

fn ease_cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
    }
}

pub(super) struct Viewport {
    size: Vec2,
    transform: ViewTransform,
    scale_extent: RangeInclusive<f32>,
    transition: Option<Transition>,
}

impl Viewport {
    pub(super) fn new(scale_extent: RangeInclusive<f32>) -> Self {
        Self {
            size: Vec2::ZERO,
            transform: ViewTransform::IDENTITY,
            scale_extent,
            transition: None,
        }
    }

    pub(super) fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Where the running transition ends, or the current transform.
    pub(super) fn target(&self) -> ViewTransform {
        self.transition
            .map(|transition| transition.to)
            .unwrap_or(self.transform)
    }

    pub(super) fn size(&self) -> Vec2 {
        self.size
    }

    pub(super) fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub(super) fn set_scale_extent(&mut self, scale_extent: RangeInclusive<f32>) {
        self.scale_extent = scale_extent;
    }

    /// Keeps the model point at the canvas centre fixed across resizes.
    pub(super) fn set_size(&mut self, size: Vec2) {
        if size == self.size {
            return;
        }
        let shift = (size - self.size) * 0.5;
        self.size = size;
        self.transform.translate += shift;
        if let Some(transition) = &mut self.transition {
            transition.from.translate += shift;
            transition.to.translate += shift;
        }
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(*self.scale_extent.start(), *self.scale_extent.end())
    }

    fn finish_transition(&mut self) {
        if let Some(transition) = self.transition.take() {
            self.transform = transition.to;
        }
    }

    /// Multiplies the scale by `factor`, keeping the model point under
    /// `center` (screen space) in place.
    pub(super) fn zoom_by(&mut self, factor: f32, center: Pos2) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.finish_transition();

        let anchor = self.transform.invert(center);
        let scale = self.clamp_scale(self.transform.scale * factor);
        self.transform = ViewTransform {
            scale,
            translate: center.to_vec2() - anchor * scale,
        };
    }

    pub(super) fn pan_by(&mut self, delta: Vec2) {
        self.finish_transition();
        self.transform.translate += delta;
    }

    fn default_transform(&self, bounds: Option<Rect>) -> ViewTransform {
        let center = bounds.map(|rect| rect.center().to_vec2()).unwrap_or(Vec2::ZERO);
        ViewTransform::centered_on(center, self.clamp_scale(RESET_SCALE), self.size)
    }

    /// Jumps straight to the default transform; used when a dataset is
    /// replaced so no old animation keeps running.
    pub(super) fn snap_to_default(&mut self, bounds: Option<Rect>) {
        self.transition = None;
        self.transform = self.default_transform(bounds);
    }

    pub(super) fn reset(&mut self, bounds: Option<Rect>, now: f64) {
        let target = self.default_transform(bounds);
        self.animate_to(target, now, RESET_DURATION_SECS);
    }

    /// Animates to a close-up of `position`. Returns `false` when the
    /// position is not usable yet.
    pub(super) fn focus(&mut self, position: Vec2, now: f64) -> bool {
        if !position.x.is_finite() || !position.y.is_finite() {
            debug!("focus ignored for unresolved position");
            return false;
        }
        let target = ViewTransform::centered_on(position, self.clamp_scale(FOCUS_SCALE), self.size);
        self.animate_to(target, now, FOCUS_DURATION_SECS);
        true
    }

    fn animate_to(&mut self, target: ViewTransform, now: f64, duration: f64) {
        if self.target() == target && self.transition.is_none() {
            return;
        }
        self.transition = Some(Transition {
            from: self.transform,
            to: target,
            start: now,
            duration,
        });
    }

    /// Steps a running transition. Returns `true` while still animating.
    pub(super) fn advance(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };

        let progress = ((now - transition.start) / transition.duration).clamp(0.0, 1.0) as f32;
        if progress >= 1.0 {
            self.transform = transition.to;
            self.transition = None;
            return false;
        }

        self.transform = transition.from.lerp(transition.to, ease_cubic_in_out(progress));
        true
    }

    pub(super) fn screen_center(&self) -> Pos2 {
        pos2(self.size.x * 0.5, self.size.y * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn viewport() -> Viewport {
        let mut viewport = Viewport::new(0.1..=4.0);
        viewport.set_size(vec2(800.0, 600.0));
        viewport
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn apply_and_invert_are_inverse() {
        let transform = ViewTransform {
            scale: 2.5,
            translate: vec2(-40.0, 12.0),
        };
        let model = vec2(13.0, -7.5);
        let round_trip = transform.invert(transform.apply(model));
        assert_close(round_trip.x, model.x);
        assert_close(round_trip.y, model.y);
    }

    #[test]
    fn zoom_in_then_out_restores_scale() {
        let mut viewport = viewport();
        let original = viewport.transform();
        viewport.zoom_by(2.0, pos2(100.0, 100.0));
        assert_close(viewport.transform().scale, original.scale * 2.0);
        viewport.zoom_by(0.5, pos2(100.0, 100.0));
        assert_close(viewport.transform().scale, original.scale);
        assert_close(viewport.transform().translate.x, original.translate.x);
        assert_close(viewport.transform().translate.y, original.translate.y);
    }

    #[test]
    fn zoom_keeps_anchor_fixed_and_clamps() {
        let mut viewport = viewport();
        let anchor = pos2(320.0, 40.0);
        let model_before = viewport.transform().invert(anchor);
        viewport.zoom_by(1.7, anchor);
        let model_after = viewport.transform().invert(anchor);
        assert_close(model_before.x, model_after.x);
        assert_close(model_before.y, model_after.y);

        viewport.zoom_by(1000.0, anchor);
        assert_close(viewport.transform().scale, 4.0);
        viewport.zoom_by(0.000_001, anchor);
        assert_close(viewport.transform().scale, 0.1);
    }

    #[test]
    fn reset_centers_bounds_and_is_idempotent() {
        let mut viewport = viewport();
        let bounds = Rect::from_min_max(pos2(-100.0, 20.0), pos2(300.0, 220.0));

        viewport.reset(Some(bounds), 0.0);
        let first = viewport.target();
        assert_close(first.scale, RESET_SCALE);
        let center = first.apply(bounds.center().to_vec2());
        assert_close(center.x, 400.0);
        assert_close(center.y, 300.0);

        viewport.reset(Some(bounds), 0.1);
        assert_eq!(viewport.target(), first);

        assert!(!viewport.advance(10.0));
        assert_eq!(viewport.transform(), first);
        viewport.reset(Some(bounds), 11.0);
        assert!(!viewport.is_animating());
    }

    #[test]
    fn focus_animates_to_close_up() {
        let mut viewport = viewport();
        assert!(viewport.focus(vec2(50.0, -25.0), 1.0));
        assert!(viewport.advance(1.2));
        let midway = viewport.transform();
        assert!(midway.scale > RESET_SCALE.min(1.0) - 1e-3 && midway.scale < FOCUS_SCALE);

        assert!(!viewport.advance(2.0));
        let settled = viewport.transform();
        assert_close(settled.scale, FOCUS_SCALE);
        let center = settled.apply(vec2(50.0, -25.0));
        assert_close(center.x, 400.0);
        assert_close(center.y, 300.0);
    }

    #[test]
    fn focus_ignores_unresolved_positions() {
        let mut viewport = viewport();
        assert!(!viewport.focus(vec2(f32::NAN, 0.0), 0.0));
        assert!(!viewport.is_animating());
    }

    #[test]
    fn snap_cancels_running_transition() {
        let mut viewport = viewport();
        viewport.focus(vec2(500.0, 500.0), 0.0);
        viewport.snap_to_default(None);
        assert!(!viewport.is_animating());
        assert_eq!(viewport.transform().apply(Vec2::ZERO), pos2(400.0, 300.0));
    }

    #[test]
    fn resize_keeps_center_point() {
        let mut viewport = viewport();
        viewport.snap_to_default(None);
        let model_center = viewport.transform().invert(viewport.screen_center());
        viewport.set_size(vec2(1200.0, 900.0));
        let after = viewport.transform().invert(viewport.screen_center());
        assert_close(model_center.x, after.x);
        assert_close(model_center.y, after.y);
    }
}
