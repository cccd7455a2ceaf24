//! Pointer input normalization.
//!
//! Client coordinates arrive in CSS pixels relative to the viewport; the
//! simulation works in normalized canvas space with the origin at the
//! bottom-left corner.

use crate::config::RippleConfig;
use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Canvas bounding rect in client (CSS) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A client position mapped into normalized canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPoint {
    pub inside: bool,
    pub pos: Vec2,
}

impl CanvasRect {
    pub fn normalize(&self, client_x: f32, client_y: f32) -> CanvasPoint {
        let x_raw = client_x - self.left;
        let y_raw = client_y - self.top;
        let inside = x_raw >= 0.0 && x_raw <= self.width && y_raw >= 0.0 && y_raw <= self.height;
        let x = (x_raw / self.width.max(1.0)).clamp(0.0, 1.0);
        let y = (1.0 - y_raw / self.height.max(1.0)).clamp(0.0, 1.0);
        CanvasPoint {
            inside,
            pos: Vec2::new(x, y),
        }
    }
}

/// Single logical pointer (mouse or first touch).
#[derive(Clone, Debug, PartialEq)]
pub struct PointerState {
    /// Pressed / touching.
    pub active: bool,
    /// Last known position lies within the canvas bounds.
    pub inside: bool,
    pub position: Vec2,
    /// Accumulated displacement since the last ticks, decays every tick.
    pub delta: Vec2,
    /// Unconsumed motion energy.
    pub impulse: f32,
    pub kind: PointerKind,
    pub last_emit: Option<Vec2>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            active: false,
            inside: false,
            position: Vec2::splat(0.5),
            delta: Vec2::ZERO,
            impulse: 0.0,
            kind: PointerKind::Mouse,
            last_emit: None,
        }
    }
}

impl PointerState {
    /// Drop motion history so the next emission is not spacing-throttled.
    pub fn clear_motion(&mut self) {
        self.delta = Vec2::ZERO;
        self.impulse = 0.0;
        self.last_emit = None;
    }
}

/// Map a per-event motion magnitude to an emission impulse.
#[inline]
pub fn motion_impulse(motion: f32, kind: PointerKind, cfg: &RippleConfig) -> f32 {
    let touch = match kind {
        PointerKind::Touch => cfg.touch_motion_multiplier,
        PointerKind::Mouse => 1.0,
    };
    (motion * cfg.motion_scale * touch).clamp(cfg.impulse_min, cfg.impulse_max)
}

/// Impulse used for a press or tap.
#[inline]
pub fn tap_impulse(kind: PointerKind, cfg: &RippleConfig) -> f32 {
    match kind {
        PointerKind::Touch => cfg.tap_boost * cfg.touch_tap_multiplier,
        PointerKind::Mouse => cfg.tap_boost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> CanvasRect {
        CanvasRect {
            left: 100.0,
            top: 50.0,
            width: 400.0,
            height: 200.0,
        }
    }

    #[test]
    fn normalize_flips_y() {
        let p = rect().normalize(100.0, 50.0);
        assert!(p.inside);
        assert_eq!(p.pos, Vec2::new(0.0, 1.0));
        let p = rect().normalize(500.0, 250.0);
        assert!(p.inside);
        assert_eq!(p.pos, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn outside_points_are_clamped_and_flagged() {
        let p = rect().normalize(20.0, 400.0);
        assert!(!p.inside);
        assert_eq!(p.pos, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn impulse_is_bounded() {
        let cfg = RippleConfig::default();
        assert_eq!(motion_impulse(0.0, PointerKind::Mouse, &cfg), cfg.impulse_min);
        assert_eq!(motion_impulse(10.0, PointerKind::Touch, &cfg), cfg.impulse_max);
        let m = motion_impulse(0.01, PointerKind::Touch, &cfg);
        assert!((m - 0.01 * 27.0 * 1.24).abs() < 1e-5);
    }
}
