//! Ripple point set: pointer tracking, throttled emission and integration.
//!
//! All decay is continuous exponential decay sampled per tick
//! (`exp(-k * dt)`), so the result only depends on elapsed time and not on
//! the frame rate. Radius growth is `r *= 1 + k * dt`, first-order
//! frame-rate independent.

use crate::config::{RippleConfig, MAX_RIPPLE_POINTS};
use crate::device::DeviceClass;
use crate::pointer::{motion_impulse, tap_impulse, CanvasPoint, PointerKind, PointerState};
use glam::Vec2;
use rand::prelude::*;
use std::collections::VecDeque;
use std::f32::consts::TAU;

/// Accumulated displacement shorter than this has no usable direction.
const DIRECTION_EPSILON: f32 = 0.00001;
/// Per-axis displacement below this snaps to zero.
const DELTA_SNAP: f32 = 0.00002;

/// One disturbance on the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct RipplePoint {
    /// Normalized canvas position, origin bottom-left.
    pub position: Vec2,
    /// Normalized units per second.
    pub velocity: Vec2,
    pub amplitude: f32,
    pub radius: f32,
    pub age: f32,
    pub life: f32,
    pub phase: f32,
}

impl RipplePoint {
    /// Contribution of this point to the loop's activity estimate.
    #[inline]
    pub fn energy(&self, age_falloff: f32) -> f32 {
        self.amplitude * (-self.age * age_falloff).exp()
    }

    fn is_alive(&self, cfg: &RippleConfig) -> bool {
        let lo = -cfg.bounds_margin;
        let hi = 1.0 + cfg.bounds_margin;
        self.age < self.life
            && self.amplitude > cfg.amplitude_floor
            && self.position.x > lo
            && self.position.x < hi
            && self.position.y > lo
            && self.position.y < hi
    }
}

/// Outcome of feeding one pointer event into the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerUpdate {
    pub inside: bool,
    pub emitted: bool,
}

pub struct RippleField {
    cfg: RippleConfig,
    points: VecDeque<RipplePoint>,
    pointer: PointerState,
    activity: f32,
    device: DeviceClass,
    rng: StdRng,
}

impl RippleField {
    /// `max_points` is clamped to `1..=MAX_RIPPLE_POINTS`; the field always
    /// holds at least the latest emission.
    pub fn new(mut cfg: RippleConfig, seed: u64) -> Self {
        cfg.max_points = cfg.max_points.clamp(1, MAX_RIPPLE_POINTS);
        let capacity = cfg.max_points;
        Self {
            cfg,
            points: VecDeque::with_capacity(capacity),
            pointer: PointerState::default(),
            activity: 0.0,
            device: DeviceClass::Desktop,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn config(&self) -> &RippleConfig {
        &self.cfg
    }

    #[inline]
    pub fn points(&self) -> &VecDeque<RipplePoint> {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    #[inline]
    pub fn activity(&self) -> f32 {
        self.activity
    }

    #[inline]
    pub fn device_class(&self) -> DeviceClass {
        self.device
    }

    pub fn set_device_class(&mut self, device: DeviceClass) {
        self.device = device;
    }

    /// Whether anything is left to animate.
    pub fn is_active(&self) -> bool {
        self.pointer.active
            || self.pointer.impulse > self.cfg.idle_impulse_threshold
            || !self.points.is_empty()
            || self.activity > self.cfg.idle_threshold
    }

    /// Try to add a point at `pos`. Unforced requests closer than the device
    /// spacing to the previous emission are rejected.
    pub fn emit(&mut self, pos: Vec2, motion: f32, kind: PointerKind, force: bool) -> bool {
        let cfg = &self.cfg;
        if !force {
            if let Some(last) = self.pointer.last_emit {
                if pos.distance(last) < cfg.trail_spacing(self.device) {
                    return false;
                }
            }
        }

        let amplitude = (motion * cfg.amplitude_scale).clamp(cfg.amplitude_min, cfg.amplitude_max);
        let jitter = (self.rng.gen::<f32>() - 0.5) * cfg.radius_jitter;
        let radius = (cfg.radius_base(self.device) + jitter).clamp(cfg.radius_min, cfg.radius_max);

        let delta_len = self.pointer.delta.length();
        let direction = if delta_len > DIRECTION_EPSILON {
            self.pointer.delta / delta_len
        } else {
            Vec2::ZERO
        };
        let touch = match kind {
            PointerKind::Touch => cfg.touch_velocity_multiplier,
            PointerKind::Mouse => 1.0,
        };
        let velocity = direction * (cfg.velocity_scale * amplitude * touch);

        let point = RipplePoint {
            position: pos.clamp(Vec2::ZERO, Vec2::ONE),
            velocity,
            amplitude,
            radius,
            age: 0.0,
            life: cfg.life_base + self.rng.gen::<f32>() * cfg.life_jitter,
            phase: self.rng.gen::<f32>() * TAU,
        };

        if self.points.len() >= cfg.max_points {
            self.points.pop_front();
        }
        self.pointer.last_emit = Some(point.position);
        self.activity = self.activity.max(amplitude * cfg.emit_activity_weight);
        self.points.push_back(point);
        true
    }

    /// Pointer moved to `point`. Leaving the canvas resets spacing; sufficient
    /// motion inside it raises the impulse and requests an emission.
    pub fn pointer_move(&mut self, point: CanvasPoint, kind: PointerKind) -> PointerUpdate {
        if !point.inside {
            self.pointer.inside = false;
            self.pointer.last_emit = None;
            return PointerUpdate::default();
        }

        let d = if self.pointer.inside {
            point.pos - self.pointer.position
        } else {
            Vec2::ZERO
        };
        let motion = d.length();

        self.pointer.kind = kind;
        self.pointer.position = point.pos;
        self.pointer.inside = true;
        self.pointer.delta += d;

        let mut emitted = false;
        if motion > self.cfg.motion_epsilon {
            let impulse = motion_impulse(motion, kind, &self.cfg);
            self.pointer.impulse = self.pointer.impulse.max(impulse);
            self.activity = self.activity.max(impulse * self.cfg.move_activity_weight);
            emitted = self.emit(point.pos, impulse, kind, false);
        }
        PointerUpdate {
            inside: true,
            emitted,
        }
    }

    /// Press or tap. Always emits a boosted point when inside the canvas.
    pub fn pointer_down(&mut self, point: CanvasPoint, kind: PointerKind) -> PointerUpdate {
        let update = self.pointer_move(point, kind);
        if !update.inside {
            return update;
        }
        let boost = tap_impulse(kind, &self.cfg);
        self.pointer.active = true;
        self.pointer.impulse = self.pointer.impulse.max(boost);
        let pos = self.pointer.position;
        let emitted = self.emit(pos, boost, kind, true);
        PointerUpdate {
            inside: true,
            emitted: emitted || update.emitted,
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer.active = false;
    }

    /// Touch lifted: the logical pointer leaves the surface entirely.
    pub fn touch_end(&mut self) {
        self.pointer.active = false;
        self.pointer.inside = false;
        self.pointer.last_emit = None;
    }

    /// Advance the simulation by `dt` seconds (clamped). Returns the clamped
    /// step that was applied.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let dt = self.cfg.clamp_dt(dt);
        let cfg = &self.cfg;
        let velocity_decay = (-cfg.velocity_damping * dt).exp();
        let amplitude_decay = (-cfg.amplitude_damping * dt).exp();
        let radius_grow = 1.0 + cfg.radius_expand * dt;

        for p in self.points.iter_mut() {
            p.age += dt;
            p.position += p.velocity * dt;
            p.velocity *= velocity_decay;
            p.amplitude *= amplitude_decay;
            p.radius = (p.radius * radius_grow).min(cfg.radius_max);
        }
        self.points.retain(|p| p.is_alive(cfg));

        let pointer = &mut self.pointer;
        pointer.delta *= cfg.delta_retain;
        pointer.impulse *= (-cfg.impulse_decay * dt).exp();
        if !pointer.active {
            pointer.impulse *= (-cfg.release_impulse_decay * dt).exp();
        }
        if pointer.delta.x.abs() < DELTA_SNAP {
            pointer.delta.x = 0.0;
        }
        if pointer.delta.y.abs() < DELTA_SNAP {
            pointer.delta.y = 0.0;
        }
        if pointer.impulse < cfg.impulse_snap {
            pointer.impulse = 0.0;
        }

        if self.pointer.inside && self.pointer.impulse > self.cfg.trail_impulse_floor {
            let (pos, impulse, kind) = (
                self.pointer.position,
                self.pointer.impulse,
                self.pointer.kind,
            );
            self.emit(pos, impulse, kind, false);
        }

        let cfg = &self.cfg;
        let strongest = self
            .points
            .iter()
            .map(|p| p.energy(cfg.energy_age_falloff))
            .fold(0.0_f32, f32::max);
        self.activity = (self.activity * (-cfg.activity_decay * dt).exp())
            .max(strongest * cfg.energy_activity_weight);
        if self.pointer.active {
            self.activity = self.activity.max(cfg.pressed_activity_floor);
        }
        dt
    }

    /// Drop every point and all pointer motion; used when the canvas is
    /// resized. Press/inside flags are kept.
    pub fn reset(&mut self) {
        self.points.clear();
        self.activity = 0.0;
        self.pointer.clear_motion();
    }

    /// Return to the freshly-mounted state.
    pub fn clear(&mut self) {
        self.points.clear();
        self.activity = 0.0;
        self.pointer = PointerState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> RippleField {
        RippleField::new(RippleConfig::default(), 7)
    }

    #[test]
    fn forced_emission_ignores_spacing() {
        let mut f = field();
        assert!(f.emit(Vec2::splat(0.5), 1.0, PointerKind::Mouse, true));
        assert!(f.emit(Vec2::splat(0.5), 1.0, PointerKind::Mouse, true));
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn emission_clamps_position_into_canvas() {
        let mut f = field();
        f.emit(Vec2::new(1.4, -0.3), 1.0, PointerKind::Mouse, true);
        assert_eq!(f.points()[0].position, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn velocity_follows_pointer_displacement() {
        let mut f = field();
        let rect = crate::pointer::CanvasRect {
            left: 0.0,
            top: 0.0,
            width: 1000.0,
            height: 1000.0,
        };
        f.pointer_move(rect.normalize(500.0, 500.0), PointerKind::Mouse);
        let update = f.pointer_move(rect.normalize(540.0, 500.0), PointerKind::Mouse);
        assert!(update.emitted);
        let p = f.points().back().unwrap();
        assert!(p.velocity.x > 0.0);
        assert!(p.velocity.y.abs() < 1e-6);
    }

    #[test]
    fn leaving_the_canvas_resets_spacing() {
        let mut f = field();
        f.emit(Vec2::splat(0.5), 1.0, PointerKind::Mouse, false);
        assert!(f.pointer().last_emit.is_some());
        f.pointer_move(
            CanvasPoint {
                inside: false,
                pos: Vec2::ZERO,
            },
            PointerKind::Mouse,
        );
        assert!(!f.pointer().inside);
        assert!(f.pointer().last_emit.is_none());
        assert!(f.emit(Vec2::splat(0.5), 1.0, PointerKind::Mouse, false));
    }

    #[test]
    fn press_keeps_activity_above_floor() {
        let mut f = field();
        let inside = CanvasPoint {
            inside: true,
            pos: Vec2::splat(0.5),
        };
        f.pointer_down(inside, PointerKind::Mouse);
        for _ in 0..400 {
            f.tick(0.032);
        }
        assert!(f.activity() >= f.config().pressed_activity_floor);
        assert!(f.is_active());
        f.pointer_up();
        for _ in 0..400 {
            f.tick(0.032);
        }
        assert!(!f.is_active());
    }

    #[test]
    fn zero_capacity_still_keeps_latest_point() {
        let cfg = RippleConfig {
            max_points: 0,
            ..RippleConfig::default()
        };
        let mut f = RippleField::new(cfg, 1);
        assert_eq!(f.config().max_points, 1);
        assert!(f.emit(Vec2::splat(0.3), 1.0, PointerKind::Mouse, true));
        assert!(f.emit(Vec2::splat(0.6), 1.0, PointerKind::Mouse, true));
        assert_eq!(f.len(), 1);
        assert_eq!(f.points()[0].position, Vec2::splat(0.6));
    }

    #[test]
    fn tick_trails_a_point_behind_a_moving_pointer() {
        let mut f = field();
        let rect = crate::pointer::CanvasRect {
            left: 0.0,
            top: 0.0,
            width: 1000.0,
            height: 1000.0,
        };
        f.pointer_move(rect.normalize(500.0, 500.0), PointerKind::Mouse);
        f.pointer_move(rect.normalize(540.0, 500.0), PointerKind::Mouse);
        let at = f.pointer().position;
        // Move the spacing anchor away so the pointer position is free again.
        f.emit(Vec2::new(0.2, 0.2), 0.5, PointerKind::Mouse, true);
        let before = f.len();
        assert!(f.pointer().impulse > f.config().trail_impulse_floor);

        f.tick(0.016);
        assert_eq!(f.len(), before + 1);
        let p = f.points().back().unwrap();
        assert!(p.position.distance(at) < 1e-6);
        assert_eq!(p.age, 0.0);
    }

    #[test]
    fn release_adds_extra_impulse_decay() {
        let inside = CanvasPoint {
            inside: true,
            pos: Vec2::splat(0.5),
        };
        let mut held = field();
        let mut released = field();
        held.pointer_down(inside, PointerKind::Mouse);
        released.pointer_down(inside, PointerKind::Mouse);
        released.pointer_up();

        let cfg = held.config().clone();
        let start = cfg.tap_boost;
        let (dt, n) = (0.016_f32, 5);
        for _ in 0..n {
            held.tick(dt);
            released.tick(dt);
        }
        let t = dt * n as f32;
        let expect_held = start * (-cfg.impulse_decay * t).exp();
        let expect_released = start * (-(cfg.impulse_decay + cfg.release_impulse_decay) * t).exp();
        assert!((held.pointer().impulse - expect_held).abs() < 1e-4);
        assert!((released.pointer().impulse - expect_released).abs() < 1e-4);
        assert!(released.pointer().impulse < held.pointer().impulse);
    }
}
