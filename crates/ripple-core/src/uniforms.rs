//! GPU-facing uniform block for the ripple pass.
//!
//! Layout mirrors `RippleUniforms` in `shaders/ripple.wgsl`: two fixed-size
//! `vec4` arrays followed by twelve scalars (three padding), 16-byte aligned.

use crate::config::{RippleConfig, MAX_RIPPLE_POINTS};
use crate::ripple::RipplePoint;
use crate::sizing::SizingState;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RippleUniforms {
    /// xy = center, zw unused.
    pub points: [[f32; 4]; MAX_RIPPLE_POINTS],
    /// amplitude, radius, age, phase.
    pub waves: [[f32; 4]; MAX_RIPPLE_POINTS],
    pub point_count: u32,
    pub strength: f32,
    pub aberration: f32,
    pub frequency: f32,
    pub speed: f32,
    pub decay: f32,
    pub swirl: f32,
    pub aspect: f32,
    pub time: f32,
    pub _pad: [f32; 3],
}

impl Default for RippleUniforms {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

impl RippleUniforms {
    /// Pack the newest live points (up to the array size) and the per-frame
    /// scalars. Slots beyond the live count stay zero.
    pub fn pack<'a, I>(points: I, sizing: &SizingState, cfg: &RippleConfig, time: f32) -> Self
    where
        I: IntoIterator<Item = &'a RipplePoint>,
        I::IntoIter: ExactSizeIterator,
    {
        let mut u = Self::default();
        let iter = points.into_iter();
        let skip = iter.len().saturating_sub(MAX_RIPPLE_POINTS);
        let mut count = 0usize;
        for (slot, p) in iter.skip(skip).enumerate() {
            u.points[slot] = [p.position.x.clamp(0.0, 1.0), p.position.y.clamp(0.0, 1.0), 0.0, 0.0];
            u.waves[slot] = [p.amplitude, p.radius, p.age, p.phase];
            count += 1;
        }
        u.point_count = count as u32;
        u.strength = cfg.displacement(sizing.device_class(cfg));
        u.aberration = cfg.aberration;
        u.frequency = cfg.wave_frequency;
        u.speed = cfg.wave_speed;
        u.decay = cfg.age_decay;
        u.swirl = cfg.swirl;
        u.aspect = sizing.aspect(cfg.min_aspect);
        u.time = time;
        u
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        (self.point_count as usize).min(MAX_RIPPLE_POINTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn point(x: f32) -> RipplePoint {
        RipplePoint {
            position: Vec2::new(x, 0.5),
            velocity: Vec2::ZERO,
            amplitude: 1.0,
            radius: 0.1,
            age: 0.25,
            life: 2.5,
            phase: 1.0,
        }
    }

    #[test]
    fn layout_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<RippleUniforms>() % 16, 0);
        assert_eq!(
            std::mem::size_of::<RippleUniforms>(),
            MAX_RIPPLE_POINTS * 32 + 48
        );
    }

    #[test]
    fn unused_slots_are_zero() {
        let cfg = RippleConfig::default();
        let sizing = SizingState {
            width: 1280.0,
            height: 720.0,
            dpr: 1.0,
        };
        let pts = vec![point(0.2), point(0.8)];
        let u = RippleUniforms::pack(&pts, &sizing, &cfg, 3.0);
        assert_eq!(u.point_count, 2);
        assert_eq!(u.points[1][0], 0.8);
        assert_eq!(u.waves[0], [1.0, 0.1, 0.25, 1.0]);
        assert!(u.points[2..].iter().all(|p| *p == [0.0; 4]));
        assert!(u.waves[2..].iter().all(|w| *w == [0.0; 4]));
        assert_eq!(u.strength, cfg.displacement_desktop);
        assert!((u.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn mobile_width_uses_mobile_strength() {
        let cfg = RippleConfig::default();
        let sizing = SizingState {
            width: 390.0,
            height: 800.0,
            dpr: 1.2,
        };
        let pts: Vec<RipplePoint> = Vec::new();
        let u = RippleUniforms::pack(&pts, &sizing, &cfg, 0.0);
        assert_eq!(u.strength, cfg.displacement_mobile);
        assert_eq!(u.point_count, 0);
    }
}
