//! CPU reference of the ripple fragment shader.
//!
//! Mirrors `fs_ripple` in `shaders/ripple.wgsl` operation for operation so the
//! distortion can be evaluated and tested without a GPU.

use crate::uniforms::RippleUniforms;
use glam::{Vec2, Vec3};

const MIN_RADIUS: f32 = 0.0008;
const MIN_DIST: f32 = 0.0004;
const SWIRL_PHASE_SCALE: f32 = 0.86;
const SWIRL_TIME_SCALE: f32 = 0.35;
const SECONDARY_OFFSET_SCALE: f32 = 0.62;
const SECONDARY_MIX: f32 = 0.22;
const UV_MIN: f32 = 0.001;
const UV_MAX: f32 = 0.999;

/// Unscaled displacement at `uv` summed over all live points.
pub fn ripple_offset(uv: Vec2, u: &RippleUniforms) -> Vec2 {
    let mut offset = Vec2::ZERO;
    for i in 0..u.live_count() {
        let center = Vec2::new(u.points[i][0], u.points[i][1]);
        let [amplitude, radius, age, phase_offset] = u.waves[i];
        let radius = radius.max(MIN_RADIUS);

        let mut delta = uv - center;
        delta.x *= u.aspect;
        let dist = delta.length();
        let dir = delta / dist.max(MIN_DIST);
        let tangent = Vec2::new(-dir.y, dir.x);

        let envelope = (-(dist * dist) / (radius * radius)).exp();
        let age_fade = (-age * u.decay).exp();
        let phase = dist * u.frequency - age * u.speed + phase_offset;

        let ring = phase.sin();
        let swirl = (phase * SWIRL_PHASE_SCALE + u.time * SWIRL_TIME_SCALE + phase_offset).cos();

        offset += dir * (ring * amplitude * envelope * age_fade);
        offset += tangent * (swirl * amplitude * envelope * age_fade * u.swirl);
    }
    offset
}

/// Texture coordinates sampled for one output pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleCoords {
    pub primary: Vec2,
    pub secondary: Vec2,
    /// Red/blue taps, present when aberration is enabled.
    pub aberration: Option<(Vec2, Vec2)>,
}

#[inline]
fn clamp_uv(uv: Vec2) -> Vec2 {
    uv.clamp(Vec2::splat(UV_MIN), Vec2::splat(UV_MAX))
}

pub fn sample_coords(uv: Vec2, u: &RippleUniforms) -> SampleCoords {
    let offset = ripple_offset(uv, u) * u.strength;
    let primary = clamp_uv(uv + offset);
    let secondary = clamp_uv(uv + offset * SECONDARY_OFFSET_SCALE);
    let aberration = (u.aberration > 0.0).then(|| {
        let shift = offset * u.aberration;
        (clamp_uv(primary + shift), clamp_uv(primary - shift))
    });
    SampleCoords {
        primary,
        secondary,
        aberration,
    }
}

/// Shade one pixel. `sample` reads the source image at a bottom-left-origin
/// texture coordinate.
pub fn shade_pixel(uv: Vec2, u: &RippleUniforms, sample: impl Fn(Vec2) -> Vec3) -> Vec3 {
    let c = sample_coords(uv, u);
    let mut color = sample(c.primary).lerp(sample(c.secondary), SECONDARY_MIX);
    if let Some((red_uv, blue_uv)) = c.aberration {
        color.x = sample(red_uv).x;
        color.z = sample(blue_uv).z;
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniforms_with_point(center: Vec2, age: f32) -> RippleUniforms {
        let mut u = RippleUniforms::default();
        u.points[0] = [center.x, center.y, 0.0, 0.0];
        u.waves[0] = [1.0, 0.1, age, 0.3];
        u.point_count = 1;
        u.strength = 0.022;
        u.aberration = 0.58;
        u.frequency = 45.0;
        u.speed = 15.3;
        u.decay = 2.0;
        u.swirl = 0.22;
        u.aspect = 1.0;
        u
    }

    #[test]
    fn no_points_means_no_offset() {
        let u = RippleUniforms::default();
        assert_eq!(ripple_offset(Vec2::new(0.3, 0.7), &u), Vec2::ZERO);
    }

    #[test]
    fn offset_vanishes_far_from_the_point() {
        let u = uniforms_with_point(Vec2::new(0.2, 0.2), 0.0);
        let far = ripple_offset(Vec2::new(0.9, 0.9), &u);
        assert!(far.length() < 1e-6);
        let near = ripple_offset(Vec2::new(0.23, 0.2), &u);
        assert!(near.length() > 1e-3);
    }

    #[test]
    fn older_points_displace_less() {
        let uv = Vec2::new(0.53, 0.5);
        let mut young = uniforms_with_point(Vec2::splat(0.5), 0.0);
        young.swirl = 0.0;
        let mut old = young;
        old.waves[0][2] = 1.5;
        // Same phase for both so only the age fade differs.
        old.waves[0][3] = young.waves[0][3] + 1.5 * young.speed;
        let a = ripple_offset(uv, &young).length();
        let b = ripple_offset(uv, &old).length();
        assert!(b < a);
        assert!((b / a - (-1.5_f32 * 2.0).exp()).abs() < 1e-3);
    }

    #[test]
    fn sample_coords_are_clamped() {
        let mut u = uniforms_with_point(Vec2::new(0.0, 0.0), 0.0);
        u.strength = 50.0;
        let c = sample_coords(Vec2::new(0.01, 0.01), &u);
        for v in [c.primary, c.secondary, c.aberration.unwrap().0, c.aberration.unwrap().1] {
            assert!(v.x >= UV_MIN && v.x <= UV_MAX);
            assert!(v.y >= UV_MIN && v.y <= UV_MAX);
        }
    }

    #[test]
    fn flat_source_is_unchanged() {
        let u = uniforms_with_point(Vec2::splat(0.5), 0.1);
        let color = shade_pixel(Vec2::new(0.52, 0.5), &u, |_| Vec3::new(0.2, 0.4, 0.6));
        assert!((color - Vec3::new(0.2, 0.4, 0.6)).length() < 1e-6);
    }
}
