//! Tuning table for the ripple effect.
//!
//! Every constant the simulation, compositor and shader read lives here so the
//! host page can author overrides as one JSON object. Missing fields keep the
//! shipped tuning.

use crate::device::DeviceClass;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size of the point arrays baked into the WGSL uniform block.
pub const MAX_RIPPLE_POINTS: usize = 40;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be finite and > 0 (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must be within [{min}, {max}] (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("`{low}` ({low_value}) must not exceed `{high}` ({high_value})")]
    Inverted {
        low: &'static str,
        low_value: f32,
        high: &'static str,
        high_value: f32,
    },
    #[error("`maxPoints` must be within 1..={MAX_RIPPLE_POINTS} (got {0})")]
    MaxPoints(usize),
    #[error("`idleSettleFrames` must be at least 1")]
    SettleFrames,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RippleConfig {
    // Display
    pub dpr_max: f32,
    /// Logical widths below this use the mobile tuning.
    pub mobile_breakpoint: f32,

    // Emission spacing (normalized units)
    pub trail_spacing_mobile: f32,
    pub trail_spacing_desktop: f32,

    // Global distortion strength
    pub displacement_mobile: f32,
    pub displacement_desktop: f32,

    // Radius (normalized units)
    pub radius_mobile: f32,
    pub radius_desktop: f32,
    pub radius_jitter: f32,
    pub radius_expand: f32,
    pub radius_min: f32,
    pub radius_max: f32,

    // Amplitude
    pub amplitude_scale: f32,
    pub amplitude_min: f32,
    pub amplitude_max: f32,
    /// Points whose amplitude decays to this value or below are pruned.
    pub amplitude_floor: f32,

    // Pointer motion -> impulse
    pub motion_scale: f32,
    pub motion_epsilon: f32,
    pub impulse_min: f32,
    pub impulse_max: f32,
    pub touch_motion_multiplier: f32,
    pub tap_boost: f32,
    pub touch_tap_multiplier: f32,

    // Pointer decay
    pub impulse_decay: f32,
    pub release_impulse_decay: f32,
    pub impulse_snap: f32,
    pub trail_impulse_floor: f32,
    /// Fraction of the accumulated pointer displacement kept each tick.
    pub delta_retain: f32,

    // Point motion
    pub velocity_scale: f32,
    pub touch_velocity_multiplier: f32,
    pub velocity_damping: f32,
    pub amplitude_damping: f32,
    pub life_base: f32,
    pub life_jitter: f32,
    pub bounds_margin: f32,

    // Shader
    pub aberration: f32,
    pub wave_frequency: f32,
    pub wave_speed: f32,
    pub age_decay: f32,
    pub swirl: f32,
    pub min_aspect: f32,

    // Activity / idle detection
    pub activity_decay: f32,
    pub energy_age_falloff: f32,
    pub energy_activity_weight: f32,
    pub emit_activity_weight: f32,
    pub move_activity_weight: f32,
    pub pressed_activity_floor: f32,
    pub idle_threshold: f32,
    pub idle_impulse_threshold: f32,
    pub idle_settle_frames: u32,

    // Tick
    pub min_tick_dt: f32,
    pub max_tick_dt: f32,

    pub max_points: usize,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            dpr_max: 1.2,
            mobile_breakpoint: 720.0,

            trail_spacing_mobile: 0.015,
            trail_spacing_desktop: 0.011,

            displacement_mobile: 0.027,
            displacement_desktop: 0.022,

            radius_mobile: 0.114,
            radius_desktop: 0.088,
            radius_jitter: 0.018,
            radius_expand: 0.43,
            radius_min: 0.05,
            radius_max: 0.255,

            amplitude_scale: 1.02,
            amplitude_min: 0.05,
            amplitude_max: 1.5,
            amplitude_floor: 0.025,

            motion_scale: 27.0,
            motion_epsilon: 0.000015,
            impulse_min: 0.06,
            impulse_max: 1.55,
            touch_motion_multiplier: 1.24,
            tap_boost: 1.08,
            touch_tap_multiplier: 1.08,

            impulse_decay: 5.0,
            release_impulse_decay: 4.8,
            impulse_snap: 0.0001,
            trail_impulse_floor: 0.02,
            delta_retain: 0.34,

            velocity_scale: 0.18,
            touch_velocity_multiplier: 1.12,
            velocity_damping: 7.05,
            amplitude_damping: 2.08,
            life_base: 2.3,
            life_jitter: 0.38,
            bounds_margin: 0.25,

            aberration: 0.58,
            wave_frequency: 45.0,
            wave_speed: 15.3,
            age_decay: 2.0,
            swirl: 0.22,
            min_aspect: 0.55,

            activity_decay: 5.0,
            energy_age_falloff: 0.5,
            energy_activity_weight: 0.55,
            emit_activity_weight: 0.44,
            move_activity_weight: 0.6,
            pressed_activity_floor: 0.11,
            idle_threshold: 0.0074,
            idle_impulse_threshold: 0.0004,
            idle_settle_frames: 16,

            min_tick_dt: 0.001,
            max_tick_dt: 0.032,

            max_points: MAX_RIPPLE_POINTS,
        }
    }
}

impl RippleConfig {
    /// Parse a (possibly partial) JSON table and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: RippleConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("dprMax", self.dpr_max),
            ("mobileBreakpoint", self.mobile_breakpoint),
            ("trailSpacingMobile", self.trail_spacing_mobile),
            ("trailSpacingDesktop", self.trail_spacing_desktop),
            ("displacementMobile", self.displacement_mobile),
            ("displacementDesktop", self.displacement_desktop),
            ("radiusMobile", self.radius_mobile),
            ("radiusDesktop", self.radius_desktop),
            ("radiusMin", self.radius_min),
            ("radiusMax", self.radius_max),
            ("amplitudeScale", self.amplitude_scale),
            ("amplitudeMin", self.amplitude_min),
            ("amplitudeMax", self.amplitude_max),
            ("motionScale", self.motion_scale),
            ("impulseMin", self.impulse_min),
            ("impulseMax", self.impulse_max),
            ("tapBoost", self.tap_boost),
            ("waveFrequency", self.wave_frequency),
            ("lifeBase", self.life_base),
            ("minAspect", self.min_aspect),
            ("minTickDt", self.min_tick_dt),
            ("maxTickDt", self.max_tick_dt),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("radiusJitter", self.radius_jitter),
            ("radiusExpand", self.radius_expand),
            ("amplitudeFloor", self.amplitude_floor),
            ("motionEpsilon", self.motion_epsilon),
            ("impulseDecay", self.impulse_decay),
            ("releaseImpulseDecay", self.release_impulse_decay),
            ("impulseSnap", self.impulse_snap),
            ("trailImpulseFloor", self.trail_impulse_floor),
            ("velocityScale", self.velocity_scale),
            ("velocityDamping", self.velocity_damping),
            ("amplitudeDamping", self.amplitude_damping),
            ("lifeJitter", self.life_jitter),
            ("boundsMargin", self.bounds_margin),
            ("aberration", self.aberration),
            ("waveSpeed", self.wave_speed),
            ("ageDecay", self.age_decay),
            ("swirl", self.swirl),
            ("activityDecay", self.activity_decay),
            ("energyAgeFalloff", self.energy_age_falloff),
            ("idleThreshold", self.idle_threshold),
            ("idleImpulseThreshold", self.idle_impulse_threshold),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: f32::INFINITY,
                });
            }
        }

        let unit = [
            ("deltaRetain", self.delta_retain),
            ("energyActivityWeight", self.energy_activity_weight),
            ("emitActivityWeight", self.emit_activity_weight),
            ("moveActivityWeight", self.move_activity_weight),
            ("pressedActivityFloor", self.pressed_activity_floor),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }

        if self.dpr_max < 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "dprMax",
                value: self.dpr_max,
                min: 1.0,
                max: f32::INFINITY,
            });
        }

        let ordered = [
            ("radiusMin", self.radius_min, "radiusMax", self.radius_max),
            ("amplitudeMin", self.amplitude_min, "amplitudeMax", self.amplitude_max),
            ("impulseMin", self.impulse_min, "impulseMax", self.impulse_max),
            ("minTickDt", self.min_tick_dt, "maxTickDt", self.max_tick_dt),
        ];
        for (low, low_value, high, high_value) in ordered {
            if low_value > high_value {
                return Err(ConfigError::Inverted {
                    low,
                    low_value,
                    high,
                    high_value,
                });
            }
        }

        if self.max_points == 0 || self.max_points > MAX_RIPPLE_POINTS {
            return Err(ConfigError::MaxPoints(self.max_points));
        }
        if self.idle_settle_frames == 0 {
            return Err(ConfigError::SettleFrames);
        }
        Ok(())
    }

    #[inline]
    pub fn device_class(&self, logical_width: f32) -> DeviceClass {
        DeviceClass::from_width(logical_width, self.mobile_breakpoint)
    }

    #[inline]
    pub fn trail_spacing(&self, class: DeviceClass) -> f32 {
        match class {
            DeviceClass::Mobile => self.trail_spacing_mobile,
            DeviceClass::Desktop => self.trail_spacing_desktop,
        }
    }

    #[inline]
    pub fn displacement(&self, class: DeviceClass) -> f32 {
        match class {
            DeviceClass::Mobile => self.displacement_mobile,
            DeviceClass::Desktop => self.displacement_desktop,
        }
    }

    #[inline]
    pub fn radius_base(&self, class: DeviceClass) -> f32 {
        match class {
            DeviceClass::Mobile => self.radius_mobile,
            DeviceClass::Desktop => self.radius_desktop,
        }
    }

    /// Clamp a raw tick delta into the stable integration range.
    #[inline]
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(self.min_tick_dt, self.max_tick_dt)
        } else {
            self.min_tick_dt
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        RippleConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = RippleConfig::from_json(r#"{ "aberration": 0.3, "maxPoints": 12 }"#).unwrap();
        assert!((cfg.aberration - 0.3).abs() < 1e-6);
        assert_eq!(cfg.max_points, 12);
        assert!((cfg.wave_frequency - 45.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_too_many_points() {
        let err = RippleConfig::from_json(r#"{ "maxPoints": 64 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::MaxPoints(64)));
    }

    #[test]
    fn rejects_inverted_dt_range() {
        let cfg = RippleConfig {
            min_tick_dt: 0.05,
            max_tick_dt: 0.01,
            ..RippleConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Inverted { .. })));
    }

    #[test]
    fn clamp_dt_guards_spikes_and_nan() {
        let cfg = RippleConfig::default();
        assert_eq!(cfg.clamp_dt(5.0), cfg.max_tick_dt);
        assert_eq!(cfg.clamp_dt(0.0), cfg.min_tick_dt);
        assert_eq!(cfg.clamp_dt(f32::NAN), cfg.min_tick_dt);
    }
}
