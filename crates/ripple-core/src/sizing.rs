use crate::config::RippleConfig;
use crate::device::DeviceClass;

/// Logical canvas size (CSS pixels) plus the clamped device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizingState {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Default for SizingState {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
        }
    }
}

impl SizingState {
    /// Build from a measured bounding rect. Logical size is rounded to whole
    /// pixels (at least 1) and the ratio is clamped to `[1, dpr_max]`.
    pub fn from_rect(rect_width: f64, rect_height: f64, device_dpr: f64, cfg: &RippleConfig) -> Self {
        let dpr = if device_dpr.is_finite() {
            (device_dpr as f32).clamp(1.0, cfg.dpr_max)
        } else {
            1.0
        };
        Self {
            width: (rect_width.round() as f32).max(1.0),
            height: (rect_height.round() as f32).max(1.0),
            dpr,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Backing buffer size in device pixels: `round(logical * dpr)`.
    #[inline]
    pub fn buffer_size(&self) -> (u32, u32) {
        let w = (self.width * self.dpr).round().max(1.0) as u32;
        let h = (self.height * self.dpr).round().max(1.0) as u32;
        (w, h)
    }

    #[inline]
    pub fn aspect(&self, min_aspect: f32) -> f32 {
        (self.width / self.height.max(1.0)).max(min_aspect)
    }

    #[inline]
    pub fn device_class(&self, cfg: &RippleConfig) -> DeviceClass {
        cfg.device_class(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpr_is_clamped_to_config_max() {
        let cfg = RippleConfig::default();
        let s = SizingState::from_rect(800.0, 400.0, 3.0, &cfg);
        assert!((s.dpr - cfg.dpr_max).abs() < 1e-6);
        assert_eq!(s.buffer_size(), (960, 480));
    }

    #[test]
    fn sub_unit_ratio_is_raised_to_one() {
        let cfg = RippleConfig::default();
        let s = SizingState::from_rect(333.4, 200.6, 0.5, &cfg);
        assert_eq!(s.dpr, 1.0);
        assert_eq!((s.width, s.height), (333.0, 201.0));
        assert_eq!(s.buffer_size(), (333, 201));
    }

    #[test]
    fn aspect_has_a_floor() {
        let s = SizingState {
            width: 300.0,
            height: 900.0,
            dpr: 1.0,
        };
        assert!((s.aspect(0.55) - 0.55).abs() < 1e-6);
    }
}
