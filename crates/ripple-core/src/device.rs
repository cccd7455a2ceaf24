/// Coarse device bucket used to pick spacing, radius and strength tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    #[inline]
    pub fn from_width(logical_width: f32, breakpoint: f32) -> Self {
        if logical_width < breakpoint {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}
