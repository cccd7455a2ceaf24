/// Browser wiring constants for the hero effect.
///
/// Simulation tuning lives in `ripple_core::RippleConfig`; these only cover
/// how the effect is attached to the page.
// Media query that disables the effect entirely
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Fraction of the canvas that must intersect the viewport to count as in view
pub const INTERSECTION_THRESHOLD: f64 = 0.01;

// Delay before recomposing after the font set reports ready (ms)
pub const FONT_REDRAW_DEBOUNCE_MS: i32 = 120;

// Only the primary mouse button presses
pub const PRIMARY_MOUSE_BUTTON: i16 = 0;

// Window-level input events the effect listens to
pub const MOUSE_EVENTS: [&str; 3] = ["mousedown", "mouseup", "mousemove"];
pub const TOUCH_EVENTS: [&str; 3] = ["touchstart", "touchmove", "touchend"];

// Clear color shown before the first source image is uploaded
pub const PLACEHOLDER_RGBA: [u8; 4] = [3, 8, 19, 255];
