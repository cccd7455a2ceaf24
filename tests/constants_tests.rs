// Host-side checks for the browser wiring constants.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn observer_and_timer_values_are_sane() {
    assert!(INTERSECTION_THRESHOLD > 0.0 && INTERSECTION_THRESHOLD <= 1.0);
    assert!(FONT_REDRAW_DEBOUNCE_MS > 0);
    assert_eq!(PRIMARY_MOUSE_BUTTON, 0);
    assert!(REDUCED_MOTION_QUERY.contains("prefers-reduced-motion"));
}

#[test]
fn input_events_are_distinct() {
    let mut all: Vec<&str> = MOUSE_EVENTS.iter().chain(TOUCH_EVENTS.iter()).copied().collect();
    assert!(MOUSE_EVENTS.iter().all(|e| e.starts_with("mouse")));
    assert!(TOUCH_EVENTS.iter().all(|e| e.starts_with("touch")));
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), MOUSE_EVENTS.len() + TOUCH_EVENTS.len());
}

#[test]
fn placeholder_is_opaque() {
    assert_eq!(PLACEHOLDER_RGBA[3], 255);
}
