//! Platform-independent core of the hero ripple effect: pointer tracking,
//! ripple emission and integration, source compositing, uniform packing and a
//! CPU reference of the refraction shader.

pub mod clock;
pub mod compose;
pub mod config;
pub mod device;
pub mod effect;
pub mod pointer;
pub mod renderer;
pub mod ripple;
pub mod shade;
pub mod sizing;
pub mod software;
pub mod uniforms;

pub use clock::{FrameClock, LoopDecision, LoopState, RenderLoop, FIRST_FRAME_DT};
pub use config::{ConfigError, RippleConfig, MAX_RIPPLE_POINTS};
pub use device::DeviceClass;
pub use effect::{HeroEffect, LoopCommand};
pub use pointer::{CanvasPoint, CanvasRect, PointerKind, PointerState};
pub use renderer::{RenderError, RippleRenderer, SourceImage};
pub use ripple::{PointerUpdate, RippleField, RipplePoint};
pub use sizing::SizingState;
pub use software::SoftwareRenderer;
pub use uniforms::RippleUniforms;

// Shader bundled as a string constant
pub static RIPPLE_WGSL: &str = include_str!("../shaders/ripple.wgsl");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_shader_validates() {
        let module = naga::front::wgsl::parse_str(RIPPLE_WGSL).expect("ripple.wgsl parses");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("ripple.wgsl validates");
        for entry in ["vs_fullscreen", "fs_ripple"] {
            assert!(module.entry_points.iter().any(|e| e.name == entry), "{entry}");
        }
    }
}
