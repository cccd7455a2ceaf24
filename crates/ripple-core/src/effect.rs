//! One mounted hero effect: simulation, frame clock, loop gating and the
//! renderer, driven by host events.
//!
//! The host owns scheduling. Every entry point that can change whether frames
//! should run returns a [`LoopCommand`] telling the host to schedule a frame,
//! cancel the pending one, or leave things as they are.

use crate::clock::{FrameClock, LoopDecision, RenderLoop};
use crate::compose::{
    compose_source, ComposeError, DrawSurface, HeroLabels, TextLayoutSource, ThemeColors,
};
use crate::config::{ConfigError, RippleConfig};
use crate::pointer::{CanvasRect, PointerKind};
use crate::renderer::{RenderError, RippleRenderer};
use crate::ripple::RippleField;
use crate::sizing::SizingState;
use crate::uniforms::RippleUniforms;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCommand {
    Keep,
    /// Request the first animation frame.
    Schedule,
    /// Cancel the pending animation frame.
    Cancel,
}

pub struct HeroEffect<R: RippleRenderer> {
    field: RippleField,
    clock: FrameClock,
    run: RenderLoop,
    sizing: SizingState,
    renderer: R,
}

impl<R: RippleRenderer> HeroEffect<R> {
    pub fn new(cfg: RippleConfig, renderer: R, seed: u64) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            field: RippleField::new(cfg, seed),
            clock: FrameClock::default(),
            run: RenderLoop::default(),
            sizing: SizingState::default(),
            renderer,
        })
    }

    #[inline]
    pub fn config(&self) -> &RippleConfig {
        self.field.config()
    }

    #[inline]
    pub fn field(&self) -> &RippleField {
        &self.field
    }

    #[inline]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    #[inline]
    pub fn render_loop(&self) -> &RenderLoop {
        &self.run
    }

    #[inline]
    pub fn sizing(&self) -> SizingState {
        self.sizing
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Apply a measured canvas rect. Returns `true` when the rounded size or
    /// the clamped ratio changed; the simulation and clock are then reset and
    /// the host must recompose and render.
    pub fn resize(&mut self, rect_width: f64, rect_height: f64, device_dpr: f64) -> bool {
        let next = SizingState::from_rect(rect_width, rect_height, device_dpr, self.field.config());
        if next == self.sizing {
            return false;
        }
        self.sizing = next;
        self.field.set_device_class(next.device_class(self.field.config()));
        self.field.reset();
        self.clock.reset();
        let (w, h) = next.buffer_size();
        self.renderer.resize(w, h);
        log::debug!(
            "resize {}x{} dpr {:.2} -> buffer {}x{}",
            next.width,
            next.height,
            next.dpr,
            w,
            h
        );
        true
    }

    /// Redraw the source image and upload it. On failure the previous texture
    /// stays bound.
    pub fn recompose<S, T>(
        &mut self,
        surface: &mut S,
        theme: &ThemeColors,
        labels: &HeroLabels,
        layout: &T,
    ) -> Result<(), ComposeError>
    where
        S: DrawSurface + ?Sized,
        T: TextLayoutSource + ?Sized,
    {
        if self.sizing.is_empty() {
            return Ok(());
        }
        let image = compose_source(surface, &self.sizing, theme, labels, layout)?;
        self.renderer.upload_source(&image)?;
        Ok(())
    }

    /// Draw the current state without advancing the simulation.
    pub fn render(&mut self) -> Result<(), RenderError> {
        if self.sizing.is_empty() {
            return Ok(());
        }
        let uniforms = RippleUniforms::pack(
            self.field.points(),
            &self.sizing,
            self.field.config(),
            self.clock.elapsed,
        );
        self.renderer.upload_points(&uniforms);
        self.renderer.draw()
    }

    fn render_logged(&mut self) {
        if let Err(e) = self.render() {
            log::warn!("ripple draw failed: {e}");
        }
    }

    /// Start the loop if it is idle and allowed to run.
    pub fn request_start(&mut self) -> LoopCommand {
        if self.run.start() {
            self.clock.rearm();
            LoopCommand::Schedule
        } else {
            LoopCommand::Keep
        }
    }

    /// Force the loop idle, e.g. when the host could not schedule the frame
    /// a start asked for.
    pub fn stop(&mut self) -> LoopCommand {
        self.clock.rearm();
        if self.run.stop() {
            LoopCommand::Cancel
        } else {
            LoopCommand::Keep
        }
    }

    /// One animation frame: integrate, draw, then decide whether to continue.
    /// Emission from input already happened in the event handlers.
    pub fn frame(&mut self, timestamp_ms: f64) -> LoopDecision {
        if !self.run.is_running() {
            return LoopDecision::Stop;
        }
        let dt = self.clock.advance(timestamp_ms, self.field.config());
        self.field.tick(dt);
        self.render_logged();

        let settled = self.clock.settle(self.field.is_active());
        if settled >= self.field.config().idle_settle_frames {
            self.run.stop();
            self.clock.rearm();
            log::debug!("ripple loop idle after {settled} settled frames");
            return LoopDecision::Stop;
        }
        LoopDecision::Continue
    }

    pub fn pointer_move(
        &mut self,
        rect: &CanvasRect,
        client_x: f32,
        client_y: f32,
        kind: PointerKind,
    ) -> LoopCommand {
        let update = self.field.pointer_move(rect.normalize(client_x, client_y), kind);
        if update.emitted {
            self.request_start()
        } else {
            LoopCommand::Keep
        }
    }

    /// Primary button press or touch start.
    pub fn pointer_down(
        &mut self,
        rect: &CanvasRect,
        client_x: f32,
        client_y: f32,
        kind: PointerKind,
    ) -> LoopCommand {
        let update = self.field.pointer_down(rect.normalize(client_x, client_y), kind);
        if update.inside {
            self.request_start()
        } else {
            LoopCommand::Keep
        }
    }

    pub fn pointer_up(&mut self) {
        self.field.pointer_up();
    }

    pub fn touch_end(&mut self) {
        self.field.touch_end();
    }

    /// Page visibility changed.
    pub fn set_visible(&mut self, visible: bool) -> LoopCommand {
        self.run.set_visible(visible);
        self.gate_changed(visible)
    }

    /// Canvas entered or left the viewport.
    pub fn set_in_view(&mut self, in_view: bool) -> LoopCommand {
        self.run.set_in_view(in_view);
        self.gate_changed(in_view)
    }

    fn gate_changed(&mut self, opened: bool) -> LoopCommand {
        if !opened {
            return self.stop();
        }
        if !self.run.can_run() {
            return LoopCommand::Keep;
        }
        self.render_logged();
        if self.field.is_active() {
            self.request_start()
        } else {
            LoopCommand::Keep
        }
    }

    /// Stop and return to the freshly-mounted state.
    pub fn teardown(&mut self) -> LoopCommand {
        let cmd = self.stop();
        self.field.clear();
        self.clock.reset();
        cmd
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::LoopState;
    use crate::renderer::SourceImage;
    use crate::software::SoftwareRenderer;

    fn effect() -> HeroEffect<SoftwareRenderer> {
        let mut fx = HeroEffect::new(RippleConfig::default(), SoftwareRenderer::new(1, 1), 3).unwrap();
        fx.resize(64.0, 32.0, 1.0);
        fx
    }

    fn rect() -> CanvasRect {
        CanvasRect {
            left: 0.0,
            top: 0.0,
            width: 64.0,
            height: 32.0,
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut cfg = RippleConfig::default();
        cfg.max_points = 41;
        assert!(HeroEffect::new(cfg, SoftwareRenderer::new(1, 1), 0).is_err());
    }

    #[test]
    fn resize_dedupes_and_sizes_renderer() {
        let mut fx = effect();
        assert_eq!(fx.renderer().size(), (64, 32));
        assert!(!fx.resize(64.2, 31.9, 1.0));
        assert!(fx.resize(64.0, 32.0, 1.1));
        assert_eq!(fx.renderer().size(), (70, 35));
    }

    #[test]
    fn tap_schedules_and_draws_same_frame() {
        let mut fx = effect();
        assert_eq!(fx.pointer_down(&rect(), 32.0, 16.0, PointerKind::Mouse), LoopCommand::Schedule);
        assert_eq!(fx.field().len(), 1);
        // Already running: no second schedule.
        assert_eq!(fx.pointer_down(&rect(), 10.0, 10.0, PointerKind::Mouse), LoopCommand::Keep);
        assert_eq!(fx.frame(0.0), LoopDecision::Continue);
        assert_eq!(fx.renderer().draw_count(), 1);
        assert!(fx.renderer().uniforms().point_count >= 1);
    }

    #[test]
    fn press_outside_is_ignored() {
        let mut fx = effect();
        assert_eq!(fx.pointer_down(&rect(), 100.0, 16.0, PointerKind::Mouse), LoopCommand::Keep);
        assert!(fx.field().is_empty());
    }

    #[test]
    fn hidden_page_cancels_and_blocks_start() {
        let mut fx = effect();
        fx.pointer_down(&rect(), 32.0, 16.0, PointerKind::Touch);
        assert_eq!(fx.set_visible(false), LoopCommand::Cancel);
        assert_eq!(fx.frame(16.0), LoopDecision::Stop);
        assert_eq!(fx.pointer_down(&rect(), 20.0, 16.0, PointerKind::Touch), LoopCommand::Keep);
        // Residual activity resumes the loop once visible again.
        assert_eq!(fx.set_visible(true), LoopCommand::Schedule);
    }

    #[test]
    fn entering_view_without_activity_renders_once() {
        let mut fx = effect();
        assert_eq!(fx.set_in_view(false), LoopCommand::Keep);
        assert_eq!(fx.set_in_view(true), LoopCommand::Keep);
        assert_eq!(fx.renderer().draw_count(), 1);
        assert!(!fx.render_loop().is_running());
    }

    #[test]
    fn teardown_clears_state() {
        let mut fx = effect();
        fx.pointer_down(&rect(), 32.0, 16.0, PointerKind::Mouse);
        assert_eq!(fx.teardown(), LoopCommand::Cancel);
        assert!(fx.field().is_empty());
        assert!(!fx.field().is_active());
        assert_eq!(fx.clock().elapsed, 0.0);
    }

    #[test]
    fn stop_after_unscheduled_start_allows_restart() {
        let mut fx = effect();
        assert_eq!(fx.pointer_down(&rect(), 32.0, 16.0, PointerKind::Mouse), LoopCommand::Schedule);
        assert_eq!(fx.render_loop().state(), LoopState::Running);
        assert_eq!(fx.stop(), LoopCommand::Cancel);
        assert_eq!(fx.render_loop().state(), LoopState::Idle);
        assert_eq!(fx.pointer_down(&rect(), 10.0, 10.0, PointerKind::Mouse), LoopCommand::Schedule);
    }

    #[test]
    fn uploaded_source_is_what_gets_drawn() {
        let mut fx = effect();
        let image = SourceImage::solid(64, 32, [10, 20, 30, 255]);
        fx.renderer_mut().upload_source(&image).unwrap();
        fx.render().unwrap();
        let r = fx.into_renderer();
        assert_eq!(r.source(), &image);
        assert_eq!(r.output().len(), 64 * 32 * 4);
        assert!(r.output().chunks(4).all(|px| px == [10, 20, 30, 255]));
    }
}
