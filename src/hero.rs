//! State shared between the frame loop, DOM listeners and the JS handle.

use crate::compose::{CanvasSurface, DomTextLayout};
use crate::dom;
use crate::frame::FrameLoop;
use crate::render::GpuRenderer;
use ripple_core::compose::{HeroLabels, ThemeColors};
use ripple_core::{HeroEffect, LoopCommand, LoopDecision, PointerKind};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

pub struct Shared {
    effect: RefCell<HeroEffect<GpuRenderer>>,
    canvas: web::HtmlCanvasElement,
    surface: RefCell<CanvasSurface>,
    layout: DomTextLayout,
    theme: RefCell<ThemeColors>,
    labels: RefCell<HeroLabels>,
    frames: FrameLoop,
}

impl Shared {
    pub fn new(
        effect: HeroEffect<GpuRenderer>,
        canvas: web::HtmlCanvasElement,
        surface: CanvasSurface,
        layout: DomTextLayout,
        theme: ThemeColors,
        labels: HeroLabels,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            effect: RefCell::new(effect),
            canvas,
            surface: RefCell::new(surface),
            layout,
            theme: RefCell::new(theme),
            labels: RefCell::new(labels),
            frames: FrameLoop::new(weak.clone()),
        })
    }

    #[inline]
    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    fn apply(&self, cmd: LoopCommand) {
        match cmd {
            LoopCommand::Keep => {}
            LoopCommand::Schedule => self.schedule_or_stop(),
            LoopCommand::Cancel => self.frames.cancel(),
        }
    }

    fn schedule_or_stop(&self) {
        if !self.frames.schedule() {
            self.effect.borrow_mut().stop();
        }
    }

    /// Re-measure the canvas. On a real change the backing store is resized,
    /// the source is recomposed and the reset state drawn once.
    pub fn resize(&self) {
        let r = self.canvas.get_bounding_client_rect();
        let changed =
            self.effect
                .borrow_mut()
                .resize(r.width(), r.height(), dom::device_pixel_ratio());
        if !changed {
            return;
        }
        let (w, h) = self.effect.borrow().sizing().buffer_size();
        dom::sync_canvas_backing_size(&self.canvas, w, h);
        self.recompose();
        self.render();
    }

    pub fn recompose(&self) {
        let theme = self.theme.borrow();
        let labels = self.labels.borrow();
        let mut surface = self.surface.borrow_mut();
        let result =
            self.effect
                .borrow_mut()
                .recompose(&mut *surface, &theme, &labels, &self.layout);
        if let Err(e) = result {
            log::warn!("source composition failed: {e}");
        }
    }

    pub fn render(&self) {
        if let Err(e) = self.effect.borrow_mut().render() {
            log::warn!("ripple draw failed: {e}");
        }
    }

    pub fn on_frame(&self, timestamp_ms: f64) {
        self.frames.fired();
        let decision = self.effect.borrow_mut().frame(timestamp_ms);
        if decision == LoopDecision::Continue {
            self.schedule_or_stop();
        }
    }

    pub fn pointer_move(&self, client_x: f32, client_y: f32, kind: PointerKind) {
        let rect = dom::canvas_rect(&self.canvas);
        let cmd = self
            .effect
            .borrow_mut()
            .pointer_move(&rect, client_x, client_y, kind);
        self.apply(cmd);
    }

    pub fn pointer_down(&self, client_x: f32, client_y: f32, kind: PointerKind) {
        let rect = dom::canvas_rect(&self.canvas);
        let cmd = self
            .effect
            .borrow_mut()
            .pointer_down(&rect, client_x, client_y, kind);
        self.apply(cmd);
    }

    pub fn pointer_up(&self) {
        self.effect.borrow_mut().pointer_up();
    }

    pub fn touch_end(&self) {
        self.effect.borrow_mut().touch_end();
    }

    pub fn set_visible(&self, visible: bool) {
        let cmd = self.effect.borrow_mut().set_visible(visible);
        self.apply(cmd);
    }

    pub fn set_in_view(&self, in_view: bool) {
        let cmd = self.effect.borrow_mut().set_in_view(in_view);
        self.apply(cmd);
    }

    /// Swap theme colors without resetting the simulation.
    pub fn set_theme(&self, theme: ThemeColors) {
        *self.theme.borrow_mut() = theme;
        self.recompose();
        self.render();
    }

    pub fn set_labels(&self, labels: HeroLabels) {
        *self.labels.borrow_mut() = labels;
        self.recompose();
        self.render();
    }

    pub fn teardown(&self) {
        self.effect.borrow_mut().teardown();
        self.frames.cancel();
    }
}
