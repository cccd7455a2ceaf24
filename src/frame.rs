use crate::hero::Shared;
use std::cell::Cell;
use std::rc::Weak;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// One pending `requestAnimationFrame` at most. The tick closure holds a weak
/// handle so a torn-down effect drops even if a frame is still queued.
pub struct FrameLoop {
    handle: Cell<Option<i32>>,
    tick: Closure<dyn FnMut(f64)>,
}

impl FrameLoop {
    pub fn new(shared: Weak<Shared>) -> Self {
        let tick = Closure::wrap(Box::new(move |ts: f64| {
            if let Some(shared) = shared.upgrade() {
                shared.on_frame(ts);
            }
        }) as Box<dyn FnMut(f64)>);
        Self {
            handle: Cell::new(None),
            tick,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.handle.get().is_some()
    }

    /// Returns `false` when no frame is pending afterwards.
    pub fn schedule(&self) -> bool {
        if self.is_pending() {
            return true;
        }
        let Some(w) = web::window() else {
            return false;
        };
        match w.request_animation_frame(self.tick.as_ref().unchecked_ref()) {
            Ok(id) => {
                self.handle.set(Some(id));
                true
            }
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                false
            }
        }
    }

    /// The pending frame is running; a new one may be requested.
    #[inline]
    pub fn fired(&self) {
        self.handle.set(None);
    }

    pub fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
    }
}
