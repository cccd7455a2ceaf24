use crate::constants::{FONT_REDRAW_DEBOUNCE_MS, INTERSECTION_THRESHOLD};
use crate::dom::{self, EventListener};
use crate::hero::Shared;
use std::cell::Cell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Debounced recomposition once web fonts finish loading.
struct FontRedraw {
    timer: Cell<Option<i32>>,
    live: Cell<bool>,
    redraw: Closure<dyn FnMut()>,
}

impl FontRedraw {
    fn new(shared: Weak<Shared>) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<FontRedraw>| {
            let this = this.clone();
            let redraw = Closure::wrap(Box::new(move || {
                if let Some(f) = this.upgrade() {
                    f.timer.set(None);
                }
                if let Some(s) = shared.upgrade() {
                    s.recompose();
                    s.render();
                }
            }) as Box<dyn FnMut()>);
            Self {
                timer: Cell::new(None),
                live: Cell::new(true),
                redraw,
            }
        })
    }

    fn arm(&self) {
        if !self.live.get() {
            return;
        }
        let Some(w) = web::window() else {
            return;
        };
        if let Some(id) = self.timer.take() {
            w.clear_timeout_with_handle(id);
        }
        match w.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.redraw.as_ref().unchecked_ref(),
            FONT_REDRAW_DEBOUNCE_MS,
        ) {
            Ok(id) => self.timer.set(Some(id)),
            Err(e) => log::warn!("font redraw timer: {:?}", e),
        }
    }

    fn cancel(&self) {
        self.live.set(false);
        if let Some(id) = self.timer.take() {
            if let Some(w) = web::window() {
                w.clear_timeout_with_handle(id);
            }
        }
    }
}

/// Resize, viewport and page-visibility observers plus the font-ready hook.
pub struct Observers {
    resize: web::ResizeObserver,
    _on_resize: Closure<dyn FnMut()>,
    intersection: web::IntersectionObserver,
    _on_intersect: Closure<dyn FnMut(js_sys::Array)>,
    visibility: Option<EventListener<dyn FnMut()>>,
    fonts: Rc<FontRedraw>,
}

impl Observers {
    pub fn disconnect(&mut self) {
        self.resize.disconnect();
        self.intersection.disconnect();
        self.visibility.take();
        self.fonts.cancel();
    }
}

impl Drop for Observers {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn js_err(what: &str) -> impl FnOnce(JsValue) -> anyhow::Error + '_ {
    move |e| anyhow::anyhow!("{what}: {:?}", e)
}

pub fn wire_observers(document: &web::Document, shared: &Rc<Shared>) -> anyhow::Result<Observers> {
    let canvas: &web::Element = shared.canvas().as_ref();

    let weak = Rc::downgrade(shared);
    let on_resize = Closure::wrap(Box::new(move || {
        if let Some(s) = weak.upgrade() {
            s.resize();
        }
    }) as Box<dyn FnMut()>);
    let resize = web::ResizeObserver::new(on_resize.as_ref().unchecked_ref())
        .map_err(js_err("ResizeObserver"))?;
    resize.observe(canvas);

    let weak = Rc::downgrade(shared);
    let on_intersect = Closure::wrap(Box::new(move |entries: js_sys::Array| {
        let in_view = entries
            .get(0)
            .dyn_into::<web::IntersectionObserverEntry>()
            .map(|e| e.is_intersecting())
            .unwrap_or(false);
        if let Some(s) = weak.upgrade() {
            s.set_in_view(in_view);
        }
    }) as Box<dyn FnMut(js_sys::Array)>);
    let init = web::IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(INTERSECTION_THRESHOLD));
    let intersection =
        web::IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)
            .map_err(js_err("IntersectionObserver"))?;
    intersection.observe(canvas);

    let weak = Rc::downgrade(shared);
    let on_visibility = Closure::wrap(Box::new(move || {
        if let Some(s) = weak.upgrade() {
            s.set_visible(dom::document_visible());
        }
    }) as Box<dyn FnMut()>);
    let visibility = EventListener::plain(document.as_ref(), "visibilitychange", on_visibility)?;

    let fonts = FontRedraw::new(Rc::downgrade(shared));
    match document.fonts().ready() {
        Ok(ready) => {
            let fonts = Rc::downgrade(&fonts);
            spawn_local(async move {
                if JsFuture::from(ready).await.is_ok() {
                    if let Some(f) = fonts.upgrade() {
                        f.arm();
                    }
                }
            });
        }
        Err(e) => log::debug!("font set not available: {:?}", e),
    }

    Ok(Observers {
        resize,
        _on_resize: on_resize,
        intersection,
        _on_intersect: on_intersect,
        visibility: Some(visibility),
        fonts,
    })
}
