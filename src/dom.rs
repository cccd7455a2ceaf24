use crate::constants::REDUCED_MOTION_QUERY;
use ripple_core::CanvasRect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn prefers_reduced_motion() -> bool {
    web::window()
        .and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

#[inline]
pub fn device_pixel_ratio() -> f64 {
    web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

#[inline]
pub fn document_visible() -> bool {
    window_document()
        .map(|d| d.visibility_state() != web::VisibilityState::Hidden)
        .unwrap_or(true)
}

#[inline]
pub fn canvas_rect(canvas: &web::HtmlCanvasElement) -> CanvasRect {
    let r = canvas.get_bounding_client_rect();
    CanvasRect {
        left: r.left() as f32,
        top: r.top() as f32,
        width: r.width() as f32,
        height: r.height() as f32,
    }
}

/// Match the canvas backing store to the effect's device-pixel buffer size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, width: u32, height: u32) {
    if canvas.width() != width {
        canvas.set_width(width.max(1));
    }
    if canvas.height() != height {
        canvas.set_height(height.max(1));
    }
}

pub fn computed_style(el: &web::Element) -> Option<web::CssStyleDeclaration> {
    web::window().and_then(|w| w.get_computed_style(el).ok().flatten())
}

#[inline]
pub fn style_value(style: &web::CssStyleDeclaration, property: &str) -> String {
    style.get_property_value(property).unwrap_or_default()
}

/// A listener that stays registered until [`EventListener::remove`] is called
/// or it is dropped.
pub struct EventListener<E: ?Sized> {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<E>,
}

impl<E: ?Sized> EventListener<E> {
    pub fn passive(
        target: &web::EventTarget,
        event: &'static str,
        closure: Closure<E>,
    ) -> anyhow::Result<Self> {
        let options = web::AddEventListenerOptions::new();
        options.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| anyhow::anyhow!("add {event} listener: {:?}", e))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    pub fn plain(
        target: &web::EventTarget,
        event: &'static str,
        closure: Closure<E>,
    ) -> anyhow::Result<Self> {
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add {event} listener: {:?}", e))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    pub fn remove(&self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

impl<E: ?Sized> Drop for EventListener<E> {
    fn drop(&mut self) {
        self.remove();
    }
}
