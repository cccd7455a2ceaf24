use crate::constants::{MOUSE_EVENTS, PRIMARY_MOUSE_BUTTON, TOUCH_EVENTS};
use crate::dom::EventListener;
use crate::hero::Shared;
use ripple_core::PointerKind;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use web_sys as web;

/// Window-level mouse and touch listeners. Dropping them unregisters them.
pub struct PointerListeners {
    mouse: Vec<EventListener<dyn FnMut(web::MouseEvent)>>,
    touch: Vec<EventListener<dyn FnMut(web::TouchEvent)>>,
}

impl PointerListeners {
    pub fn remove(&mut self) {
        self.mouse.clear();
        self.touch.clear();
    }
}

pub fn wire_pointer_handlers(
    window: &web::Window,
    shared: &Rc<Shared>,
) -> anyhow::Result<PointerListeners> {
    let target: &web::EventTarget = window.as_ref();
    let mut mouse = Vec::with_capacity(MOUSE_EVENTS.len());
    for event in MOUSE_EVENTS {
        let closure = Closure::wrap(mouse_handler(event, Rc::downgrade(shared)));
        mouse.push(EventListener::passive(target, event, closure)?);
    }
    let mut touch = Vec::with_capacity(TOUCH_EVENTS.len());
    for event in TOUCH_EVENTS {
        let closure = Closure::wrap(touch_handler(event, Rc::downgrade(shared)));
        touch.push(EventListener::passive(target, event, closure)?);
    }
    Ok(PointerListeners { mouse, touch })
}

fn mouse_handler(event: &'static str, shared: Weak<Shared>) -> Box<dyn FnMut(web::MouseEvent)> {
    Box::new(move |ev: web::MouseEvent| {
        let Some(s) = shared.upgrade() else {
            return;
        };
        let (x, y) = (ev.client_x() as f32, ev.client_y() as f32);
        match event {
            "mousedown" => {
                if ev.button() == PRIMARY_MOUSE_BUTTON {
                    s.pointer_down(x, y, PointerKind::Mouse);
                }
            }
            "mousemove" => s.pointer_move(x, y, PointerKind::Mouse),
            _ => s.pointer_up(),
        }
    })
}

#[inline]
fn first_touch(ev: &web::TouchEvent) -> Option<web::Touch> {
    ev.touches().get(0).or_else(|| ev.changed_touches().get(0))
}

fn touch_handler(event: &'static str, shared: Weak<Shared>) -> Box<dyn FnMut(web::TouchEvent)> {
    Box::new(move |ev: web::TouchEvent| {
        let Some(s) = shared.upgrade() else {
            return;
        };
        match event {
            "touchstart" => {
                if let Some(t) = first_touch(&ev) {
                    s.pointer_down(t.client_x() as f32, t.client_y() as f32, PointerKind::Touch);
                }
            }
            "touchmove" => {
                if let Some(t) = first_touch(&ev) {
                    s.pointer_move(t.client_x() as f32, t.client_y() as f32, PointerKind::Touch);
                }
            }
            _ => s.touch_end(),
        }
    })
}
