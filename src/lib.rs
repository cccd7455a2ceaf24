#![cfg(target_arch = "wasm32")]
use ripple_core::compose::{HeroLabels, ThemeColors};
use ripple_core::{HeroEffect, RippleConfig};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod compose;
mod constants;
mod dom;
mod events;
mod frame;
mod hero;
mod render;

use compose::{CanvasSurface, DomTextLayout};
use events::{Observers, PointerListeners};
use hero::Shared;
use render::GpuRenderer;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hero-ripple loaded");
    Ok(())
}

/// Options object accepted by `mountHeroRipple`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MountOptions {
    theme: ThemeColors,
    labels: HeroLabels,
    config: RippleConfig,
}

fn from_js<T: DeserializeOwned + Default>(value: &JsValue) -> anyhow::Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    let json: String = js_sys::JSON::stringify(value)
        .map_err(|e| anyhow::anyhow!("options are not serializable: {:?}", e))?
        .into();
    Ok(serde_json::from_str(&json)?)
}

fn to_js_err(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

struct Mounted {
    shared: Rc<Shared>,
    pointers: PointerListeners,
    observers: Observers,
    on_ready: Option<js_sys::Function>,
}

impl Mounted {
    fn teardown(mut self) {
        self.shared.teardown();
        self.observers.disconnect();
        self.pointers.remove();
        if let Some(cb) = &self.on_ready {
            _ = cb.call1(&JsValue::NULL, &JsValue::FALSE);
        }
        log::info!("hero ripple unmounted");
    }
}

/// Handle to a mounted effect. Unmounting (or freeing the handle) stops the
/// loop, detaches every listener and releases the GPU resources.
#[wasm_bindgen]
pub struct HeroRipple {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl HeroRipple {
    /// Recompose with new theme colors. The simulation keeps running.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, theme: JsValue) -> Result<(), JsValue> {
        if let Some(m) = &self.mounted {
            m.shared.set_theme(from_js(&theme).map_err(to_js_err)?);
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = setLabels)]
    pub fn set_labels(&self, labels: JsValue) -> Result<(), JsValue> {
        if let Some(m) = &self.mounted {
            m.shared.set_labels(from_js(&labels).map_err(to_js_err)?);
        }
        Ok(())
    }

    pub fn unmount(&mut self) {
        if let Some(m) = self.mounted.take() {
            m.teardown();
        }
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }
}

impl Drop for HeroRipple {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Attach the ripple effect to `canvas`. Resolves to a [`HeroRipple`] handle,
/// or `undefined` when reduced motion is preferred or setup fails.
#[wasm_bindgen(js_name = mountHeroRipple)]
pub async fn mount_hero_ripple(
    canvas: web::HtmlCanvasElement,
    kicker: Option<web::HtmlElement>,
    subtitle: Option<web::HtmlElement>,
    options: JsValue,
    on_ready: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
    if dom::prefers_reduced_motion() {
        log::info!("reduced motion preferred; hero ripple disabled");
        return Ok(JsValue::UNDEFINED);
    }
    match mount(canvas, kicker, subtitle, &options, on_ready).await {
        Ok(handle) => Ok(handle.into()),
        Err(e) => {
            log::error!("hero ripple setup failed: {:?}", e);
            Ok(JsValue::UNDEFINED)
        }
    }
}

async fn mount(
    canvas: web::HtmlCanvasElement,
    kicker: Option<web::HtmlElement>,
    subtitle: Option<web::HtmlElement>,
    options: &JsValue,
    on_ready: Option<js_sys::Function>,
) -> anyhow::Result<HeroRipple> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let options: MountOptions = from_js(options)?;
    options.config.validate()?;

    let surface = CanvasSurface::new(&document)?;
    let renderer = GpuRenderer::new(&canvas).await?;
    let effect = HeroEffect::new(options.config, renderer, rand::random())?;
    let layout = DomTextLayout::new(canvas.clone(), kicker, subtitle);
    let shared = Shared::new(
        effect,
        canvas,
        surface,
        layout,
        options.theme,
        options.labels,
    );

    shared.set_visible(dom::document_visible());
    shared.resize();
    let pointers = events::wire_pointer_handlers(&window, &shared)?;
    let observers = events::wire_observers(&document, &shared)?;

    if let Some(cb) = &on_ready {
        _ = cb.call1(&JsValue::NULL, &JsValue::TRUE);
    }
    log::info!("hero ripple mounted");
    Ok(HeroRipple {
        mounted: Some(Mounted {
            shared,
            pointers,
            observers,
            on_ready,
        }),
    })
}
