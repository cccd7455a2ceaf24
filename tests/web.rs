#![cfg(target_arch = "wasm32")]
// Browser smoke tests: run with `wasm-pack test --headless --chrome`.

use hero_ripple::mount_hero_ripple;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys as web;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> web::HtmlCanvasElement {
    let document = web::window().unwrap().document().unwrap();
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    canvas.style().set_property("width", "320px").unwrap();
    canvas.style().set_property("height", "180px").unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
async fn invalid_config_resolves_to_no_effect() {
    let options = js_sys::JSON::parse(r#"{"config":{"maxPoints":41}}"#).unwrap();
    let handle = mount_hero_ripple(canvas(), None, None, options, None)
        .await
        .unwrap();
    assert!(handle.is_undefined());
}

#[wasm_bindgen_test]
async fn mount_never_rejects() {
    // Headless browsers may lack WebGPU; either outcome must resolve.
    let handle = mount_hero_ripple(canvas(), None, None, JsValue::UNDEFINED, None).await;
    assert!(handle.is_ok());
}
