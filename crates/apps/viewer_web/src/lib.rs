use console_error_panic_hook::set_once;
use std::cell::RefCell;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use layers::LayerKind;
use layers::raster::BaseMap;
use scene::{Action, FeatureRef, ViewStore, ViewerConfig};
use streaming::AreaDataLoader;

mod bridge;
mod source;

pub use bridge::{BaseMapOption, LayerControl, PlanView, Session};
pub use source::GlooSource;

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::default());
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn dispatch(action: Action) -> bool {
    SESSION.with(|session| match session.borrow_mut().dispatch(action) {
        Ok(()) => true,
        Err(err) => {
            let msg = format!("Selection rejected: {err}");
            web_sys::console::warn_1(&JsValue::from_str(&msg));
            false
        }
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Resets the view from a JSON `ViewerConfig` (defaults when absent).
/// Already loaded layers are kept.
#[wasm_bindgen]
pub fn configure(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => ViewerConfig::from_json_str(&json).map_err(js_err)?,
        None => ViewerConfig::default(),
    };
    SESSION.with(|session| {
        let mut s = session.borrow_mut();
        s.store = ViewStore::new(&config);
    });
    Ok(())
}

/// Starts loading every layer from `base_url`. `on_loaded` is called with
/// the layer id each time a layer becomes available; failures go to the
/// console and leave the layer unloaded.
#[wasm_bindgen]
pub fn load_layers(base_url: String, on_loaded: js_sys::Function) {
    let data = SESSION.with(|session| Arc::clone(&session.borrow().data));
    spawn_local(async move {
        let loader = AreaDataLoader::new(GlooSource::new(base_url), data);
        loader
            .load_all(|result| match result {
                Ok(outcome) => {
                    let id = JsValue::from_str(outcome.layer.id());
                    if let Err(err) = on_loaded.call1(&JsValue::NULL, &id) {
                        web_sys::console::error_1(&err);
                    }
                }
                Err(err) => {
                    let msg = format!("Failed to load layer: {err}");
                    web_sys::console::error_1(&JsValue::from_str(&msg));
                }
            })
            .await;
    });
}

#[wasm_bindgen]
pub fn layer_controls() -> Result<String, JsValue> {
    SESSION.with(|session| session.borrow().layer_controls_json().map_err(js_err))
}

#[wasm_bindgen]
pub fn base_maps() -> Result<String, JsValue> {
    SESSION.with(|session| session.borrow().base_maps_json().map_err(js_err))
}

#[wasm_bindgen]
pub fn toggle_layer(layer_id: &str) -> Result<(), JsValue> {
    let layer: LayerKind = layer_id.parse().map_err(js_err)?;
    dispatch(Action::ToggleLayer(layer));
    Ok(())
}

#[wasm_bindgen]
pub fn set_base_map(base_map_id: &str) -> Result<(), JsValue> {
    let base_map: BaseMap = base_map_id.parse().map_err(js_err)?;
    dispatch(Action::SetBaseMap(base_map));
    Ok(())
}

/// Activation on a rendered feature. Returns `false` when the target is not
/// selectable (hidden or unloaded layer, stale index).
#[wasm_bindgen]
pub fn select_feature(layer_id: &str, index: usize) -> Result<bool, JsValue> {
    let layer: LayerKind = layer_id.parse().map_err(js_err)?;
    Ok(dispatch(Action::Select(FeatureRef::new(layer, index))))
}

#[wasm_bindgen]
pub fn clear_selection() {
    dispatch(Action::ClearSelection);
}

#[wasm_bindgen]
pub fn render_plan() -> Result<String, JsValue> {
    SESSION.with(|session| session.borrow().render_plan_json().map_err(js_err))
}

#[wasm_bindgen]
pub fn detail_view() -> Result<String, JsValue> {
    SESSION.with(|session| session.borrow().detail_view_json().map_err(js_err))
}
