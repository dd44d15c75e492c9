use console_error_panic_hook::set_once;
use gloo_net::http::Request as HttpRequest;
use std::cell::RefCell;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use catalog::ReferenceCatalog;
use compute::{ControllerError, GlobeController};
use scene::GlobeScene;
use streaming::{ApiConfig, Request};

/// CSS class toggled on marker elements that should not be shown.
const HIDDEN_CLASS: &str = "hidden";

thread_local! {
    static STATE: RefCell<Option<GlobeController>> = const { RefCell::new(None) };
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn with_controller<R>(f: impl FnOnce(&mut GlobeController) -> R) -> Result<R, JsValue> {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        match s.as_mut() {
            Some(controller) => Ok(f(controller)),
            None => Err(to_js(ControllerError::NotReady)),
        }
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    let catalog = ReferenceCatalog::builtin().map_err(to_js)?;
    let mut controller = GlobeController::new(catalog, ApiConfig::from_build_env());
    controller.attach_catalog_scene();
    STATE.with(|state| {
        *state.borrow_mut() = Some(controller);
    });
    Ok(())
}

/// Questions offered in the dropdown, as JSON.
#[wasm_bindgen]
pub fn questions_json() -> Result<String, JsValue> {
    serde_json::to_string(streaming::questions()).map_err(to_js)
}

/// Starts a query; the response is applied when it arrives unless a newer
/// query or a clear has happened in between.
#[wasm_bindgen]
pub fn select_question(id: &str) -> Result<(), JsValue> {
    let pending = with_controller(|c| c.select_question(id))?.map_err(to_js)?;
    let request = pending.request;
    let url = pending.url;
    spawn_local(async move {
        match fetch_text(&url).await {
            Ok(body) => on_response(request, &body),
            Err(err) => {
                let reason = err.as_string().unwrap_or_else(|| format!("{err:?}"));
                log(&format!("metrics fetch failed: {reason}"));
                match with_controller(|c| c.fetch_failed(request, &reason)) {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => log(&format!("fetch failure ignored: {err}")),
                    Err(err) => log(&format!("fetch failure ignored: {err:?}")),
                }
            }
        }
    });
    Ok(())
}

fn on_response(request: Request, body: &str) {
    let applied = with_controller(|c| c.apply_response(request, body));
    match applied {
        Ok(Ok(_)) => {
            if let Err(err) = sync_markers() {
                log(&format!("marker update failed: {err:?}"));
            }
        }
        Ok(Err(err)) => log(&format!("metrics response ignored: {err}")),
        Err(err) => log(&format!("metrics response ignored: {err:?}")),
    }
}

#[wasm_bindgen]
pub fn clear_selection() -> Result<(), JsValue> {
    with_controller(|c| c.clear())?.map_err(to_js)?;
    sync_markers()
}

/// Current polygon colors keyed by country code, as JSON hex strings.
#[wasm_bindgen]
pub fn polygon_colors_json() -> Result<String, JsValue> {
    let colors = with_controller(|c| {
        c.scene()
            .map(|scene| {
                scene
                    .polygons()
                    .iter()
                    .map(|p| (p.code.to_string(), p.color.to_hex()))
                    .collect::<BTreeMap<_, _>>()
            })
            .unwrap_or_default()
    })?;
    serde_json::to_string(&colors).map_err(to_js)
}

#[wasm_bindgen]
pub fn open_country(code: &str) -> Result<(), JsValue> {
    with_controller(|c| c.open_modal(code))?.map_err(to_js)
}

#[wasm_bindgen]
pub fn close_country() -> Result<(), JsValue> {
    with_controller(|c| c.close_modal())
}

/// Fields of the open country panel as a JSON object, or `null`.
#[wasm_bindgen]
pub fn country_details_json() -> Result<String, JsValue> {
    let detail = with_controller(|c| c.modal())?;
    let json = match detail {
        Some(detail) => {
            let fields: BTreeMap<String, String> = detail.fields.into_iter().collect();
            serde_json::json!({ "code": detail.code.as_str(), "fields": fields })
        }
        None => serde_json::Value::Null,
    };
    serde_json::to_string(&json).map_err(to_js)
}

/// Mirrors marker visibility onto the DOM elements carrying their ids.
fn sync_markers() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let toggles: Vec<(String, bool)> = with_controller(|c| {
        c.scene()
            .map(GlobeScene::markers)
            .unwrap_or_default()
            .iter()
            .map(|m| (m.dom_id(), m.is_visible()))
            .collect()
    })?;
    for (dom_id, visible) in toggles {
        // Elements are created by the renderer and may not exist yet.
        if let Some(el) = document.get_element_by_id(&dom_id) {
            el.class_list().toggle_with_force(HIDDEN_CLASS, !visible)?;
        }
    }
    Ok(())
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = HttpRequest::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }
    resp.text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
