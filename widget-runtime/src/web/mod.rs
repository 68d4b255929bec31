//! Browser Entry Point
//!
//! Boots the widget when the WASM module is instantiated and exposes the
//! host-facing controls.
//!
//! Every DOM callback funnels through [`dispatch`]. Events raised while another
//! event is being handled (the host hook calling `toggle()` synchronously, for
//! example) are queued and run right after it.

mod dom;
mod styles;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use gloo_net::http::Request;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::{ConfigLoadError, ConfigLoader};
use crate::widget::{RuntimeOptions, Widget, WidgetEvent};

pub use dom::DomSurface;

/// Host global read when the remote config is unavailable
pub const FALLBACK_GLOBAL: &str = "chatWidgetConfig";
/// Host global whose `init(config)` runs once all scripts loaded
pub const HOST_HOOK_GLOBAL: &str = "ChatWidget";
/// Window property the toggle function is installed under
pub const TOGGLE_GLOBAL: &str = "chatWidgetToggle";

thread_local! {
    static RUNTIME: RefCell<Option<Widget<DomSurface>>> = RefCell::new(None);
    static QUEUE: RefCell<VecDeque<WidgetEvent>> = RefCell::new(VecDeque::new());
    static DRAINING: Cell<bool> = Cell::new(false);
}

/// WASM entry point
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    wasm_bindgen_futures::spawn_local(boot());
}

/// Toggle the chat panel (same as clicking the launcher)
#[wasm_bindgen]
pub fn toggle() {
    dispatch(WidgetEvent::Toggle);
}

/// Remove the widget's listeners and timers
#[wasm_bindgen]
pub fn dispose() {
    dispatch(WidgetEvent::Dispose);
}

async fn boot() {
    let fetched = fetch_config().await;
    let globals = read_fallback_global();
    let (config, source) = ConfigLoader::resolve(fetched, globals.as_deref());
    tracing::debug!("Widget config source: {:?}", source);

    let Some(surface) = DomSurface::new() else {
        tracing::warn!("No document available, chat widget not started");
        return;
    };

    let widget = Widget::start(config, RuntimeOptions::default(), surface);
    RUNTIME.with(|runtime| *runtime.borrow_mut() = Some(widget));
    install_toggle_global();
}

/// Fetch the config document as text
async fn fetch_config() -> Result<String, ConfigLoadError> {
    let response = Request::get(ConfigLoader::CONFIG_PATH)
        .send()
        .await
        .map_err(|e| ConfigLoadError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(ConfigLoadError::Status(response.status()));
    }

    response
        .text()
        .await
        .map_err(|e| ConfigLoadError::Network(e.to_string()))
}

/// JSON form of `window.chatWidgetConfig`, if the host defines it
fn read_fallback_global() -> Option<String> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(FALLBACK_GLOBAL)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    js_sys::JSON::stringify(&value).ok()?.as_string()
}

/// Expose `window.chatWidgetToggle()` for hosts that don't use the module exports
fn install_toggle_global() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::wrap(Box::new(toggle) as Box<dyn FnMut()>);
    if let Err(e) = js_sys::Reflect::set(
        &window,
        &JsValue::from_str(TOGGLE_GLOBAL),
        callback.as_ref().unchecked_ref(),
    ) {
        tracing::warn!("Could not install window.{}: {:?}", TOGGLE_GLOBAL, e);
    }
    callback.forget();
}

/// Deliver an event to the running widget
pub(crate) fn dispatch(event: WidgetEvent) {
    QUEUE.with(|queue| queue.borrow_mut().push_back(event));
    if DRAINING.with(|draining| draining.replace(true)) {
        return;
    }

    loop {
        let Some(event) = QUEUE.with(|queue| queue.borrow_mut().pop_front()) else {
            break;
        };
        RUNTIME.with(|runtime| match runtime.borrow_mut().as_mut() {
            Some(widget) => widget.handle(event),
            None => tracing::debug!("Widget not started, dropping {:?}", event),
        });
    }

    DRAINING.with(|draining| draining.set(false));
}
