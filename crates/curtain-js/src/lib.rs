//! WASM entry points for the curtain comment-hiding add-on.
//!
//! Two bindings are exported: [`start_content`] runs inside the page and
//! drives the hiding engine, [`start_panel`] wires the popup toggle. The
//! add-on loader calls one or the other after instantiating the module.

mod content;
mod panel;

pub use content::start_content;
pub use panel::start_panel;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Initialize panic reporting and console logging. Runs once per module
/// instantiation.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let reg = Registry::default().with(wasm_layer);

    // Content script and panel may share a JS context; keep the first
    // subscriber.
    let _ = set_global_default(reg);
}

/// Run `callback` now if the DOM is parsed, otherwise after
/// `DOMContentLoaded`. Entry points may be injected at `document_start`,
/// before the body exists.
pub(crate) fn when_dom_ready(callback: fn()) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };

    if document.ready_state() == "loading" {
        let deferred = Closure::once(callback);
        let _ = document
            .add_event_listener_with_callback("DOMContentLoaded", deferred.as_ref().unchecked_ref());
        // Fires at most once, then the page keeps nothing but what the
        // callback wired.
        deferred.forget();
    } else {
        callback();
    }
}
