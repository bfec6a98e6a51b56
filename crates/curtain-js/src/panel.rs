//! Popup panel wiring: the enable toggle and its status line.

use std::rc::Rc;

use curtain_browser::{SettingsStore, effective_enabled};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlInputElement, Window};

/// Wire the popup controls once the DOM is parsed.
#[wasm_bindgen]
pub fn start_panel() {
    crate::when_dom_ready(wire_panel);
}

fn wire_panel() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    // Missing elements are logged and skipped so stale popup markup never
    // throws into the host. Nothing below runs, theme included.
    let Some(toggle) = document.get_element_by_id("toggle") else {
        tracing::error!("panel markup missing #toggle");
        return;
    };
    let Ok(toggle) = toggle.dyn_into::<HtmlInputElement>() else {
        tracing::error!("#toggle is not an input element");
        return;
    };
    let Some(status) = document.get_element_by_id("status") else {
        tracing::error!("panel markup missing #status");
        return;
    };
    let Some(indicator) = document.get_element_by_id("statusIndicator") else {
        tracing::error!("panel markup missing #statusIndicator");
        return;
    };

    follow_color_scheme(&window, &document);

    let store = Rc::new(SettingsStore::new());

    // Reflect the stored flag once the backend answers.
    {
        let store = Rc::clone(&store);
        let toggle = toggle.clone();
        let status = status.clone();
        let indicator = indicator.clone();
        spawn_local(async move {
            let enabled = effective_enabled(store.load().await);
            toggle.set_checked(enabled);
            render_status(&status, &indicator, enabled);
        });
    }

    let on_change = {
        let toggle = toggle.clone();
        let status = status.clone();
        let indicator = indicator.clone();
        Closure::wrap(Box::new(move || {
            let enabled = toggle.checked();
            render_status(&status, &indicator, enabled);
            let store = Rc::clone(&store);
            spawn_local(async move {
                if let Err(err) = store.store(enabled).await {
                    tracing::warn!(?err, "failed to persist enabled flag");
                }
            });
        }) as Box<dyn FnMut()>)
    };
    if toggle
        .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
        .is_err()
    {
        tracing::error!("could not attach toggle listener");
    }
    // Popup-lifetime listener.
    on_change.forget();
}

fn render_status(status: &Element, indicator: &Element, enabled: bool) {
    if enabled {
        status.set_text_content(Some("Включено"));
        status.set_class_name("status-text enabled");
        indicator.set_class_name("status-indicator active");
    } else {
        status.set_text_content(Some("Выключено"));
        status.set_class_name("status-text disabled");
        indicator.set_class_name("status-indicator inactive");
    }
}

/// Follow the OS color scheme; the popup stylesheet keys off `data-theme`
/// on the document element.
fn follow_color_scheme(window: &Window, document: &Document) {
    let Ok(Some(query)) = window.match_media("(prefers-color-scheme: dark)") else {
        return;
    };
    let Some(root) = document.document_element() else {
        return;
    };

    let apply = {
        let query = query.clone();
        move || {
            let theme = if query.matches() { "dark" } else { "light" };
            let _ = root.set_attribute("data-theme", theme);
        }
    };
    apply();

    let listener = Closure::wrap(Box::new(apply) as Box<dyn FnMut()>);
    let _ = query.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
    listener.forget();
}
