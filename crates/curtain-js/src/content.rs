//! Content-script entry point.
//!
//! Builds the hiding engine and its watchers, loads the stored flag, and
//! parks everything in a thread local so it lives as long as the page.

use std::cell::RefCell;
use std::rc::Rc;

use curtain_browser::{EngineController, FlagSubscription, NavigationWatcher, SettingsStore};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Everything the content script keeps alive for the lifetime of the page.
struct EngineRuntime {
    _controller: EngineController,
    _navigation: Option<NavigationWatcher>,
    _subscription: Option<FlagSubscription>,
    _store: Rc<SettingsStore>,
}

thread_local! {
    static ENGINE: RefCell<Option<EngineRuntime>> = const { RefCell::new(None) };
}

/// Start the hiding engine once the DOM is parsed.
#[wasm_bindgen]
pub fn start_content() {
    crate::when_dom_ready(wire_engine);
}

fn wire_engine() {
    let controller = EngineController::new();
    let store = Rc::new(SettingsStore::new());

    let navigation = {
        let controller = controller.clone();
        match NavigationWatcher::install(move || controller.rescan()) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                tracing::warn!(?err, "history hooks unavailable");
                None
            }
        }
    };

    let subscription = {
        let controller = controller.clone();
        match store.subscribe(move |stored| controller.apply_stored_flag(stored)) {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                tracing::warn!(?err, "settings change subscription unavailable");
                None
            }
        }
    };

    // The first enable happens once the stored flag answers; an absent
    // value turns the engine on.
    {
        let controller = controller.clone();
        let store = Rc::clone(&store);
        spawn_local(async move {
            let stored = store.load().await;
            controller.apply_stored_flag(stored);
        });
    }

    ENGINE.with(|slot| {
        *slot.borrow_mut() = Some(EngineRuntime {
            _controller: controller,
            _navigation: navigation,
            _subscription: subscription,
            _store: store,
        });
    });
    tracing::info!("curtain engine attached");
}
