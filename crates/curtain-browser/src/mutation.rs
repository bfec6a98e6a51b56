//! Debounced DOM mutation watching.
//!
//! Observes a subtree for added nodes and `class`/`id` attribute changes
//! and collapses bursts into a single rescan callback. The observer is
//! disconnected on drop, so the watcher only exists while the engine is
//! enabled.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{MutationObserver, MutationObserverInit, MutationRecord, Node};

/// Quiet period that must follow a qualifying mutation burst before the
/// rescan callback runs.
pub const MUTATION_DEBOUNCE_MS: u32 = 100;

/// Watches a DOM subtree and schedules debounced rescans.
pub struct MutationWatcher {
    observer: MutationObserver,
    shared: Rc<WatcherShared>,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

struct WatcherShared {
    debounce: RefCell<Option<Timeout>>,
    on_rescan: Box<dyn Fn()>,
}

impl MutationWatcher {
    /// Observe `target` and its subtree, invoking `on_rescan` once per
    /// settled burst of qualifying mutations.
    pub fn attach(target: &Node, on_rescan: impl Fn() + 'static) -> Result<Self, JsValue> {
        let shared = Rc::new(WatcherShared {
            debounce: RefCell::new(None),
            on_rescan: Box::new(on_rescan),
        });

        let callback = {
            let shared = Rc::clone(&shared);
            Closure::wrap(Box::new(
                move |records: js_sys::Array, _observer: MutationObserver| {
                    let qualifying = records.iter().any(|record| qualifies(&record));
                    if qualifying {
                        WatcherShared::schedule(&shared);
                    }
                },
            ) as Box<dyn FnMut(js_sys::Array, MutationObserver)>)
        };

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        options.set_attributes(true);
        let filter = js_sys::Array::of2(&"class".into(), &"id".into());
        options.set_attribute_filter(&filter);
        observer.observe_with_options(target, &options)?;

        tracing::trace!("mutation watcher attached");
        Ok(Self {
            observer,
            shared,
            _callback: callback,
        })
    }
}

impl Drop for MutationWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
        // Dropping the pending timeout cancels any rescan still in flight.
        self.shared.debounce.borrow_mut().take();
        tracing::trace!("mutation watcher detached");
    }
}

impl WatcherShared {
    fn schedule(shared: &Rc<Self>) {
        let weak = Rc::downgrade(shared);
        let timeout = Timeout::new(MUTATION_DEBOUNCE_MS, move || {
            if let Some(shared) = weak.upgrade() {
                (shared.on_rescan)();
            }
        });
        // Replacing the slot drops, and thereby cancels, the previous timer.
        *shared.debounce.borrow_mut() = Some(timeout);
    }
}

fn qualifies(record: &JsValue) -> bool {
    let Some(record) = record.dyn_ref::<MutationRecord>() else {
        return false;
    };
    if record.added_nodes().length() > 0 {
        return true;
    }
    record.type_() == "attributes"
        && matches!(record.attribute_name().as_deref(), Some("class" | "id"))
}
