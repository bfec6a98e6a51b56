//! Client-side navigation detection.
//!
//! Single-page routing changes the URL without reloading the document, so
//! the engine wraps `history.pushState` and `history.replaceState` with a
//! same-signature interceptor and listens for `popstate`. The preserved
//! original function always runs first; afterwards the current URL is
//! compared against the last observed one and a change schedules the settle
//! callback. Full-page navigations are not intercepted, the whole engine
//! reloads with the document.

use std::cell::RefCell;
use std::rc::Rc;

use curtain_core::UrlTracker;
use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::History;

/// Delay between a detected URL change and the settle callback, letting the
/// route's content render first.
pub const NAVIGATION_SETTLE_MS: u32 = 300;

/// Wraps the session-history mutators and watches `popstate`.
///
/// Dropping the watcher restores the original history functions and removes
/// the `popstate` listener.
pub struct NavigationWatcher {
    shared: Rc<WatcherShared>,
    history: History,
    original_push: js_sys::Function,
    original_replace: js_sys::Function,
    _push_hook: Closure<dyn FnMut(JsValue, JsValue, JsValue)>,
    _replace_hook: Closure<dyn FnMut(JsValue, JsValue, JsValue)>,
    _popstate: EventListener,
}

struct WatcherShared {
    tracker: RefCell<UrlTracker>,
    settle: RefCell<Option<Timeout>>,
    after_settle: Box<dyn Fn()>,
}

impl NavigationWatcher {
    /// Install the interceptor and the `popstate` listener, priming the URL
    /// tracker with the current `location.href`.
    ///
    /// `after_settle` runs once per URL change, [`NAVIGATION_SETTLE_MS`]
    /// after the change; a newer navigation inside that window replaces the
    /// pending run.
    pub fn install(after_settle: impl Fn() + 'static) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let history = window.history()?;
        let href = window.location().href().unwrap_or_default();

        let shared = Rc::new(WatcherShared {
            tracker: RefCell::new(UrlTracker::primed(href)),
            settle: RefCell::new(None),
            after_settle: Box::new(after_settle),
        });

        let original_push = history_fn(&history, "pushState")?;
        let original_replace = history_fn(&history, "replaceState")?;

        let push_hook = make_hook(&history, &original_push, &shared);
        let replace_hook = make_hook(&history, &original_replace, &shared);
        Reflect::set(&history, &"pushState".into(), push_hook.as_ref())?;
        Reflect::set(&history, &"replaceState".into(), replace_hook.as_ref())?;

        let popstate = {
            let shared = Rc::clone(&shared);
            EventListener::new(&window, "popstate", move |_event| {
                WatcherShared::check_url(&shared);
            })
        };

        tracing::debug!("navigation watcher installed");
        Ok(Self {
            shared,
            history,
            original_push,
            original_replace,
            _push_hook: push_hook,
            _replace_hook: replace_hook,
            _popstate: popstate,
        })
    }

    /// Last URL the watcher has observed.
    pub fn current_url(&self) -> Option<String> {
        self.shared.tracker.borrow().current().map(str::to_owned)
    }
}

impl Drop for NavigationWatcher {
    fn drop(&mut self) {
        let _ = Reflect::set(&self.history, &"pushState".into(), &self.original_push);
        let _ = Reflect::set(&self.history, &"replaceState".into(), &self.original_replace);
        self.shared.settle.borrow_mut().take();
        tracing::debug!("navigation watcher removed");
    }
}

impl WatcherShared {
    fn check_url(shared: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(href) = window.location().href() else {
            return;
        };
        if !shared.tracker.borrow_mut().observe(&href) {
            return;
        }

        tracing::debug!(url = %href, "client-side navigation");
        let weak = Rc::downgrade(shared);
        let timeout = Timeout::new(NAVIGATION_SETTLE_MS, move || {
            if let Some(shared) = weak.upgrade() {
                (shared.after_settle)();
            }
        });
        // A newer navigation replaces, and thereby cancels, the pending run.
        *shared.settle.borrow_mut() = Some(timeout);
    }
}

fn history_fn(history: &History, name: &str) -> Result<js_sys::Function, JsValue> {
    Reflect::get(history, &JsValue::from_str(name))?.dyn_into::<js_sys::Function>()
}

fn make_hook(
    history: &History,
    original: &js_sys::Function,
    shared: &Rc<WatcherShared>,
) -> Closure<dyn FnMut(JsValue, JsValue, JsValue)> {
    let this: JsValue = history.clone().into();
    let original = original.clone();
    let shared = Rc::clone(shared);
    Closure::wrap(Box::new(move |state: JsValue, title: JsValue, url: JsValue| {
        if let Err(err) = original.call3(&this, &state, &title, &url) {
            // The caller sees the original's exception unchanged; the URL
            // check is skipped for the failed call.
            wasm_bindgen::throw_val(err);
        }
        WatcherShared::check_url(&shared);
    }) as Box<dyn FnMut(JsValue, JsValue, JsValue)>)
}
