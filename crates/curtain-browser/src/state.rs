//! The enabled/disabled controller gating the whole pipeline.
//!
//! Two states, driven solely by the persisted flag: enabling scans
//! immediately, scans again after a settle delay for late-rendering
//! content, and attaches the mutation watcher; disabling detaches the
//! watcher, cancels the pending settle scan, and restores everything the
//! engine hid. Scans re-check the flag when they fire, so a timer that
//! outlives a disable is a no-op.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use curtain_core::effective_enabled;
use gloo_timers::callback::Timeout;

use crate::hide::CommentHider;
use crate::mutation::MutationWatcher;

/// Delay before the second scan of an enable transition, catching content
/// that renders after the immediate scan.
pub const ENABLE_SETTLE_MS: u32 = 500;

/// Owns the engine state and the per-enable resources.
///
/// Clones share one underlying controller, which is how timer and watcher
/// callbacks reach back into it.
#[derive(Clone)]
pub struct EngineController {
    shared: Rc<ControllerShared>,
}

struct ControllerShared {
    enabled: Cell<bool>,
    hider: CommentHider,
    mutations: RefCell<Option<MutationWatcher>>,
    settle: RefCell<Option<Timeout>>,
}

impl EngineController {
    /// Controller in the disabled state with nothing attached. The startup
    /// flag load drives the first transition.
    pub fn new() -> Self {
        Self {
            shared: Rc::new(ControllerShared {
                enabled: Cell::new(false),
                hider: CommentHider::new(),
                mutations: RefCell::new(None),
                settle: RefCell::new(None),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.get()
    }

    /// Apply a stored flag value, at startup and on change notifications.
    ///
    /// A missing value counts as enabled. Values that do not change the
    /// effective state are ignored.
    pub fn apply_stored_flag(&self, stored: Option<bool>) {
        let enabled = effective_enabled(stored);
        if enabled == self.shared.enabled.get() {
            tracing::trace!(enabled, "flag notification without effective change");
            return;
        }
        if enabled {
            ControllerShared::enable(&self.shared);
        } else {
            ControllerShared::disable(&self.shared);
        }
    }

    /// Scan now if the engine is enabled; no-op otherwise.
    ///
    /// Entry point for the navigation watcher's settle callback.
    pub fn rescan(&self) {
        ControllerShared::apply_scan(&self.shared);
    }
}

impl Default for EngineController {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerShared {
    fn enable(shared: &Rc<Self>) {
        shared.enabled.set(true);
        tracing::info!("comment hiding enabled");

        Self::apply_scan(shared);

        // Second pass for content that lands after the first scan.
        let weak = Rc::downgrade(shared);
        *shared.settle.borrow_mut() = Some(Timeout::new(ENABLE_SETTLE_MS, move || {
            if let Some(shared) = weak.upgrade() {
                Self::apply_scan(&shared);
            }
        }));

        let Some(body) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body())
        else {
            tracing::warn!("document has no body; mutation watcher not attached");
            return;
        };
        let weak = Rc::downgrade(shared);
        let attached = MutationWatcher::attach(&body, move || {
            if let Some(shared) = weak.upgrade() {
                Self::apply_scan(&shared);
            }
        });
        match attached {
            Ok(watcher) => {
                *shared.mutations.borrow_mut() = Some(watcher);
            }
            Err(err) => tracing::warn!(?err, "mutation watcher attach failed"),
        }
    }

    fn disable(shared: &Rc<Self>) {
        shared.enabled.set(false);
        // Dropping the watcher disconnects the observer and cancels any
        // debounced rescan; dropping the timeout cancels the settle scan.
        shared.mutations.borrow_mut().take();
        shared.settle.borrow_mut().take();

        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let restored = shared.hider.restore_all(&document);
        tracing::info!(restored, "comment hiding disabled");
    }

    fn apply_scan(shared: &Rc<Self>) {
        if !shared.enabled.get() {
            tracing::trace!("scan skipped while disabled");
            return;
        }
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        shared.hider.apply_scan(&document);
    }
}
