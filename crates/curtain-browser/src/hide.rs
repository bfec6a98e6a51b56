//! Inline-style hiding with engine-owned restore tracking.
//!
//! Hiding sets an inline `display: none` override plus a marker attribute
//! and records the node in a `WeakSet`. Restore walks the marker attribute
//! and only touches `WeakSet` members, so visibility changes made by the
//! page itself are never reverted. `WeakSet` entries do not keep nodes
//! alive; nodes removed between hide and restore simply drop out.

use curtain_core::is_comment_block;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::scan::{Candidate, candidates};

/// Attribute stamped on every element this engine hides.
///
/// Lets restore enumerate engine-owned elements without re-running the
/// candidate heuristics, which may match differently after the page mutates.
pub const HIDDEN_MARKER_ATTR: &str = "data-curtain-hidden";

/// Applies and reverts comment-block hiding, tracking ownership.
#[derive(Debug)]
pub struct CommentHider {
    hidden: std::cell::RefCell<js_sys::WeakSet>,
}

impl CommentHider {
    pub fn new() -> Self {
        Self {
            hidden: std::cell::RefCell::new(js_sys::WeakSet::new()),
        }
    }

    /// Scan the document and hide every classified comment block.
    ///
    /// Idempotent: candidates already carrying an inline `display: none`,
    /// whether from an earlier scan or from the page itself, are skipped.
    /// Returns the number of newly hidden elements.
    pub fn apply_scan(&self, document: &Document) -> u32 {
        let start = performance_now();
        let mut examined = 0u32;
        let mut hidden = 0u32;

        for candidate in candidates(document) {
            examined += 1;
            if !is_comment_block(&candidate.snapshot) {
                continue;
            }
            if self.hide(&candidate) {
                hidden += 1;
            }
        }

        let elapsed_ms = performance_now() - start;
        if hidden > 0 {
            tracing::debug!(hidden, examined, elapsed_ms, "scan hid comment blocks");
        } else {
            tracing::trace!(examined, elapsed_ms, "scan found nothing new");
        }
        hidden
    }

    /// Revert every element this engine hid and forget all ownership.
    ///
    /// Clearing the inline override hands `display` back to the page's
    /// stylesheets. Safe to call when nothing is hidden. Returns the number
    /// of elements restored.
    pub fn restore_all(&self, document: &Document) -> u32 {
        let marker_selector = format!("[{HIDDEN_MARKER_ATTR}]");
        let marked = match document.query_selector_all(&marker_selector) {
            Ok(marked) => marked,
            Err(err) => {
                tracing::warn!(?err, "marker query failed; nothing restored");
                return 0;
            }
        };
        let owned = self.hidden.replace(js_sys::WeakSet::new());

        let mut restored = 0u32;
        for index in 0..marked.length() {
            let Some(node) = marked.item(index) else {
                continue;
            };
            let Ok(element) = node.dyn_into::<Element>() else {
                continue;
            };
            // Markers survive on page-made clones of hidden nodes; only
            // nodes this engine hid are members.
            if !owned.has(&element) {
                continue;
            }
            if let Some(html) = element.dyn_ref::<HtmlElement>() {
                let _ = html.style().remove_property("display");
            }
            let _ = element.remove_attribute(HIDDEN_MARKER_ATTR);
            restored += 1;
        }

        tracing::debug!(restored, "restored comment blocks");
        restored
    }

    /// Whether this engine currently owns the hide on `element`.
    pub fn owns(&self, element: &Element) -> bool {
        self.hidden.borrow().has(element)
    }

    fn hide(&self, candidate: &Candidate) -> bool {
        // An existing inline override means either an earlier scan hid it
        // (nothing to do) or the page hid it (never ours to touch).
        if candidate.snapshot.inline_hidden {
            return false;
        }
        let Some(html) = candidate.element.dyn_ref::<HtmlElement>() else {
            return false;
        };
        if let Err(err) = html.style().set_property("display", "none") {
            tracing::debug!(?err, "display override failed");
            return false;
        }
        let _ = candidate.element.set_attribute(HIDDEN_MARKER_ATTR, "");
        self.hidden.borrow().add(&candidate.element);
        true
    }
}

impl Default for CommentHider {
    fn default() -> Self {
        Self::new()
    }
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0)
}
