//! Candidate element discovery.
//!
//! Walks the document with the selector list from `curtain-core` and yields
//! each match together with the snapshot the classifier consumes. Selector
//! evaluation is isolated: one failing selector is logged and skipped, the
//! rest still run.

use curtain_core::{CANDIDATE_SELECTORS, CandidateSnapshot};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, NodeList};

/// A live candidate element plus the derived snapshot for classification.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The matched element, still owned by the page.
    pub element: Element,
    /// Read-only view the classifier operates on.
    pub snapshot: CandidateSnapshot,
}

/// Lazily yield every candidate in selector order.
///
/// Elements matched by several selectors appear once per match; callers
/// treat candidates idempotently so duplicates are harmless. Each call
/// walks the DOM fresh, nothing is cached between scans.
pub fn candidates(document: &Document) -> impl Iterator<Item = Candidate> + '_ {
    candidates_for(document, CANDIDATE_SELECTORS)
}

/// The same walk over a caller-provided selector list.
pub fn candidates_for<'a>(
    document: &'a Document,
    selectors: &'a [&str],
) -> impl Iterator<Item = Candidate> + 'a {
    selectors
        .iter()
        .flat_map(move |selector| {
            let nodes = match document.query_selector_all(selector) {
                Ok(nodes) => Some(nodes),
                Err(err) => {
                    // One failing selector must not starve the rest.
                    tracing::debug!(%selector, ?err, "candidate query failed");
                    None
                }
            };
            NodeListElements { nodes, index: 0 }
        })
        .map(|element| {
            let snapshot = snapshot_element(&element);
            Candidate { element, snapshot }
        })
}

/// Capture the classifier's view of one element.
///
/// Elements outside the HTML namespace have no `offsetParent`; they count
/// as laid out so geometry alone decides for them.
pub fn snapshot_element(element: &Element) -> CandidateSnapshot {
    let rect = element.get_bounding_client_rect();
    let (has_layout_box, inline_hidden) = match element.dyn_ref::<web_sys::HtmlElement>() {
        Some(html) => {
            let inline_display = html
                .style()
                .get_property_value("display")
                .unwrap_or_default();
            (html.offset_parent().is_some(), inline_display == "none")
        }
        None => (true, false),
    };

    CandidateSnapshot {
        text: element.text_content().unwrap_or_default(),
        class_attr: element.get_attribute("class").unwrap_or_default(),
        id_attr: element.get_attribute("id").unwrap_or_default(),
        width: rect.width(),
        height: rect.height(),
        has_layout_box,
        inline_hidden,
    }
}

struct NodeListElements {
    nodes: Option<NodeList>,
    index: u32,
}

impl Iterator for NodeListElements {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        let nodes = self.nodes.as_ref()?;
        while self.index < nodes.length() {
            let node = nodes.item(self.index);
            self.index += 1;
            if let Some(element) = node.and_then(|node| node.dyn_into::<Element>().ok()) {
                return Some(element);
            }
        }
        None
    }
}
