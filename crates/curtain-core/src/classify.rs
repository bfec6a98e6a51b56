//! Heuristic classification of comment-section blocks.
//!
//! The rules are deliberately simple string and geometry checks: a block
//! qualifies when its text or attributes mention comments in one of the
//! supported languages, it is large enough to be a section rather than a
//! button, and it participates in layout.

/// Surface forms that mark an element as comment-related.
///
/// Lower case on purpose: candidate text and attributes are normalized
/// before matching, so one entry covers every capitalization the page uses.
/// Stems (`комментар`) match their full inflected forms via substring
/// containment.
pub const COMMENT_KEYWORDS: &[&str] = &[
    "комментар",
    "comment",
    "ответ",
    "reply",
    "написать комментарий",
    "write comment",
];

/// Candidates shorter than this and narrower than [`MIN_BLOCK_WIDTH`] are
/// taken for buttons or links that merely mention comments.
pub const MIN_BLOCK_HEIGHT: f64 = 50.0;

/// See [`MIN_BLOCK_HEIGHT`]. Rejection requires both dimensions to be small.
pub const MIN_BLOCK_WIDTH: f64 = 100.0;

/// DOM-free view of one candidate element.
///
/// The browser layer fills this from a live element; tests construct it
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSnapshot {
    /// Rendered text content, untrimmed. Empty when the node has none.
    pub text: String,
    /// Raw `class` attribute value, empty when absent.
    pub class_attr: String,
    /// Raw `id` attribute value, empty when absent.
    pub id_attr: String,
    /// Bounding box width in CSS pixels.
    pub width: f64,
    /// Bounding box height in CSS pixels.
    pub height: f64,
    /// Whether the element has an offset parent, i.e. occupies layout.
    pub has_layout_box: bool,
    /// Whether an inline `display: none` override is currently applied.
    pub inline_hidden: bool,
}

/// Decide whether a candidate is a comment-section block.
///
/// Pure and total: empty or malformed input classifies as `false`, never
/// panics. Rules run cheapest-first so most candidates bail on the keyword
/// check.
pub fn is_comment_block(candidate: &CandidateSnapshot) -> bool {
    if !mentions_comments(candidate) {
        return false;
    }

    // Small boxes that merely mention comments are buttons or links.
    if candidate.height < MIN_BLOCK_HEIGHT && candidate.width < MIN_BLOCK_WIDTH {
        return false;
    }

    // Elements outside the rendered layout were hidden by the page or an
    // ancestor; leave them alone. An element whose own inline style says
    // `display: none` is exempt from this rule.
    if !candidate.has_layout_box && !candidate.inline_hidden {
        return false;
    }

    true
}

fn mentions_comments(candidate: &CandidateSnapshot) -> bool {
    let text = candidate.text.to_lowercase();
    let class_attr = candidate.class_attr.to_lowercase();
    let id_attr = candidate.id_attr.to_lowercase();

    COMMENT_KEYWORDS.iter().any(|keyword| {
        class_attr.contains(keyword) || id_attr.contains(keyword) || text.contains(keyword)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, class_attr: &str, width: f64, height: f64) -> CandidateSnapshot {
        CandidateSnapshot {
            text: text.to_string(),
            class_attr: class_attr.to_string(),
            id_attr: String::new(),
            width,
            height,
            has_layout_box: true,
            inline_hidden: false,
        }
    }

    #[test]
    fn test_keyword_in_class() {
        assert!(is_comment_block(&candidate("", "comments-block", 400.0, 600.0)));
    }

    #[test]
    fn test_keyword_in_id() {
        let mut c = candidate("", "", 400.0, 600.0);
        c.id_attr = "commentSection".to_string();
        assert!(is_comment_block(&c));
    }

    #[test]
    fn test_keyword_in_text() {
        assert!(is_comment_block(&candidate(
            "Написать комментарий",
            "panel",
            400.0,
            120.0
        )));
    }

    #[test]
    fn test_keyword_case_insensitive() {
        assert!(is_comment_block(&candidate("", "CommentsList", 400.0, 600.0)));
        assert!(is_comment_block(&candidate("КОММЕНТАРИИ", "panel", 400.0, 600.0)));
    }

    #[test]
    fn test_russian_stem_matches_inflections() {
        for text in ["комментарий", "комментарии", "комментариев"] {
            assert!(is_comment_block(&candidate(text, "", 400.0, 600.0)));
        }
    }

    #[test]
    fn test_reply_keywords() {
        assert!(is_comment_block(&candidate("Ответить", "", 400.0, 60.0)));
        assert!(is_comment_block(&candidate("Reply", "", 400.0, 60.0)));
    }

    #[test]
    fn test_no_keyword_rejected() {
        assert!(!is_comment_block(&candidate("Похожие видео", "sidebar", 400.0, 600.0)));
    }

    #[test]
    fn test_small_box_rejected() {
        // A 20x80 link mentioning comments is a button, not a section.
        assert!(!is_comment_block(&candidate("Comment", "comment-link", 80.0, 20.0)));
    }

    #[test]
    fn test_one_large_dimension_accepted() {
        // Rejection needs both dimensions below threshold.
        assert!(is_comment_block(&candidate("comments", "", 50.0, 60.0)));
        assert!(is_comment_block(&candidate("comments", "", 200.0, 10.0)));
    }

    #[test]
    fn test_threshold_boundary() {
        assert!(!is_comment_block(&candidate("comments", "", 99.9, 49.9)));
        assert!(is_comment_block(&candidate("comments", "", 100.0, 49.9)));
        assert!(is_comment_block(&candidate("comments", "", 99.9, 50.0)));
    }

    #[test]
    fn test_no_layout_box_rejected() {
        let mut c = candidate("comments", "comments-block", 400.0, 600.0);
        c.has_layout_box = false;
        assert!(!is_comment_block(&c));
    }

    #[test]
    fn test_collapsed_hidden_element_rejected_by_size() {
        // A hidden element measures 0x0, so the size rule rejects it
        // before the layout rule is consulted.
        let mut c = candidate("comments", "comments-block", 0.0, 0.0);
        c.has_layout_box = false;
        c.inline_hidden = true;
        assert!(!is_comment_block(&c));
    }

    #[test]
    fn test_inline_hidden_exempt_from_layout_rule() {
        // The missing-layout-box rejection only applies when the element
        // carries no inline override of its own.
        let mut c = candidate("comments", "comments-block", 400.0, 600.0);
        c.has_layout_box = false;
        c.inline_hidden = true;
        assert!(is_comment_block(&c));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(!is_comment_block(&candidate("", "", 0.0, 0.0)));
    }

    #[test]
    fn test_huge_input_no_panic() {
        let mut text = "x".repeat(1 << 20);
        text.push_str("комментарии");
        assert!(is_comment_block(&candidate(&text, "", 400.0, 600.0)));
    }
}
