//! Structural selectors that produce the candidate pool.

/// Selector list evaluated in order on every scan.
///
/// CSS attribute matching is case-sensitive, so the capitalized variants are
/// listed separately even though the classifier normalizes afterwards. The
/// tag-qualified entries overlap the attribute-only ones; scans tolerate
/// duplicate matches because hiding is idempotent.
pub const CANDIDATE_SELECTORS: &[&str] = &[
    r#"[class*="comment"]"#,
    r#"[id*="comment"]"#,
    r#"[class*="Comment"]"#,
    r#"[id*="Comment"]"#,
    r#"section[class*="comment"]"#,
    r#"div[class*="comment"]"#,
    r#"aside[class*="comment"]"#,
];
