//! curtain-core: pure comment-hiding rules without browser dependencies.
//!
//! This crate provides:
//! - `CandidateSnapshot` + `is_comment_block` - the classification rule chain
//! - `CANDIDATE_SELECTORS` - the structural selectors scans evaluate
//! - persisted-flag decoding with a fail-open default
//! - `UrlTracker` - client-side navigation detection state

pub mod classify;
pub mod selectors;
pub mod settings;
pub mod url;

pub use classify::{
    COMMENT_KEYWORDS, CandidateSnapshot, MIN_BLOCK_HEIGHT, MIN_BLOCK_WIDTH, is_comment_block,
};
pub use selectors::CANDIDATE_SELECTORS;
pub use settings::{ENABLED_KEY, FlagDecodeError, decode_flag, effective_enabled};
pub use url::UrlTracker;
