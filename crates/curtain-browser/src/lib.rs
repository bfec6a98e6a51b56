//! Browser DOM layer for the curtain comment-hiding engine.
//!
//! This crate turns the pure rules from `curtain-core` into page behavior:
//! scanning the live DOM, applying and reverting `display` overrides, and
//! reacting to mutations, client-side navigation, and settings changes. It
//! assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `scan`: candidate element discovery via the fixed selector list
//! - `hide`: inline-style hiding with engine-owned restore tracking
//! - `mutation`: debounced `MutationObserver` driving rescans
//! - `navigation`: history interception and `popstate` for SPA routing
//! - `state`: the enabled/disabled controller gating everything
//! - `storage`: persisted-flag access with extension/localStorage backends
//!
//! # Re-exports
//!
//! This crate re-exports `curtain-core` for convenience, so consumers only
//! need to depend on `curtain-browser`.

// Re-export core crate
pub use curtain_core;
pub use curtain_core::*;

pub mod hide;
pub mod mutation;
pub mod navigation;
pub mod scan;
pub mod state;
pub mod storage;

pub use hide::{CommentHider, HIDDEN_MARKER_ATTR};
pub use mutation::MutationWatcher;
pub use navigation::NavigationWatcher;
pub use scan::{Candidate, candidates, candidates_for, snapshot_element};
pub use state::EngineController;
pub use storage::{FlagSubscription, SettingsStore};
