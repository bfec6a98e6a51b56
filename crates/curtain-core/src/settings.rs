//! Persisted-flag handling shared by the engine and the settings panel.

use thiserror::Error;

/// Storage key for the enabled flag, in every backend.
pub const ENABLED_KEY: &str = "enabled";

/// A stored flag value that cannot be read as a boolean.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stored enabled flag is not a boolean: {0:?}")]
pub struct FlagDecodeError(pub String);

/// Effective enabled state for a stored value.
///
/// Anything except a literal stored `false` counts as enabled, so a missing
/// or corrupted value fails open instead of silently switching off.
pub fn effective_enabled(stored: Option<bool>) -> bool {
    stored.unwrap_or(true)
}

/// Decode a serialized flag as kept by the web-storage fallback backend.
///
/// Change notifications deliver the raw stored string, which is not run
/// through a deserializer on that path.
pub fn decode_flag(raw: &str) -> Result<bool, FlagDecodeError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(FlagDecodeError(other.to_string())),
    }
}
