//! Decode options.

use serde::{Deserialize, Serialize};

/// Knobs for [`ModelDecoder`](crate::ModelDecoder).
///
/// Deserializes with every field optional, so a partial TOML or JSON table
/// only overrides what it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Fail when the header's object count differs from the objects found,
    /// instead of logging a warning.
    pub strict_object_count: bool,
    /// Require the `IEOF` marker. When unset, end of input also ends the
    /// model.
    pub require_eof_marker: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict_object_count: false,
            require_eof_marker: true,
        }
    }
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            strict_object_count: true,
            ..Self::default()
        }
    }
}
