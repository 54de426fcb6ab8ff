//! Editor Configuration

use serde::Deserialize;

use pagecraft_dom::SOURCE_STATE_PREFIX;

/// Editor configuration options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Number of earlier page versions kept for undo
    pub history_limit: usize,

    /// Prefix of states published by data sources
    pub state_prefix: String,

    /// Fail loading on the first malformed node instead of dropping it
    pub strict_decode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: 100,
            state_prefix: SOURCE_STATE_PREFIX.to_string(),
            strict_decode: false,
        }
    }
}
