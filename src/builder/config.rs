//! Import configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`GraphBuilder`](super::GraphBuilder) run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Stop consuming events once this many errors have been recorded.
    /// `None` always reads the whole stream.
    pub breaking_threshold: Option<usize>,
    /// Report markup closed while a later markup of the same layer is
    /// still open.
    pub check_layer_nesting: bool,
    /// Warn about text that no open markup covers.
    pub warn_on_unmarked_text: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            breaking_threshold: None,
            check_layer_nesting: true,
            warn_on_unmarked_text: true,
        }
    }
}

impl ImportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort on the first recorded error.
    pub fn strict() -> Self {
        Self {
            breaking_threshold: Some(1),
            ..Default::default()
        }
    }

    pub fn with_breaking_threshold(mut self, threshold: usize) -> Self {
        self.breaking_threshold = Some(threshold);
        self
    }

    pub fn with_layer_nesting_check(mut self, check: bool) -> Self {
        self.check_layer_nesting = check;
        self
    }

    pub fn with_unmarked_text_warning(mut self, warn: bool) -> Self {
        self.warn_on_unmarked_text = warn;
        self
    }
}
