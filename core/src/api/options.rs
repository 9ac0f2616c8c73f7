//! Engine configuration.

use crate::syntax::{DEFAULT_MAX_DEPTH, ParseOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Deepest nesting accepted by the parser.
    pub max_depth: usize,
    /// Compile through the process-wide parse cache.
    ///
    /// The shared cache parses with the default limits, so it is only used
    /// when `max_depth` is left at its default.
    pub use_parse_cache: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            use_parse_cache: true,
        }
    }
}

impl EngineOptions {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth,
        }
    }
}
