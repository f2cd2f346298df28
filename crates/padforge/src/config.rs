//! Configuration types for footprint evaluation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! configuration file; every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining limits and output settings.
//! - [`LimitsConfig`] - Resource limits applied to every evaluation.
//! - [`OutputConfig`] - How record output is formatted.
//!
//! # Example
//!
//! ```
//! # use padforge::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.limits().max_call_depth(), 64);
//! assert!(!config.output().pretty());
//! ```

use std::time::Duration;

use serde::Deserialize;

use padforge_parser::ParserConfig;

/// Top-level configuration combining limits and output settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Resource limits section.
    #[serde(default)]
    limits: LimitsConfig,

    /// Output formatting section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(limits: LimitsConfig, output: OutputConfig) -> Self {
        Self { limits, output }
    }

    /// Returns the resource limits.
    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Returns the output settings.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Resource limits applied to one evaluation.
///
/// Exceeding the wall-clock or operation budget produces a timeout fault;
/// exceeding any other limit produces a runtime or syntax fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    timeout_ms: u64,
    max_operations: u64,
    max_call_depth: usize,
    max_collection_len: usize,
    max_value_depth: usize,
    max_nesting: usize,
    max_expression_depth: usize,
    max_source_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2_000,
            max_operations: 5_000_000,
            max_call_depth: 64,
            max_collection_len: 100_000,
            max_value_depth: 256,
            max_nesting: padforge_parser::DEFAULT_MAX_NESTING,
            max_expression_depth: padforge_parser::DEFAULT_MAX_EXPRESSION_DEPTH,
            max_source_bytes: 1024 * 1024,
        }
    }
}

impl LimitsConfig {
    /// Wall-clock budget of one evaluation.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Number of interpreter steps one evaluation may take.
    pub fn max_operations(&self) -> u64 {
        self.max_operations
    }

    /// Deepest chain of script function calls.
    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// Largest list, tuple or string a script may build.
    pub fn max_collection_len(&self) -> usize {
        self.max_collection_len
    }

    /// Deepest nesting of lists and tuples inside one value.
    pub fn max_value_depth(&self) -> usize {
        self.max_value_depth
    }

    pub fn max_nesting(&self) -> usize {
        self.max_nesting
    }

    pub fn max_expression_depth(&self) -> usize {
        self.max_expression_depth
    }

    /// Largest script source accepted, in bytes.
    pub fn max_source_bytes(&self) -> usize {
        self.max_source_bytes
    }

    /// Returns the parser limits derived from these limits.
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::new(self.max_nesting, self.max_expression_depth)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_max_operations(mut self, max_operations: u64) -> Self {
        self.max_operations = max_operations;
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn with_max_collection_len(mut self, max_collection_len: usize) -> Self {
        self.max_collection_len = max_collection_len;
        self
    }

    pub fn with_max_value_depth(mut self, max_value_depth: usize) -> Self {
        self.max_value_depth = max_value_depth;
        self
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    pub fn with_max_source_bytes(mut self, max_source_bytes: usize) -> Self {
        self.max_source_bytes = max_source_bytes;
        self
    }
}

/// Output formatting settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    #[serde(default)]
    pretty: bool,
}

impl OutputConfig {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Returns whether JSON output is indented.
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}
