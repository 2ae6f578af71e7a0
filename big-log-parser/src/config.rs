//! Scanner configuration types
//!
//! The scanner needs almost no configuration: the only knob is an optional
//! ceiling on the number of lines read, used for sampling large logs.

use serde::{Deserialize, Serialize};

/// Configuration for [`LogScanner`](crate::LogScanner)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Optional: stop after reading this many lines (None = whole file)
    #[serde(default)]
    pub max_lines: Option<usize>,
}

impl ScanConfig {
    /// Create a new scan configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: stop after `max_lines` lines
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    /// Builder method: set or clear the line ceiling
    pub fn with_line_limit(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Check whether another line may be read after `lines_read` lines
    pub fn should_continue(&self, lines_read: usize) -> bool {
        match self.max_lines {
            Some(max) => lines_read < max,
            None => true,
        }
    }
}
