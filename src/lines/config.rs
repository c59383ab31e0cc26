// src/lines/config.rs

/// Configuration for line processing
#[derive(Debug, Clone)]
pub struct LineConfig {
    pub error_strategy: ErrorStrategy,
    pub debug: bool,
    pub buffer_size: usize,
    pub max_line_length: usize,
}

impl Default for LineConfig {
    fn default() -> Self {
        LineConfig {
            error_strategy: ErrorStrategy::Skip,
            debug: false,
            buffer_size: 65536,       // 64KB
            max_line_length: 1048576, // 1MB
        }
    }
}

/// What to do with a line longer than `max_line_length`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStrategy {
    /// Drop the line, count it as an error and continue
    Skip,
    /// Stop processing on first error
    FailFast,
}
