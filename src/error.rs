// src/error.rs

/// Raised when a filter cannot be finalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("log sink is missing: build() requires a sink")]
    MissingSink,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Line {line} too long: {length} > {max_length}")]
    LineTooLong {
        line: usize,
        length: usize,
        max_length: usize,
    },

    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Debug, thiserror::Error)]
pub enum CompilationError {
    #[error("Invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid rule '{rule}': {message}")]
    RuleSyntax { rule: String, message: String },

    #[error("Unknown field '{field}' in rule '{rule}'")]
    UnknownField { rule: String, field: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<serde_yaml::Error> for CompilationError {
    fn from(err: serde_yaml::Error) -> Self {
        CompilationError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for CompilationError {
    fn from(err: std::io::Error) -> Self {
        CompilationError::FileNotFound(err.to_string())
    }
}
