// src/lines.rs
//! Line-oriented front end: filter text streams with regex rules.
pub mod config;
pub mod rules;
pub mod stream;

pub use config::{ErrorStrategy, LineConfig};
pub use rules::{RuleSpec, RulesFile};
pub use stream::{LineFilterPipeline, ProcessingStats};

/// One line of input, numbered from 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

impl Line {
    pub fn new(number: usize, text: String) -> Self {
        Line { number, text }
    }
}
