// src/lib.rs
pub mod error;
pub mod filter;
pub mod lines;
pub mod logging;
pub mod sink;

pub use error::*;
pub use filter::{
    field, filter_with_logs, Field, FilterLogsBuilder, FilterWithLogs, FilterWithLogsExt,
    LogFilter, LogRule,
};
pub use lines::{ErrorStrategy, Line, LineConfig, LineFilterPipeline, ProcessingStats, RuleSpec, RulesFile};
pub use sink::{render_template, CaptureSink, FnSink, LogEntry, LogSink, LogValue, SinkLevel, TracingSink};
