// src/sink.rs
//! Log sinks: the collaborator a built filter reports to.
//!
//! A sink receives the raw message template together with the values the
//! rule's fields extracted. How the two are combined into text is entirely up
//! to the sink; the bundled sinks all use [`render_template`].

pub mod capture;
pub mod template;
pub mod tracing_sink;

use std::sync::Arc;

pub use capture::{CaptureSink, LogEntry};
pub use template::render_template;
pub use tracing_sink::{SinkLevel, TracingSink};

/// A value extracted from an element for substitution into a message.
pub type LogValue = serde_json::Value;

/// Receiver of log calls issued by matching rules.
pub trait LogSink {
    fn log(&self, template: &str, values: &[LogValue]);
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn log(&self, template: &str, values: &[LogValue]) {
        (**self).log(template, values)
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn log(&self, template: &str, values: &[LogValue]) {
        (**self).log(template, values)
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn log(&self, template: &str, values: &[LogValue]) {
        (**self).log(template, values)
    }
}

/// Adapts a closure into a [`LogSink`].
#[derive(Debug, Clone)]
pub struct FnSink<F>(pub F);

impl<F> LogSink for FnSink<F>
where
    F: Fn(&str, &[LogValue]),
{
    fn log(&self, template: &str, values: &[LogValue]) {
        (self.0)(template, values)
    }
}
