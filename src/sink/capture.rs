// src/sink/capture.rs
use std::sync::{Arc, Mutex};

use super::template::render_template;
use super::{LogSink, LogValue};

/// One recorded log call
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub template: String,
    pub values: Vec<LogValue>,
}

impl LogEntry {
    /// The entry as a sink would print it
    pub fn rendered(&self) -> String {
        render_template(&self.template, &self.values)
    }
}

/// In-memory sink that records every call. Clones share the same store,
/// so a clone can be handed to `build()` while the original is inspected.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Rendered messages in call order
    pub fn messages(&self) -> Vec<String> {
        self.entries().iter().map(LogEntry::rendered).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().map(|mut e| e.clear()).ok();
    }
}

impl LogSink for CaptureSink {
    fn log(&self, template: &str, values: &[LogValue]) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(LogEntry {
                template: template.to_string(),
                values: values.to_vec(),
            });
        }
    }
}
