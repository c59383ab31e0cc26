// src/filter/rule.rs
use std::fmt;
use std::sync::Arc;

use crate::sink::LogValue;

/// Extracts one loggable value from an element.
pub type Field<T> = Arc<dyn Fn(&T) -> LogValue + Send + Sync>;

/// Condition deciding whether a rule fires for an element.
pub type Condition<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Wrap a getter as a [`Field`]. The getter may return anything convertible
/// into a JSON value: numbers, strings, bools, `Option`s, vectors.
pub fn field<T, V, F>(getter: F) -> Field<T>
where
    T: 'static,
    V: Into<LogValue> + 'static,
    F: Fn(&T) -> V + Send + Sync + 'static,
{
    Arc::new(move |item: &T| getter(item).into())
}

/// A condition paired with a message template and the fields whose values
/// fill the template's placeholders, in order.
///
/// The number of fields is not checked against the number of placeholders.
pub struct LogRule<T> {
    condition: Condition<T>,
    message: String,
    fields: Vec<Field<T>>,
}

impl<T> LogRule<T> {
    pub fn new<C, F>(condition: C, message: impl Into<String>, fields: F) -> Self
    where
        C: Fn(&T) -> bool + Send + Sync + 'static,
        F: IntoIterator<Item = Field<T>>,
    {
        LogRule {
            condition: Arc::new(condition),
            message: message.into(),
            fields: fields.into_iter().collect(),
        }
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.condition)(item)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Apply every field to `item`, preserving field order
    pub fn extract_values(&self, item: &T) -> Vec<LogValue> {
        self.fields.iter().map(|field| field(item)).collect()
    }
}

impl<T> Clone for LogRule<T> {
    fn clone(&self) -> Self {
        LogRule {
            condition: Arc::clone(&self.condition),
            message: self.message.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl<T> fmt::Debug for LogRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRule")
            .field("message", &self.message)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}
