// src/filter/builder.rs
use crate::error::BuildError;
use crate::filter::iter::{FilterWithLogs, LogFilter};
use crate::filter::rule::{Field, LogRule};
use crate::sink::LogSink;

/// Start building a filter over `source` that keeps the elements matching
/// `predicate`. Nothing is pulled from `source` until the built iterator is.
pub fn filter_with_logs<I, P>(source: I, predicate: P) -> FilterLogsBuilder<I::IntoIter, P>
where
    I: IntoIterator,
    P: Fn(&I::Item) -> bool,
{
    FilterLogsBuilder {
        source: source.into_iter(),
        predicate,
        rules: Vec::new(),
    }
}

/// Accumulates log rules for a filter. Consumed by [`FilterLogsBuilder::build`].
pub struct FilterLogsBuilder<I: Iterator, P> {
    source: I,
    predicate: P,
    rules: Vec<LogRule<I::Item>>,
}

impl<I, P> FilterLogsBuilder<I, P>
where
    I: Iterator,
    P: Fn(&I::Item) -> bool,
{
    /// Log `message` with the values of `fields` whenever `condition` holds
    /// for an element, whether or not the element is kept.
    ///
    /// Rules run in the order they were added.
    pub fn log_when<C, F>(mut self, condition: C, message: impl Into<String>, fields: F) -> Self
    where
        C: Fn(&I::Item) -> bool + Send + Sync + 'static,
        F: IntoIterator<Item = Field<I::Item>>,
    {
        self.rules.push(LogRule::new(condition, message, fields));
        self
    }

    /// Append an already constructed rule
    pub fn with_rule(mut self, rule: LogRule<I::Item>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[LogRule<I::Item>] {
        &self.rules
    }

    /// Finish the builder. Fails immediately, without touching the source,
    /// when no sink is given.
    pub fn build<S: LogSink>(self, sink: Option<S>) -> Result<FilterWithLogs<I, P, S>, BuildError> {
        let sink = sink.ok_or(BuildError::MissingSink)?;

        tracing::debug!(rules = self.rules.len(), "filter with logs built");

        Ok(FilterWithLogs::new(
            self.source,
            LogFilter::new(self.predicate, self.rules, sink),
        ))
    }
}

impl<I, P> Clone for FilterLogsBuilder<I, P>
where
    I: Iterator + Clone,
    P: Clone,
{
    fn clone(&self) -> Self {
        FilterLogsBuilder {
            source: self.source.clone(),
            predicate: self.predicate.clone(),
            rules: self.rules.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::field;
    use crate::sink::CaptureSink;

    #[test]
    fn test_rules_keep_insertion_order() {
        let builder = filter_with_logs(vec![1, 2, 3], |n: &i32| *n > 1)
            .log_when(|_: &i32| true, "first", [])
            .log_when(|_: &i32| true, "second {}", [field(|n: &i32| *n)])
            .with_rule(LogRule::new(|_: &i32| true, "third", []));

        let messages: Vec<&str> = builder.rules().iter().map(|r| r.message()).collect();
        assert_eq!(messages, vec!["first", "second {}", "third"]);
    }

    #[test]
    fn test_missing_sink_is_rejected() {
        let result = filter_with_logs(vec![1, 2, 3], |_: &i32| true).build(None::<CaptureSink>);
        assert_eq!(result.err(), Some(BuildError::MissingSink));
    }
}
