// src/filter/iter.rs
use std::iter::FusedIterator;

use crate::filter::rule::LogRule;
use crate::sink::LogSink;

/// The per-element step of a built filter: inclusion predicate, log rules
/// and the sink they report to.
///
/// `LogFilter` is `Sync` whenever its predicate and sink are, so a single
/// instance can be shared by threads that each process their own elements.
pub struct LogFilter<T, P, S> {
    predicate: P,
    rules: Vec<LogRule<T>>,
    sink: S,
}

impl<T, P, S> LogFilter<T, P, S>
where
    P: Fn(&T) -> bool,
    S: LogSink,
{
    pub(crate) fn new(predicate: P, rules: Vec<LogRule<T>>, sink: S) -> Self {
        LogFilter {
            predicate,
            rules,
            sink,
        }
    }

    /// Evaluate one element: decide inclusion, then fire every matching rule
    /// in order, then report the decision.
    pub fn test(&self, item: &T) -> bool {
        let keep = (self.predicate)(item);

        for rule in &self.rules {
            if rule.matches(item) {
                self.sink.log(rule.message(), &rule.extract_values(item));
            }
        }

        keep
    }

    pub fn rules(&self) -> &[LogRule<T>] {
        &self.rules
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Iterator returned by [`FilterLogsBuilder::build`](crate::FilterLogsBuilder::build).
///
/// Yields the source elements accepted by the predicate. Log calls for an
/// element happen before that element is yielded.
pub struct FilterWithLogs<I: Iterator, P, S> {
    source: I,
    filter: LogFilter<I::Item, P, S>,
}

impl<I, P, S> FilterWithLogs<I, P, S>
where
    I: Iterator,
    P: Fn(&I::Item) -> bool,
    S: LogSink,
{
    pub(crate) fn new(source: I, filter: LogFilter<I::Item, P, S>) -> Self {
        FilterWithLogs { source, filter }
    }

    pub fn filter(&self) -> &LogFilter<I::Item, P, S> {
        &self.filter
    }

    /// Split into the untouched remaining source and the element step
    pub fn into_parts(self) -> (I, LogFilter<I::Item, P, S>) {
        (self.source, self.filter)
    }
}

impl<I, P, S> Iterator for FilterWithLogs<I, P, S>
where
    I: Iterator,
    P: Fn(&I::Item) -> bool,
    S: LogSink,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = &self.filter;
        self.source.find(|item| filter.test(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.source.size_hint();
        (0, upper)
    }
}

impl<I, P, S> DoubleEndedIterator for FilterWithLogs<I, P, S>
where
    I: DoubleEndedIterator,
    P: Fn(&I::Item) -> bool,
    S: LogSink,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let filter = &self.filter;
        self.source.rfind(|item| filter.test(item))
    }
}

impl<I, P, S> FusedIterator for FilterWithLogs<I, P, S>
where
    I: FusedIterator,
    P: Fn(&I::Item) -> bool,
    S: LogSink,
{
}

#[cfg(test)]
mod tests {
    use crate::filter::{field, filter_with_logs};
    use crate::sink::CaptureSink;

    #[test]
    fn test_size_hint_has_no_lower_bound() {
        let capture = CaptureSink::new();
        let iter = filter_with_logs(vec![1, 2, 3], |_: &i32| true)
            .build(Some(capture))
            .unwrap();
        assert_eq!(iter.size_hint(), (0, Some(3)));
    }

    #[test]
    fn test_reverse_iteration_logs_in_pull_order() {
        let capture = CaptureSink::new();
        let kept: Vec<i32> = filter_with_logs(vec![1, 2, 3, 4], |n: &i32| n % 2 == 0)
            .log_when(|_: &i32| true, "saw {}", [field(|n: &i32| *n)])
            .build(Some(capture.clone()))
            .unwrap()
            .rev()
            .collect();

        assert_eq!(kept, vec![4, 2]);
        assert_eq!(capture.messages(), vec!["saw 4", "saw 3", "saw 2", "saw 1"]);
    }

    #[test]
    fn test_into_parts_leaves_source_unconsumed() {
        let capture = CaptureSink::new();
        let (source, filter) = filter_with_logs(vec![5, 6], |n: &i32| *n > 5)
            .log_when(|n: &i32| *n == 5, "five", [])
            .build(Some(capture.clone()))
            .unwrap()
            .into_parts();

        assert!(capture.is_empty());
        let kept: Vec<i32> = source.filter(|n| filter.test(n)).collect();
        assert_eq!(kept, vec![6]);
        assert_eq!(capture.messages(), vec!["five"]);
        assert_eq!(filter.rules().len(), 1);
    }
}
