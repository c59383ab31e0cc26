// src/filter.rs
//! Filtering with conditional log rules.
//!
//! ```
//! use logwhen::{field, filter_with_logs, CaptureSink};
//!
//! let sink = CaptureSink::new();
//! let evens: Vec<i32> = filter_with_logs(vec![1, 2, 3, 4], |n: &i32| n % 2 == 0)
//!     .log_when(|n: &i32| *n > 2, "big:{}", [field(|n: &i32| *n)])
//!     .build(Some(sink.clone()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(evens, vec![2, 4]);
//! assert_eq!(sink.messages(), vec!["big:3", "big:4"]);
//! ```

pub mod builder;
pub mod iter;
pub mod rule;

pub use builder::{filter_with_logs, FilterLogsBuilder};
pub use iter::{FilterWithLogs, LogFilter};
pub use rule::{field, Condition, Field, LogRule};

/// `iter.filter_with_logs(predicate)` for any iterator
pub trait FilterWithLogsExt: Iterator + Sized {
    fn filter_with_logs<P>(self, predicate: P) -> FilterLogsBuilder<Self, P>
    where
        P: Fn(&Self::Item) -> bool,
    {
        filter_with_logs(self, predicate)
    }
}

impl<I: Iterator> FilterWithLogsExt for I {}
