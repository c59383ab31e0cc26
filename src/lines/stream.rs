// src/lines/stream.rs
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::io::{BufRead, ErrorKind, Write};
use std::time::{Duration, Instant};

use crate::error::{CompilationError, ProcessingError};
use crate::filter::{filter_with_logs, LogRule};
use crate::lines::config::{ErrorStrategy, LineConfig};
use crate::lines::rules::{compile_regex, RuleSpec, RulesFile};
use crate::lines::Line;
use crate::sink::{LogSink, LogValue};

/// Runtime statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessingStats {
    pub records_processed: usize,
    pub records_output: usize,
    pub records_skipped: usize,
    pub errors: usize,
    pub logs_emitted: usize,
    pub processing_time: Duration,
}

impl ProcessingStats {
    fn absorb(&mut self, other: &ProcessingStats) {
        self.records_processed += other.records_processed;
        self.records_output += other.records_output;
        self.records_skipped += other.records_skipped;
        self.errors += other.errors;
        self.logs_emitted += other.logs_emitted;
        self.processing_time += other.processing_time;
    }
}

/// Keeps the lines matching a regex and logs through a sink whenever one of
/// its rules matches a line.
pub struct LineFilterPipeline {
    config: LineConfig,
    keep: Option<Regex>,
    invert: bool,
    rules: Vec<LogRule<Line>>,
    stats: ProcessingStats,
}

impl LineFilterPipeline {
    pub fn new(config: LineConfig) -> Self {
        LineFilterPipeline {
            config,
            keep: None,
            invert: false,
            rules: Vec::new(),
            stats: ProcessingStats::default(),
        }
    }

    pub fn from_rules_file(config: LineConfig, file: &RulesFile) -> Result<Self, CompilationError> {
        let mut pipeline = Self::new(config);
        if let Some(pattern) = &file.keep {
            pipeline.set_keep(pattern)?;
        }
        pipeline.set_invert(file.invert);
        for spec in &file.rules {
            pipeline.add_rule(spec)?;
        }
        Ok(pipeline)
    }

    /// Only keep lines matching `pattern`. Without a pattern every line is kept.
    pub fn set_keep(&mut self, pattern: &str) -> Result<(), CompilationError> {
        self.keep = Some(compile_regex(pattern)?);
        Ok(())
    }

    /// Keep the lines that do *not* match the keep pattern
    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    pub fn add_rule(&mut self, spec: &RuleSpec) -> Result<(), CompilationError> {
        self.rules.push(spec.compile()?);
        Ok(())
    }

    pub fn add_log_rule(&mut self, rule: LogRule<Line>) {
        self.rules.push(rule);
    }

    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Process a single file/stream, writing kept lines to `output`
    pub fn process_stream<R: BufRead, W: Write, S: LogSink>(
        &mut self,
        input: R,
        output: &mut W,
        sink: S,
    ) -> Result<ProcessingStats, ProcessingError> {
        let start_time = Instant::now();
        let mut file_stats = ProcessingStats::default();

        let failure: RefCell<Option<ProcessingError>> = RefCell::new(None);
        let lines_read = Cell::new(0usize);
        let too_long = Cell::new(0usize);
        let logs_emitted = Cell::new(0usize);

        let max_line_length = self.config.max_line_length;
        let error_strategy = self.config.error_strategy;

        let source = input
            .lines()
            .enumerate()
            .map_while(|(index, line_result)| {
                let number = index + 1;
                let text = match line_result {
                    Ok(text) => text,
                    // Truncated input ends the stream quietly
                    Err(e) if e.kind() == ErrorKind::UnexpectedEof => return None,
                    Err(e) => {
                        *failure.borrow_mut() = Some(ProcessingError::IoError(e));
                        return None;
                    }
                };
                lines_read.set(number);

                if text.len() > max_line_length {
                    let error = ProcessingError::LineTooLong {
                        line: number,
                        length: text.len(),
                        max_length: max_line_length,
                    };
                    return match error_strategy {
                        ErrorStrategy::FailFast => {
                            *failure.borrow_mut() = Some(error);
                            None
                        }
                        ErrorStrategy::Skip => {
                            too_long.set(too_long.get() + 1);
                            tracing::warn!("{}, skipping", error);
                            Some(None)
                        }
                    };
                }

                Some(Some(Line::new(number, text)))
            })
            .flatten();

        let keep = self.keep.clone();
        let invert = self.invert;
        let predicate = move |line: &Line| match &keep {
            Some(regex) => regex.is_match(&line.text) != invert,
            None => true,
        };

        let mut builder = filter_with_logs(source, predicate);
        for rule in &self.rules {
            builder = builder.with_rule(rule.clone());
        }
        let kept = builder.build(Some(CountingSink {
            inner: sink,
            count: &logs_emitted,
        }))?;

        for line in kept {
            if let Err(e) = writeln!(output, "{}", line.text) {
                if e.kind() == ErrorKind::BrokenPipe {
                    break;
                }
                return Err(ProcessingError::IoError(e));
            }
            file_stats.records_output += 1;
        }

        if let Some(error) = failure.into_inner() {
            return Err(error);
        }

        file_stats.records_processed = lines_read.get();
        file_stats.errors = too_long.get();
        file_stats.records_skipped = file_stats
            .records_processed
            .saturating_sub(file_stats.records_output + file_stats.errors);
        file_stats.logs_emitted = logs_emitted.get();
        file_stats.processing_time = start_time.elapsed();

        if self.config.debug {
            tracing::info!(
                processed = file_stats.records_processed,
                output = file_stats.records_output,
                skipped = file_stats.records_skipped,
                errors = file_stats.errors,
                logs = file_stats.logs_emitted,
                elapsed = ?file_stats.processing_time,
                "stream finished"
            );
        }

        self.stats.absorb(&file_stats);
        Ok(file_stats)
    }

    /// Stats accumulated over every processed stream
    pub fn get_stats(&self) -> &ProcessingStats {
        &self.stats
    }
}

struct CountingSink<'a, S> {
    inner: S,
    count: &'a Cell<usize>,
}

impl<S: LogSink> LogSink for CountingSink<'_, S> {
    fn log(&self, template: &str, values: &[LogValue]) {
        self.count.set(self.count.get() + 1);
        self.inner.log(template, values);
    }
}
