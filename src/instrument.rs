//! Operation instrumentation
//!
//! Every public database operation runs inside `Instrumentation::run`, which
//! times it, hands an `OperationRecord` to a `RecordSink`, and turns a
//! `DbError` into the `ErrorReport` shown to the user. The sink only
//! observes: the operation's result passes through unchanged.

use crate::error::{ErrorKind, ErrorReport, Result};
use crate::gate::Outcome;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Success,
    Aborted,
    Failed(ErrorKind),
}

/// One instrumented call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub operation: &'static str,
    pub duration: Duration,
    pub outcome: OperationOutcome,
    /// `duration` reached the configured slow threshold
    pub slow: bool,
}

/// Destination for operation records
pub trait RecordSink {
    fn record(&self, record: &OperationRecord);
}

impl<T: RecordSink + ?Sized> RecordSink for Arc<T> {
    fn record(&self, record: &OperationRecord) {
        (**self).record(record)
    }
}

/// Emits each record as a `tracing` event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl RecordSink for TracingSink {
    fn record(&self, record: &OperationRecord) {
        let operation = record.operation;
        let duration_ms = record.duration.as_secs_f64() * 1000.0;

        match record.outcome {
            OperationOutcome::Failed(kind) => {
                warn!(operation, duration_ms, kind = %kind, slow = record.slow, "operation failed")
            }
            OperationOutcome::Aborted => info!(operation, duration_ms, "operation aborted"),
            OperationOutcome::Success if record.slow => {
                warn!(operation, duration_ms, "slow operation")
            }
            OperationOutcome::Success => debug!(operation, duration_ms, "operation completed"),
        }
    }
}

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<OperationRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<OperationRecord> {
        self.records.lock().clone()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl RecordSink for MemorySink {
    fn record(&self, record: &OperationRecord) {
        self.records.lock().push(record.clone());
    }
}

pub struct Instrumentation {
    slow_threshold: Duration,
    sink: Box<dyn RecordSink>,
}

impl Instrumentation {
    /// Instrumentation reporting through `tracing`
    pub fn new(slow_threshold: Duration) -> Self {
        Self::with_sink(slow_threshold, Box::new(TracingSink))
    }

    pub fn with_sink(slow_threshold: Duration, sink: Box<dyn RecordSink>) -> Self {
        Self {
            slow_threshold,
            sink,
        }
    }

    pub fn slow_threshold(&self) -> Duration {
        self.slow_threshold
    }

    /// Time `f`, record the outcome, and report failures uniformly
    pub fn run<T, F>(&self, operation: &'static str, f: F) -> std::result::Result<Outcome<T>, ErrorReport>
    where
        F: FnOnce() -> Result<Outcome<T>>,
    {
        let start = Instant::now();
        let result = f();

        let outcome = match &result {
            Ok(Outcome::Completed(_)) => OperationOutcome::Success,
            Ok(Outcome::Aborted) => OperationOutcome::Aborted,
            Err(e) => OperationOutcome::Failed(e.kind()),
        };
        self.record(operation, start.elapsed(), outcome);

        result.map_err(ErrorReport::from)
    }

    /// `run` for operations that cannot be declined
    pub fn measure<T, F>(&self, operation: &'static str, f: F) -> std::result::Result<T, ErrorReport>
    where
        F: FnOnce() -> Result<T>,
    {
        let start = Instant::now();
        let result = f();

        let outcome = match &result {
            Ok(_) => OperationOutcome::Success,
            Err(e) => OperationOutcome::Failed(e.kind()),
        };
        self.record(operation, start.elapsed(), outcome);

        result.map_err(ErrorReport::from)
    }

    fn record(&self, operation: &'static str, duration: Duration, outcome: OperationOutcome) {
        self.sink.record(&OperationRecord {
            operation,
            duration,
            outcome,
            slow: duration >= self.slow_threshold,
        });
    }
}
