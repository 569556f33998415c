//! The `TraceWriter` trait implemented by all backend writers.

use crate::{DecisionRow, EventRow, OutputResult};

/// Trait implemented by trace backends.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`TraceObserver::take_error`][crate::TraceObserver::take_error].
pub trait TraceWriter {
    /// Write all candidates of one decision cycle.
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()>;

    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
