//! The `OutputWriter` trait implemented by per-run writers.

use crate::{JourneyEventRow, OutputResult, RunSummaryRow};

/// Sink for the journey log and the end-of-run summary.
///
/// Errors are stored by the observer and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of journey events, in the order given.
    fn write_journey_events(&mut self, rows: &[JourneyEventRow]) -> OutputResult<()>;

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
