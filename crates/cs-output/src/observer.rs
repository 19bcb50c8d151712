//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use cs_sim::{JourneyRecord, RunStatistics, SimObserver};

use crate::row::{JourneyEventRow, RunSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// Journey events are handed to the writer in batches of this size.
const BATCH: usize = 1024;

/// A [`SimObserver`] that writes the journey log and the run summary to any
/// [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    seed:       u64,
    pending:    Vec<JourneyEventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// `seed` is recorded in the summary row.
    pub fn new(writer: W, seed: u64) -> Self {
        Self {
            writer,
            seed,
            pending:    Vec::with_capacity(BATCH),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_journey_events(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_journey_event(&mut self, record: &JourneyRecord) {
        self.pending.push(JourneyEventRow::from(record));
        if self.pending.len() >= BATCH {
            self.flush_pending();
        }
    }

    fn on_sim_end(&mut self, stats: &RunStatistics) {
        self.flush_pending();
        let result = self.writer.write_run_summary(&RunSummaryRow::from_stats(self.seed, stats));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
