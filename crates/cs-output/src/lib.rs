//! `cs-output`: simulation output writers for the support-desk simulator.
//!
//! | Item                   | Files created                                  |
//! |------------------------|------------------------------------------------|
//! | [`CsvWriter`]          | `journey_events.csv`, `run_summary.csv`        |
//! | [`write_staffing_csv`] | `staffing.csv` (or any path you pass)          |
//! | [`dot::write_dot`]     | Graphviz DOT of the journey flow               |
//!
//! Per-run writers implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `cs_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cs_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = SimOutputObserver::new(writer, sim.seed());
//! sim.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod dot;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use self::csv::{CsvWriter, write_staffing_csv};
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{JourneyEventRow, RunSummaryRow, StaffingRow};
pub use writer::OutputWriter;
