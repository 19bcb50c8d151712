//! CSV output backend.
//!
//! [`CsvWriter`] creates two files in the configured output directory:
//! - `journey_events.csv`
//! - `run_summary.csv`
//!
//! [`write_staffing_csv`] writes a sweep's feasible combinations.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use cs_sim::StaffingResult;

use crate::row::StaffingRow;
use crate::writer::OutputWriter;
use crate::{JourneyEventRow, OutputResult, RunSummaryRow};

/// Writes one run's journey log and summary to two CSV files.
pub struct CsvWriter {
    events:   Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("journey_events.csv"))?;
        events.write_record(["timestamp", "customer", "event"])?;

        let mut summary = Writer::from_path(dir.join("run_summary.csv"))?;
        summary.write_record(RunSummaryRow::HEADER)?;

        Ok(Self {
            events,
            summary,
            finished: false,
        })
    }
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_journey_events(&mut self, rows: &[JourneyEventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.timestamp.to_string(),
                format!("Customer {}", row.customer),
                row.event.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.seed.to_string(),
            row.arrivals.to_string(),
            row.in_flight.to_string(),
            row.ai_resolved.to_string(),
            row.l1_resolved.to_string(),
            row.l2_resolved.to_string(),
            row.balked.to_string(),
            row.reneged_l1.to_string(),
            row.reneged_l2.to_string(),
            opt(row.mean_wait_l1),
            opt(row.mean_wait_l2),
            opt(row.mean_service_l1),
            opt(row.mean_service_l2),
            row.peak_queue_l1.to_string(),
            row.peak_queue_l2.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}

/// Write sweep results to `path`, waits rounded to two decimals.
pub fn write_staffing_csv(path: &Path, results: &[StaffingResult]) -> OutputResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["l1_agents", "l2_agents", "avg_wait_l1", "avg_wait_l2", "total_agents"])?;
    for row in results.iter().map(StaffingRow::from) {
        w.write_record(&[
            row.l1_agents.to_string(),
            row.l2_agents.to_string(),
            format!("{:.2}", row.avg_wait_l1),
            format!("{:.2}", row.avg_wait_l2),
            row.total_agents.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
