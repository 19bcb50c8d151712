//! Integration tests for cs-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{JourneyEventRow, RunSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn event(customer: u32, timestamp: f64, label: &str) -> JourneyEventRow {
        JourneyEventRow { timestamp, customer, event: label.to_owned() }
    }

    fn summary(seed: u64) -> RunSummaryRow {
        RunSummaryRow {
            seed,
            arrivals:        10,
            in_flight:       1,
            ai_resolved:     5,
            l1_resolved:     2,
            l2_resolved:     1,
            balked:          1,
            reneged_l1:      0,
            reneged_l2:      0,
            mean_wait_l1:    Some(1.5),
            mean_wait_l2:    None,
            mean_service_l1: Some(7.0),
            mean_service_l2: Some(13.0),
            peak_queue_l1:   3,
            peak_queue_l2:   0,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("journey_events.csv").exists());
        assert!(dir.path().join("run_summary.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("journey_events.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["timestamp", "customer", "event"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("run_summary.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, RunSummaryRow::HEADER);
    }

    #[test]
    fn journey_events_keep_order() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_journey_events(&[event(0, 0.5, "Arrived"), event(0, 0.5, "Request type: simple")]).unwrap();
        w.write_journey_events(&[event(1, 2.25, "Arrived")]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("journey_events.csv")).unwrap();
        let rows: Vec<Vec<String>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_owned).collect())
            .collect();
        assert_eq!(rows, vec![
            vec!["0.5", "Customer 0", "Arrived"],
            vec!["0.5", "Customer 0", "Request type: simple"],
            vec!["2.25", "Customer 1", "Arrived"],
        ]);
    }

    #[test]
    fn missing_means_are_blank() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_run_summary(&summary(42)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("run_summary.csv")).unwrap();
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "42");
        assert_eq!(&row[9], "1.5");
        assert_eq!(&row[10], "", "L2 served nobody");
        assert_eq!(&row[13], "3");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod staffing_tests {
    use cs_sim::StaffingResult;

    use crate::write_staffing_csv;

    #[test]
    fn staffing_rows_are_rounded_and_totalled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staffing.csv");
        let results = [
            StaffingResult { l1_agents: 4, l2_agents: 3, avg_wait_l1: 1.234, avg_wait_l2: 4.999 },
            StaffingResult { l1_agents: 5, l2_agents: 3, avg_wait_l1: 0.5, avg_wait_l2: 2.0 },
        ];
        write_staffing_csv(&path, &results).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<Vec<String>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_owned).collect())
            .collect();
        assert_eq!(rows, vec![
            vec!["4", "3", "1.23", "5.00", "7"],
            vec!["5", "3", "0.50", "2.00", "8"],
        ]);
    }
}

#[cfg(test)]
mod observer_tests {
    use cs_core::{DeflectionRates, RequestKind, SupportConfig};
    use cs_sim::{Arrivals, ScriptedArrival, SimBuilder};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::row::{JourneyEventRow, RunSummaryRow};
    use crate::writer::OutputWriter;
    use crate::OutputResult;

    /// Keeps everything in memory.
    #[derive(Default)]
    struct MemWriter {
        events:   Vec<JourneyEventRow>,
        summary:  Vec<RunSummaryRow>,
        finishes: usize,
    }

    impl OutputWriter for MemWriter {
        fn write_journey_events(&mut self, rows: &[JourneyEventRow]) -> OutputResult<()> {
            self.events.extend_from_slice(rows);
            Ok(())
        }

        fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
            self.summary.push(row.clone());
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finishes += 1;
            Ok(())
        }
    }

    fn ai_only() -> SupportConfig {
        SupportConfig {
            horizon: 1_000.0,
            deflection_rates: DeflectionRates { simple: 1.0, complex: 1.0 },
            ..SupportConfig::default()
        }
    }

    #[test]
    fn observer_forwards_events_and_summary() {
        let mut sim = SimBuilder::new(ai_only())
            .seed(3)
            .arrivals(Arrivals::Scripted(vec![ScriptedArrival::with_kind(1.0, RequestKind::Simple)]))
            .build()
            .unwrap();
        let mut obs = SimOutputObserver::new(MemWriter::default(), sim.seed());
        let stats = sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let w = obs.into_writer();
        let labels: Vec<_> = w.events.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(labels, ["Arrived", "Request type: simple", "Resolved by AI"]);
        assert!(w.events.iter().all(|e| e.customer == 0));
        assert_eq!(w.events[0].timestamp, 1.0);
        assert_eq!(w.summary, vec![RunSummaryRow::from_stats(3, &stats)]);
        assert_eq!(w.finishes, 1);
    }

    #[test]
    fn large_runs_flush_in_batches() {
        let config = SupportConfig { arrival_rate: 20.0, horizon: 60.0, ..ai_only() };
        let mut sim = SimBuilder::new(config).build().unwrap();
        let mut obs = SimOutputObserver::new(MemWriter::default(), sim.seed());
        let stats = sim.run(&mut obs).unwrap();

        let w = obs.into_writer();
        // Arrived + Classified for every arrival, plus one resolution each.
        let expected = 2 * stats.arrivals + stats.outcomes.ai_resolved;
        assert_eq!(w.events.len() as u64, expected);
        assert!(w.events.windows(2).all(|p| p[0].timestamp <= p[1].timestamp));
    }

    #[test]
    fn csv_observer_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = SimBuilder::new(ai_only()).seed(8).build().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap(), sim.seed());
        let stats = sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("run_summary.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], stats.arrivals.to_string());

        let mut events = csv::Reader::from_path(dir.path().join("journey_events.csv")).unwrap();
        assert!(events.records().count() as u64 >= 2 * stats.arrivals);
    }
}

#[cfg(test)]
mod dot_tests {
    use cs_sim::{JourneyTopology, NodeRole};

    use crate::dot::{render_dot, role_colour, write_dot};

    #[test]
    fn renders_every_node_and_edge() {
        let t = JourneyTopology::support_desk();
        let dot = render_dot(&t);
        assert!(dot.starts_with("digraph journey {"));
        assert!(dot.trim_end().ends_with('}'));
        assert_eq!(dot.matches(" -> ").count(), t.edges.len());
        assert!(dot.contains("\"Check for Balking\" -> \"Customer Balks\" [label=\"Balks\", fontcolor=red];"));
        assert!(dot.contains("\"End\" [label=\"End\", fillcolor=lightblue, pos=\"0,0!\"];"));
    }

    #[test]
    fn one_line_per_node_and_edge() {
        let t = JourneyTopology::support_desk();
        let dot = render_dot(&t);
        assert!(dot.ends_with("}\n"));
        assert_eq!(dot.lines().count(), t.nodes.len() + t.edges.len() + 3);
    }

    #[test]
    fn long_names_wrap() {
        let dot = render_dot(&JourneyTopology::support_desk());
        assert!(dot.contains("label=\"Wait\\nfor\\nLevel\\n1\\nSupport\""));
        assert!(dot.contains("label=\"Resolved by AI\""));
    }

    #[test]
    fn colours_by_role() {
        assert_eq!(role_colour(NodeRole::Abandonment), "lightcoral");
        assert_eq!(role_colour(NodeRole::Decision), "lightyellow");
        assert_eq!(role_colour(NodeRole::Step), "white");
    }

    #[test]
    fn write_dot_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journey.dot");
        write_dot(&path, &JourneyTopology::support_desk()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, render_dot(&JourneyTopology::support_desk()));
    }
}
