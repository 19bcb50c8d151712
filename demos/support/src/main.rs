//! support: one logged run of the support desk, then a staffing sweep.
//!
//! Usage: `support [config.json]`.  Any field missing from the JSON keeps its
//! default.  Output lands in `output/support/`:
//!
//! - `journey_events.csv`, `run_summary.csv` for the single run
//! - `staffing.csv` for the sweep's feasible combinations
//! - `journey.dot`, the flow diagram (`neato -n -Tpng journey.dot`)
//!
//! Set `RUST_LOG=debug` to see every journey step on stderr.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cs_core::{SupportConfig, Tier};
use cs_output::{CsvWriter, SimOutputObserver, dot::write_dot, write_staffing_csv};
use cs_sim::{JourneyTopology, SimBuilder, StaffingSweep};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR: &str = "output/support";

/// The sweep's load: 20 customers per minute.
const SWEEP_ARRIVAL_RATE: f64 = 20.0;

fn load_config() -> Result<SupportConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            let config: SupportConfig =
                serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
            Ok(config)
        }
        None => Ok(SupportConfig::default()),
    }
}

fn fmt_mean(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_owned())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    config.validate()?;
    println!("=== support desk simulation ===");
    println!(
        "L1 agents: {}  |  L2 agents: {}  |  horizon: {} min  |  arrivals: {}/min",
        config.l1_capacity, config.l2_capacity, config.horizon, config.arrival_rate,
    );
    println!();

    // 1. One run, logged to CSV.
    let out = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(out)?;
    let mut sim = SimBuilder::new(config.clone()).build()?;
    let mut obs = SimOutputObserver::new(CsvWriter::new(out)?, sim.seed());

    let t0 = Instant::now();
    let stats = sim.run(&mut obs)?;
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }
    println!("Single run complete in {:.3} s", t0.elapsed().as_secs_f64());
    println!("{}", serde_json::to_string_pretty(&stats.outcomes)?);
    println!(
        "  mean wait  L1 {:>6}  L2 {:>6}",
        fmt_mean(stats.mean_wait(Tier::L1)),
        fmt_mean(stats.mean_wait(Tier::L2)),
    );
    println!("  in flight at horizon: {}", stats.in_flight);
    println!();

    write_dot(&out.join("journey.dot"), &JourneyTopology::support_desk())?;

    // 2. Staffing sweep at heavy load.
    let sweep = StaffingSweep {
        base: SupportConfig { arrival_rate: SWEEP_ARRIVAL_RATE, ..config },
        ..StaffingSweep::default()
    };
    info!(l1 = ?sweep.l1_agents, l2 = ?sweep.l2_agents, runs = sweep.runs, "sweeping staffing");
    let t1 = Instant::now();
    let feasible = sweep.feasible()?;
    println!("Sweep complete in {:.3} s", t1.elapsed().as_secs_f64());
    write_staffing_csv(&out.join("staffing.csv"), &feasible)?;

    if feasible.is_empty() {
        println!("No combination of agents in the range meets the wait targets.");
        return Ok(());
    }

    println!(
        "Staffing combinations meeting L1 wait <= {} min and L2 wait <= {} min:",
        sweep.max_wait_l1, sweep.max_wait_l2,
    );
    println!("{:>9} {:>9} {:>12} {:>12} {:>7}", "L1 Agents", "L2 Agents", "Avg Wait L1", "Avg Wait L2", "Total");
    println!("{}", "-".repeat(53));
    for r in &feasible {
        println!(
            "{:>9} {:>9} {:>12.2} {:>12.2} {:>7}",
            r.l1_agents,
            r.l2_agents,
            r.avg_wait_l1,
            r.avg_wait_l2,
            r.total_agents(),
        );
    }

    Ok(())
}
