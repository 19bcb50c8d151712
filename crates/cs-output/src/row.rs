//! Plain data row types written by output backends.

use cs_core::Tier;
use cs_sim::{JourneyRecord, RunStatistics, StaffingResult};

/// One `(timestamp, customer, event)` line of the journey log.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyEventRow {
    pub timestamp: f64,
    pub customer:  u32,
    /// Human-readable label, e.g. `Queued for Level 1 Support`.
    pub event:     String,
}

impl From<&JourneyRecord> for JourneyEventRow {
    fn from(record: &JourneyRecord) -> Self {
        Self {
            timestamp: record.time.0,
            customer:  record.customer.0,
            event:     record.kind.to_string(),
        }
    }
}

/// Outcome counts and per-tier averages of one run.
///
/// Means are `None` when the tier served nobody.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummaryRow {
    pub seed:            u64,
    pub arrivals:        u64,
    pub in_flight:       u64,
    pub ai_resolved:     u64,
    pub l1_resolved:     u64,
    pub l2_resolved:     u64,
    pub balked:          u64,
    pub reneged_l1:      u64,
    pub reneged_l2:      u64,
    pub mean_wait_l1:    Option<f64>,
    pub mean_wait_l2:    Option<f64>,
    pub mean_service_l1: Option<f64>,
    pub mean_service_l2: Option<f64>,
    pub peak_queue_l1:   usize,
    pub peak_queue_l2:   usize,
}

impl RunSummaryRow {
    pub const HEADER: [&'static str; 15] = [
        "seed", "arrivals", "in_flight",
        "ai_resolved", "l1_resolved", "l2_resolved", "balked", "reneged_l1", "reneged_l2",
        "mean_wait_l1", "mean_wait_l2", "mean_service_l1", "mean_service_l2",
        "peak_queue_l1", "peak_queue_l2",
    ];

    pub fn from_stats(seed: u64, stats: &RunStatistics) -> Self {
        let o = &stats.outcomes;
        Self {
            seed,
            arrivals:        stats.arrivals,
            in_flight:       stats.in_flight,
            ai_resolved:     o.ai_resolved,
            l1_resolved:     o.l1_resolved,
            l2_resolved:     o.l2_resolved,
            balked:          o.balked,
            reneged_l1:      o.reneged_l1,
            reneged_l2:      o.reneged_l2,
            mean_wait_l1:    stats.mean_wait(Tier::L1),
            mean_wait_l2:    stats.mean_wait(Tier::L2),
            mean_service_l1: stats.mean_service(Tier::L1),
            mean_service_l2: stats.mean_service(Tier::L2),
            peak_queue_l1:   stats.peak_queue_l1,
            peak_queue_l2:   stats.peak_queue_l2,
        }
    }
}

/// One feasible staffing combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffingRow {
    pub l1_agents:    usize,
    pub l2_agents:    usize,
    pub avg_wait_l1:  f64,
    pub avg_wait_l2:  f64,
    pub total_agents: usize,
}

impl From<&StaffingResult> for StaffingRow {
    fn from(r: &StaffingResult) -> Self {
        Self {
            l1_agents:    r.l1_agents,
            l2_agents:    r.l2_agents,
            avg_wait_l1:  r.avg_wait_l1,
            avg_wait_l2:  r.avg_wait_l2,
            total_agents: r.total_agents(),
        }
    }
}
