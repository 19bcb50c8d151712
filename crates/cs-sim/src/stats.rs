//! Statistics collector and the immutable per-run snapshot.

use cs_core::Tier;

use crate::Outcome;

/// Number of customers that ended in each terminal outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OutcomeCounts {
    pub ai_resolved: u64,
    pub l1_resolved: u64,
    pub l2_resolved: u64,
    pub balked:      u64,
    pub reneged_l1:  u64,
    pub reneged_l2:  u64,
}

impl OutcomeCounts {
    pub fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::AiResolved => self.ai_resolved,
            Outcome::L1Resolved => self.l1_resolved,
            Outcome::L2Resolved => self.l2_resolved,
            Outcome::Balked     => self.balked,
            Outcome::RenegedL1  => self.reneged_l1,
            Outcome::RenegedL2  => self.reneged_l2,
        }
    }

    fn slot(&mut self, outcome: Outcome) -> &mut u64 {
        match outcome {
            Outcome::AiResolved => &mut self.ai_resolved,
            Outcome::L1Resolved => &mut self.l1_resolved,
            Outcome::L2Resolved => &mut self.l2_resolved,
            Outcome::Balked     => &mut self.balked,
            Outcome::RenegedL1  => &mut self.reneged_l1,
            Outcome::RenegedL2  => &mut self.reneged_l2,
        }
    }

    /// Customers that reached any terminal outcome.
    pub fn total(&self) -> u64 {
        Outcome::ALL.iter().map(|&o| self.get(o)).sum()
    }
}

/// Snapshot of one run, available once [`Sim::run`][crate::Sim::run] returns.
///
/// Every spawned customer is counted exactly once: either in `outcomes` or
/// in `in_flight`.  Wait and service samples only cover customers that
/// reached a terminal outcome.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunStatistics {
    pub outcomes:      OutcomeCounts,
    pub arrivals:      u64,
    /// Customers still active when the horizon was reached.
    pub in_flight:     u64,
    pub wait_l1:       Vec<f64>,
    pub wait_l2:       Vec<f64>,
    pub service_l1:    Vec<f64>,
    pub service_l2:    Vec<f64>,
    pub peak_queue_l1: usize,
    pub peak_queue_l2: usize,
}

fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

impl RunStatistics {
    pub fn waits(&self, tier: Tier) -> &[f64] {
        match tier {
            Tier::L1 => &self.wait_l1,
            Tier::L2 => &self.wait_l2,
        }
    }

    pub fn services(&self, tier: Tier) -> &[f64] {
        match tier {
            Tier::L1 => &self.service_l1,
            Tier::L2 => &self.service_l2,
        }
    }

    /// Mean queueing time at `tier`; `None` when nobody was served there.
    pub fn mean_wait(&self, tier: Tier) -> Option<f64> {
        mean(self.waits(tier))
    }

    pub fn mean_service(&self, tier: Tier) -> Option<f64> {
        mean(self.services(tier))
    }

    /// Customers that completed service at `tier`.
    pub fn served(&self, tier: Tier) -> usize {
        self.services(tier).len()
    }

    pub fn peak_queue(&self, tier: Tier) -> usize {
        match tier {
            Tier::L1 => self.peak_queue_l1,
            Tier::L2 => self.peak_queue_l2,
        }
    }
}

// ── Staging ───────────────────────────────────────────────────────────────────

/// Samples a customer produced so far, held back until it finishes.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct StagedSamples {
    waits:    Vec<(Tier, f64)>,
    services: Vec<(Tier, f64)>,
}

impl StagedSamples {
    pub fn stage_wait(&mut self, tier: Tier, minutes: f64) {
        self.waits.push((tier, minutes));
    }

    pub fn stage_service(&mut self, tier: Tier, minutes: f64) {
        self.services.push((tier, minutes));
    }
}

// ── Collector ─────────────────────────────────────────────────────────────────

/// Single-writer accumulator owned by one run.
#[derive(Debug, Default)]
pub(crate) struct StatsCollector {
    stats: RunStatistics,
}

impl StatsCollector {
    pub fn record_arrival(&mut self) {
        self.stats.arrivals += 1;
    }

    /// Count `outcome` and commit the customer's staged samples.
    pub fn record_outcome(&mut self, outcome: Outcome, staged: StagedSamples) {
        *self.stats.outcomes.slot(outcome) += 1;
        for (tier, w) in staged.waits {
            match tier {
                Tier::L1 => self.stats.wait_l1.push(w),
                Tier::L2 => self.stats.wait_l2.push(w),
            }
        }
        for (tier, s) in staged.services {
            match tier {
                Tier::L1 => self.stats.service_l1.push(s),
                Tier::L2 => self.stats.service_l2.push(s),
            }
        }
    }

    pub fn finish(mut self, in_flight: u64, peak_l1: usize, peak_l2: usize) -> RunStatistics {
        self.stats.in_flight = in_flight;
        self.stats.peak_queue_l1 = peak_l1;
        self.stats.peak_queue_l2 = peak_l2;
        self.stats
    }
}
