//! Staffing sweep: find the smallest `(L1, L2)` staffing that keeps average
//! waits under target.
//!
//! Every combination runs `runs` replications.  Replication `r` uses the
//! same seed for every combination (common random numbers), so differences
//! between combinations come from staffing, not from sampling noise.

use std::ops::RangeInclusive;

use cs_core::{CoreError, SimRng, SupportConfig, Tier};
use tracing::{debug, info};

use crate::{RunStatistics, SimResult, simulate};

/// Averages for one `(L1, L2)` combination.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StaffingResult {
    pub l1_agents:   usize,
    pub l2_agents:   usize,
    /// Mean over replications of each run's mean L1 wait.  Infinite when
    /// some replication served nobody at L1.
    pub avg_wait_l1: f64,
    pub avg_wait_l2: f64,
}

impl StaffingResult {
    pub fn total_agents(&self) -> usize {
        self.l1_agents + self.l2_agents
    }

    pub fn meets(&self, max_wait_l1: f64, max_wait_l2: f64) -> bool {
        self.avg_wait_l1 <= max_wait_l1 && self.avg_wait_l2 <= max_wait_l2
    }
}

/// A grid of staffing combinations evaluated against two wait thresholds.
#[derive(Clone, Debug)]
pub struct StaffingSweep {
    /// Everything but the capacities, which the sweep overrides.
    pub base:        SupportConfig,
    pub l1_agents:   RangeInclusive<usize>,
    pub l2_agents:   RangeInclusive<usize>,
    pub runs:        u64,
    pub max_wait_l1: f64,
    pub max_wait_l2: f64,
    pub seed:        u64,
}

impl Default for StaffingSweep {
    /// 2..=10 agents per tier, 10 runs each, waits of 2 and 5 minutes, at
    /// 20 arrivals per minute.
    fn default() -> Self {
        Self {
            base: SupportConfig { arrival_rate: 20.0, ..SupportConfig::default() },
            l1_agents:   2..=10,
            l2_agents:   2..=10,
            runs:        10,
            max_wait_l1: 2.0,
            max_wait_l2: 5.0,
            seed:        cs_core::DEFAULT_SEED,
        }
    }
}

fn mean_wait_or_inf(stats: &RunStatistics, tier: Tier) -> f64 {
    stats.mean_wait(tier).unwrap_or(f64::INFINITY)
}

impl StaffingSweep {
    /// A combination averages over its replications, so there must be one.
    fn check_runs(&self) -> SimResult<()> {
        if self.runs == 0 {
            return Err(CoreError::InvalidConfig("sweep runs must be at least 1".to_owned()).into());
        }
        Ok(())
    }

    /// Every `(l1, l2)` pair, L1-major.
    pub fn combinations(&self) -> Vec<(usize, usize)> {
        self.l1_agents
            .clone()
            .flat_map(|l1| self.l2_agents.clone().map(move |l2| (l1, l2)))
            .collect()
    }

    /// Run all replications of one combination.
    pub fn evaluate_combination(&self, l1_agents: usize, l2_agents: usize) -> SimResult<StaffingResult> {
        self.check_runs()?;
        let config = SupportConfig { l1_capacity: l1_agents, l2_capacity: l2_agents, ..self.base.clone() };
        let (mut sum_l1, mut sum_l2) = (0.0, 0.0);
        for r in 0..self.runs {
            let stats = simulate(&config, SimRng::derive_seed(self.seed, r))?;
            sum_l1 += mean_wait_or_inf(&stats, Tier::L1);
            sum_l2 += mean_wait_or_inf(&stats, Tier::L2);
        }
        let n = self.runs as f64;
        let result = StaffingResult {
            l1_agents,
            l2_agents,
            avg_wait_l1: sum_l1 / n,
            avg_wait_l2: sum_l2 / n,
        };
        debug!(l1 = l1_agents, l2 = l2_agents, wait_l1 = result.avg_wait_l1, wait_l2 = result.avg_wait_l2, "combination evaluated");
        Ok(result)
    }

    /// Evaluate every combination, in [`combinations`](Self::combinations)
    /// order.
    ///
    /// With the `parallel` Cargo feature combinations run on Rayon's thread
    /// pool; each run still owns its own RNG, so results are identical.
    pub fn evaluate_all(&self) -> SimResult<Vec<StaffingResult>> {
        self.check_runs()?;
        let combos = self.combinations();
        info!(combinations = combos.len(), runs = self.runs, "staffing sweep started");

        #[cfg(not(feature = "parallel"))]
        let results = combos
            .iter()
            .map(|&(l1, l2)| self.evaluate_combination(l1, l2))
            .collect::<SimResult<Vec<_>>>();

        #[cfg(feature = "parallel")]
        let results = {
            use rayon::prelude::*;

            combos
                .par_iter()
                .map(|&(l1, l2)| self.evaluate_combination(l1, l2))
                .collect::<SimResult<Vec<_>>>()
        };

        results
    }

    /// Combinations meeting both thresholds, cheapest first (total agents,
    /// then L1, then L2).
    pub fn feasible(&self) -> SimResult<Vec<StaffingResult>> {
        let mut ok: Vec<StaffingResult> = self
            .evaluate_all()?
            .into_iter()
            .filter(|r| r.meets(self.max_wait_l1, self.max_wait_l2))
            .collect();
        ok.sort_by_key(|r| (r.total_agents(), r.l1_agents, r.l2_agents));
        info!(feasible = ok.len(), "staffing sweep finished");
        Ok(ok)
    }
}
