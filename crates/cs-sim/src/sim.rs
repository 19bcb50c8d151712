//! The `Sim` struct and its event loop.

use cs_core::{SimRng, SimTime, SupportConfig, Tier};
use cs_resource::ResourcePool;
use cs_schedule::Scheduler;
use tracing::{info, info_span};

use crate::journey::JourneyDists;
use crate::process::ProcessTable;
use crate::stats::StatsCollector;
use crate::{NoopObserver, RunStatistics, SimBuilder, SimError, SimEvent, SimObserver, SimResult};

// ── Tier pools ────────────────────────────────────────────────────────────────

/// The two support tiers of one run.
pub struct TierPools {
    pub l1: ResourcePool,
    pub l2: ResourcePool,
}

impl TierPools {
    pub fn new(config: &SupportConfig) -> Self {
        Self {
            l1: ResourcePool::new(Tier::L1, config.l1_capacity),
            l2: ResourcePool::new(Tier::L2, config.l2_capacity),
        }
    }

    pub fn get(&self, tier: Tier) -> &ResourcePool {
        match tier {
            Tier::L1 => &self.l1,
            Tier::L2 => &self.l2,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut ResourcePool {
        match tier {
            Tier::L1 => &mut self.l1,
            Tier::L2 => &mut self.l2,
        }
    }
}

// ── SupportDesk ───────────────────────────────────────────────────────────────

/// Everything one run mutates apart from the scheduler: the configuration,
/// the run's single RNG stream, both pools, the live processes and the
/// statistics collector.
///
/// Kept separate from the scheduler so an event callback can borrow both
/// at once.  The state machine lives in [`journey`][crate::journey].
pub struct SupportDesk {
    pub(crate) config:    SupportConfig,
    pub(crate) rng:       SimRng,
    pub(crate) dists:     JourneyDists,
    pub(crate) pools:     TierPools,
    pub(crate) processes: ProcessTable,
    pub(crate) stats:     StatsCollector,
}

impl SupportDesk {
    pub(crate) fn new(config: SupportConfig, rng: SimRng, dists: JourneyDists) -> Self {
        let pools = TierPools::new(&config);
        Self {
            config,
            rng,
            dists,
            pools,
            processes: ProcessTable::default(),
            stats:     StatsCollector::default(),
        }
    }

    pub fn config(&self) -> &SupportConfig {
        &self.config
    }

    pub fn pools(&self) -> &TierPools {
        &self.pools
    }

    /// Customers spawned and not yet terminal.
    pub fn live_customers(&self) -> usize {
        self.processes.len()
    }

    /// Abandon whatever is still in flight and snapshot the statistics.
    fn close(&mut self) -> RunStatistics {
        let collector = std::mem::take(&mut self.stats);
        collector.finish(
            self.processes.len() as u64,
            self.pools.l1.peak_queue_length(),
            self.pools.l2.peak_queue_length(),
        )
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// One simulation run.
///
/// Owns an isolated scheduler and [`SupportDesk`]; nothing is shared with
/// other runs, so independent `Sim`s may execute on different threads.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub(crate) scheduler: Scheduler<SimEvent>,
    pub(crate) desk:      SupportDesk,
    pub(crate) seed:      u64,
    pub(crate) finished:  bool,
}

impl Sim {
    /// Run until the horizon and return the statistics snapshot.
    ///
    /// Observer hooks fire for every journey event and after every popped
    /// event.  A `Sim` runs once; a second call fails with
    /// [`SimError::AlreadyRun`].
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunStatistics> {
        if self.finished {
            return Err(SimError::AlreadyRun);
        }
        self.finished = true;

        let horizon = SimTime(self.desk.config.horizon);
        let span = info_span!("run", seed = self.seed, horizon = horizon.0);
        let _enter = span.enter();
        info!(
            l1_capacity  = self.desk.config.l1_capacity,
            l2_capacity  = self.desk.config.l2_capacity,
            arrival_rate = self.desk.config.arrival_rate,
            discipline   = ?self.desk.config.discipline,
            "simulation started"
        );

        let desk = &mut self.desk;
        let fired = self.scheduler.run(horizon, |sched, _handle, event| {
            desk.dispatch(sched, event, &mut *observer)?;
            observer.on_step(sched.now(), &desk.pools);
            Ok::<(), SimError>(())
        })?;

        let stats = self.desk.close();
        info!(
            events      = fired,
            arrivals    = stats.arrivals,
            ai_resolved = stats.outcomes.ai_resolved,
            l1_resolved = stats.outcomes.l1_resolved,
            l2_resolved = stats.outcomes.l2_resolved,
            balked      = stats.outcomes.balked,
            reneged_l1  = stats.outcomes.reneged_l1,
            reneged_l2  = stats.outcomes.reneged_l2,
            in_flight   = stats.in_flight,
            "simulation finished"
        );
        observer.on_sim_end(&stats);
        Ok(stats)
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// The seed this run draws from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn desk(&self) -> &SupportDesk {
        &self.desk
    }

    /// Events still pending in the scheduler.
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }
}

/// Run `config` once with `seed` and no observer.
///
/// A pure function of its inputs: equal `(config, seed)` give equal
/// statistics.
pub fn simulate(config: &SupportConfig, seed: u64) -> SimResult<RunStatistics> {
    SimBuilder::new(config.clone()).seed(seed).build()?.run(&mut NoopObserver)
}
