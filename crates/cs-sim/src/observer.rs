//! Simulation observer trait for logging and data collection.

use cs_core::SimTime;

use crate::{JourneyRecord, RunStatistics, TierPools};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: queue monitor
///
/// ```rust,ignore
/// struct PeakL1(usize);
///
/// impl SimObserver for PeakL1 {
///     fn on_step(&mut self, _now: SimTime, pools: &TierPools) {
///         self.0 = self.0.max(pools.l1.queue_length());
///     }
/// }
/// ```
pub trait SimObserver {
    /// A customer reached a new step of its journey.  Records arrive in
    /// simulated-time order.
    fn on_journey_event(&mut self, _record: &JourneyRecord) {}

    /// Called after every event the scheduler fires, with read-only access
    /// to both tiers.
    fn on_step(&mut self, _now: SimTime, _pools: &TierPools) {}

    /// Called once after the horizon is reached.
    fn on_sim_end(&mut self, _stats: &RunStatistics) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Keeps every journey record in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub records: Vec<JourneyRecord>,
    /// Set by `on_sim_end`.
    pub final_stats: Option<RunStatistics>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimObserver for RecordingObserver {
    fn on_journey_event(&mut self, record: &JourneyRecord) {
        self.records.push(*record);
    }

    fn on_sim_end(&mut self, stats: &RunStatistics) {
        self.final_stats = Some(stats.clone());
    }
}
