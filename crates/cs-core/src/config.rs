//! Run configuration.
//!
//! A `SupportConfig` fully describes one simulation run apart from the
//! arrival script used by tests.  Defaults reproduce the reference staffing
//! scenario: five L1 agents, two L2 agents, an eight-hour shift, one customer
//! every two minutes.
//!
//! Typically loaded from JSON by the application crate (enable the `serde`
//! feature) and passed to `cs_sim::SimBuilder`, which calls
//! [`SupportConfig::validate`] before anything is scheduled.

use crate::{CoreError, CoreResult, RequestKind, Tier};

/// Seed used when `SupportConfig::seed` is `None`.
pub const DEFAULT_SEED: u64 = 42;

// ── Sub-structs ───────────────────────────────────────────────────────────────

/// Probability that automated triage resolves a request, per request kind.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeflectionRates {
    pub simple:  f64,
    pub complex: f64,
}

impl DeflectionRates {
    #[inline]
    pub fn for_kind(&self, kind: RequestKind) -> f64 {
        match kind {
            RequestKind::Simple  => self.simple,
            RequestKind::Complex => self.complex,
        }
    }
}

impl Default for DeflectionRates {
    fn default() -> Self {
        Self { simple: 0.7, complex: 0.4 }
    }
}

/// Mean hold times (minutes) of the exponential service distributions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceTimes {
    pub ai_mean: f64,
    pub l1_mean: f64,
    pub l2_mean: f64,
}

impl Default for ServiceTimes {
    fn default() -> Self {
        Self { ai_mean: 1.0, l1_mean: 7.0, l2_mean: 13.0 }
    }
}

/// Uniform patience window (minutes) a customer will wait in a queue.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatienceRange {
    pub min: f64,
    pub max: f64,
}

impl PatienceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Inclusive discrete-uniform range of balking thresholds.  A customer balks
/// when the L1 queue already holds at least the drawn threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalkRange {
    pub min: u32,
    pub max: u32,
}

impl Default for BalkRange {
    fn default() -> Self {
        Self { min: 1, max: 3 }
    }
}

/// How customers behave in front of a human queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QueueDiscipline {
    /// Customers may balk before joining L1 and renege from either queue.
    #[default]
    Impatient,
    /// Customers always join and wait until served (illustrative logging mode).
    Patient,
}

// ── SupportConfig ─────────────────────────────────────────────────────────────

/// Top-level configuration of one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SupportConfig {
    /// Number of L1 agents (capacity of the L1 pool).
    pub l1_capacity: usize,

    /// Number of L2 agents (capacity of the L2 pool).
    pub l2_capacity: usize,

    pub deflection_rates: DeflectionRates,

    /// Simulated minutes after which the run stops advancing.
    pub horizon: f64,

    /// Mean arrivals per simulated minute (Poisson process rate).
    pub arrival_rate: f64,

    /// Master RNG seed.  `None` uses [`DEFAULT_SEED`].
    pub seed: Option<u64>,

    pub service: ServiceTimes,

    /// Probability that a complex request is escalated after L1 service.
    pub escalation_probability: f64,

    pub l1_patience: PatienceRange,
    pub l2_patience: PatienceRange,
    pub balk_threshold: BalkRange,
    pub discipline: QueueDiscipline,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            l1_capacity:            5,
            l2_capacity:            2,
            deflection_rates:       DeflectionRates::default(),
            horizon:                480.0,
            arrival_rate:           0.5,
            seed:                   None,
            service:                ServiceTimes::default(),
            escalation_probability: 0.8,
            l1_patience:            PatienceRange::new(2.0, 5.0),
            l2_patience:            PatienceRange::new(3.0, 7.0),
            balk_threshold:         BalkRange::default(),
            discipline:             QueueDiscipline::Impatient,
        }
    }
}

impl SupportConfig {
    /// The seed this run will actually use.
    #[inline]
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    #[inline]
    pub fn capacity(&self, tier: Tier) -> usize {
        match tier {
            Tier::L1 => self.l1_capacity,
            Tier::L2 => self.l2_capacity,
        }
    }

    #[inline]
    pub fn patience(&self, tier: Tier) -> PatienceRange {
        match tier {
            Tier::L1 => self.l1_patience,
            Tier::L2 => self.l2_patience,
        }
    }

    /// Check every field.  Returns the first problem found.
    pub fn validate(&self) -> CoreResult<()> {
        if self.l1_capacity == 0 {
            return Err(invalid("l1_capacity must be positive"));
        }
        if self.l2_capacity == 0 {
            return Err(invalid("l2_capacity must be positive"));
        }

        probability("deflection_rates.simple", self.deflection_rates.simple)?;
        probability("deflection_rates.complex", self.deflection_rates.complex)?;
        probability("escalation_probability", self.escalation_probability)?;

        positive("horizon", self.horizon)?;
        positive("arrival_rate", self.arrival_rate)?;
        positive("service.ai_mean", self.service.ai_mean)?;
        positive("service.l1_mean", self.service.l1_mean)?;
        positive("service.l2_mean", self.service.l2_mean)?;

        patience_range("l1_patience", self.l1_patience)?;
        patience_range("l2_patience", self.l2_patience)?;

        if self.balk_threshold.min == 0 || self.balk_threshold.min > self.balk_threshold.max {
            return Err(CoreError::InvalidConfig(format!(
                "balk_threshold must satisfy 1 <= min <= max, got [{}, {}]",
                self.balk_threshold.min, self.balk_threshold.max,
            )));
        }
        Ok(())
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

fn invalid(msg: &str) -> CoreError {
    CoreError::InvalidConfig(msg.to_owned())
}

fn probability(name: &str, p: f64) -> CoreResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(CoreError::InvalidConfig(format!("{name} must lie in [0, 1], got {p}")))
    }
}

fn positive(name: &str, v: f64) -> CoreResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidConfig(format!("{name} must be a positive finite number, got {v}")))
    }
}

fn patience_range(name: &str, r: PatienceRange) -> CoreResult<()> {
    if r.min.is_finite() && r.max.is_finite() && 0.0 <= r.min && r.min <= r.max {
        Ok(())
    } else {
        Err(CoreError::InvalidConfig(format!(
            "{name} must satisfy 0 <= min <= max, got [{}, {}]",
            r.min, r.max,
        )))
    }
}
