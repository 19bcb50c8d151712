//! Simulation time model.
//!
//! # Design
//!
//! Time is a continuous, non-negative number of simulated minutes wrapped in
//! `SimTime`.  Unlike a raw `f64` it is totally ordered (via
//! [`f64::total_cmp`]) so it can key a `BTreeMap` directly, which is what the
//! event scheduler does.
//!
//! `SimClock` holds the current instant and only ever moves forward; the
//! scheduler is its sole writer.

use std::cmp::Ordering;
use std::fmt;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulated instant, in minutes since the start of the run.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// The instant `delay` minutes after `self`.
    #[inline]
    pub fn offset(self, delay: f64) -> SimTime {
        SimTime(self.0 + delay)
    }

    /// Minutes elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }

    #[inline]
    pub fn minutes(self) -> f64 {
        self.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    fn from(minutes: f64) -> Self {
        SimTime(minutes)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.2}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulated clock of one run.
///
/// Monotonic: [`advance_to`](Self::advance_to) ignores instants in the past,
/// so the clock value is non-decreasing for the lifetime of the run.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated instant.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock forward to `t`.  Returns `false` (and leaves the clock
    /// untouched) when `t` lies in the past.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) -> bool {
        if t < self.now {
            return false;
        }
        self.now = t;
        true
    }
}
