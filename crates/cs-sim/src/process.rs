//! Per-customer process state and the per-run process table.

use std::collections::BTreeMap;

use cs_core::{CustomerId, RequestId, RequestKind, SimTime, Tier};
use cs_resource::{PendingGrant, PendingRace};

use crate::stats::StagedSamples;
use crate::{SimError, SimResult};

// ── Outcome ───────────────────────────────────────────────────────────────────

/// The terminal outcome of one customer journey.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Outcome {
    AiResolved,
    /// Resolved by L1 without escalation.
    L1Resolved,
    L2Resolved,
    Balked,
    RenegedL1,
    RenegedL2,
}

impl Outcome {
    pub const ALL: [Outcome; 6] = [
        Outcome::AiResolved,
        Outcome::L1Resolved,
        Outcome::L2Resolved,
        Outcome::Balked,
        Outcome::RenegedL1,
        Outcome::RenegedL2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::AiResolved => "ai_resolved",
            Outcome::L1Resolved => "l1_resolved",
            Outcome::L2Resolved => "l2_resolved",
            Outcome::Balked     => "balked",
            Outcome::RenegedL1  => "reneged_l1",
            Outcome::RenegedL2  => "reneged_l2",
        }
    }

    pub(crate) fn reneged(tier: Tier) -> Self {
        match tier {
            Tier::L1 => Outcome::RenegedL1,
            Tier::L2 => Outcome::RenegedL2,
        }
    }

    pub(crate) fn resolved(tier: Tier) -> Self {
        match tier {
            Tier::L1 => Outcome::L1Resolved,
            Tier::L2 => Outcome::L2Resolved,
        }
    }
}

// ── JourneyState ──────────────────────────────────────────────────────────────

/// Where a customer stands in its journey.
///
/// `Classifying` and `CheckingBalk` are pass-through states: a process never
/// suspends in them, they are only visible while its step is executing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JourneyState {
    Arrived,
    Classifying,
    AiResolving,
    CheckingBalk,
    Waiting(Tier),
    Serving(Tier),
}

/// What a waiting customer is suspended on.
#[derive(Debug)]
pub(crate) enum Suspension {
    Race(PendingRace),
    Grant(PendingGrant),
}

// ── Customer ──────────────────────────────────────────────────────────────────

/// One customer process.
#[derive(Debug)]
pub struct Customer {
    pub id:         CustomerId,
    /// Drawn on classification; `None` until then.
    pub kind:       Option<RequestKind>,
    pub state:      JourneyState,
    /// Kind imposed by a scripted arrival; skips the draw.
    pub(crate) forced_kind:     Option<RequestKind>,
    pub(crate) suspension:      Option<Suspension>,
    /// The granted request currently held, if in service.
    pub(crate) held:            Option<RequestId>,
    pub(crate) service_started: SimTime,
    pub(crate) staged:          StagedSamples,
}

impl Customer {
    fn new(id: CustomerId, now: SimTime, forced_kind: Option<RequestKind>) -> Self {
        Self {
            id,
            kind: None,
            state: JourneyState::Arrived,
            forced_kind,
            suspension: None,
            held: None,
            service_started: now,
            staged: StagedSamples::default(),
        }
    }
}

// ── ProcessTable ──────────────────────────────────────────────────────────────

/// Live customer processes of one run, keyed by ID.
///
/// A `BTreeMap` keeps iteration (and therefore the in-flight census at the
/// horizon) in spawn order.
#[derive(Debug, Default)]
pub(crate) struct ProcessTable {
    live:    BTreeMap<CustomerId, Customer>,
    next_id: u32,
}

impl ProcessTable {
    pub fn spawn(&mut self, now: SimTime, forced_kind: Option<RequestKind>) -> CustomerId {
        let id = CustomerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, Customer::new(id, now, forced_kind));
        id
    }

    pub fn get_mut(&mut self, id: CustomerId) -> SimResult<&mut Customer> {
        self.live.get_mut(&id).ok_or(SimError::UnknownCustomer(id))
    }

    pub fn remove(&mut self, id: CustomerId) -> SimResult<Customer> {
        self.live.remove(&id).ok_or(SimError::UnknownCustomer(id))
    }

    /// Processes spawned but not yet terminal.
    pub fn len(&self) -> usize {
        self.live.len()
    }
}
