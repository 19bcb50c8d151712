//! Scheduler payloads and the journey records handed to observers.

use std::fmt;

use cs_core::{CustomerId, RequestKind, SimTime, Tier};

/// Payload of every event scheduled during a run.
///
/// Each variant names the process to resume and why; the scheduler itself
/// never looks inside.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// The Poisson generator wakes: spawn a customer, draw the next gap.
    Arrival,
    /// A scripted arrival, optionally with a forced request kind.
    Scripted { kind: Option<RequestKind> },
    /// First resumption of a freshly spawned customer.
    Start(CustomerId),
    /// A timed hold (AI handling or human service) elapsed.
    HoldElapsed(CustomerId),
    /// A queued request was granted on release; resume the customer.
    Granted(CustomerId),
    /// The customer's patience timer fired.
    PatienceExpired(CustomerId),
    /// End-of-instant renege decision queued by an expired race.
    RenegeCommit(CustomerId),
}

impl SimEvent {
    pub fn name(self) -> &'static str {
        match self {
            SimEvent::Arrival            => "arrival",
            SimEvent::Scripted { .. }    => "scripted-arrival",
            SimEvent::Start(_)           => "start",
            SimEvent::HoldElapsed(_)     => "hold-elapsed",
            SimEvent::Granted(_)         => "granted",
            SimEvent::PatienceExpired(_) => "patience-expired",
            SimEvent::RenegeCommit(_)    => "renege-commit",
        }
    }
}

/// Something that happened to one customer, for logging and visualization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JourneyEventKind {
    Arrived,
    Classified(RequestKind),
    ResolvedByAi,
    Balked,
    Queued(Tier),
    Started(Tier),
    Reneged(Tier),
    Escalated,
    Resolved(Tier),
}

fn level(tier: Tier) -> u8 {
    match tier {
        Tier::L1 => 1,
        Tier::L2 => 2,
    }
}

impl fmt::Display for JourneyEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            JourneyEventKind::Arrived          => f.write_str("Arrived"),
            JourneyEventKind::Classified(kind) => write!(f, "Request type: {kind}"),
            JourneyEventKind::ResolvedByAi     => f.write_str("Resolved by AI"),
            JourneyEventKind::Balked           => f.write_str("Balked"),
            JourneyEventKind::Queued(t)        => write!(f, "Queued for Level {} Support", level(t)),
            JourneyEventKind::Started(t)       => write!(f, "Level {} Support Started", level(t)),
            JourneyEventKind::Reneged(t)       => write!(f, "Reneged from Level {}", level(t)),
            JourneyEventKind::Escalated        => f.write_str("Escalated to Level 2"),
            JourneyEventKind::Resolved(t)      => write!(f, "Resolved by Level {}", level(t)),
        }
    }
}

/// One `(timestamp, customer, event)` entry of the journey log.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JourneyRecord {
    pub time:     SimTime,
    pub customer: CustomerId,
    pub kind:     JourneyEventKind,
}
