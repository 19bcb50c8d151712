//! The race combinator: "granted service" vs. "ran out of patience".
//!
//! A customer joining a queue issues an `acquire()` and arms a patience timer
//! at the same instant.  Exactly one of the two wins:
//!
//! - **served**: the request is granted first.  The timer (or a pending
//!   renege commit) is cancelled and the wait is `grant_time - enqueue_time`.
//! - **reneged**: patience runs out while the request is still queued.  The
//!   request is cancelled in the pool.
//!
//! The loser's artifact is always cleaned up before the winner is reported.
//!
//! # Same-instant tie policy: the grant wins
//!
//! When the timer fires the race does not renege on the spot.  It moves to
//! an *expiring* phase and schedules a zero-delay commit event.  Sequence
//! numbers put that commit behind every event already queued for the
//! current instant, so a release happening at the very same instant still
//! grants the request and [`PendingRace::granted`] cancels the commit.
//!
//! The payload types for the timer and commit events belong to the caller;
//! this module only schedules and cancels them.

use cs_core::{CustomerId, RequestId, SimTime};
use cs_schedule::{EventHandle, Scheduler};

use crate::{Grant, RequestState, ResourcePool, ResourceResult};

/// Outcome of a race (or plain wait) that ended in service.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Served {
    pub request: RequestId,
    /// Minutes between joining the queue and being granted.
    pub wait:    f64,
}

/// Outcome of a race that ended in the customer leaving the queue.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Reneged {
    pub request: RequestId,
    /// Minutes the customer waited before giving up.
    pub waited:  f64,
}

/// What [`start_race`] found.
#[derive(Debug)]
pub enum RaceStart {
    /// A server was free: granted at once, no timer left behind.
    Served(Served),
    /// Queued; the caller keeps the race until one side resolves it.
    Pending(PendingRace),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    /// Patience timer armed.
    Waiting { timer: EventHandle },
    /// Timer fired; renege commit queued behind the current instant.
    Expiring { commit: EventHandle },
}

/// A queued request racing against a patience deadline.
#[derive(Debug)]
pub struct PendingRace {
    request:     RequestId,
    enqueued_at: SimTime,
    deadline:    SimTime,
    phase:       Phase,
}

/// Issue `acquire()` on `pool` and race it against `patience` minutes.
///
/// `on_timeout` is the payload delivered when the patience timer fires; the
/// caller must route it back to [`PendingRace::expire`].
pub fn start_race<E>(
    pool:       &mut ResourcePool,
    sched:      &mut Scheduler<E>,
    customer:   CustomerId,
    patience:   f64,
    on_timeout: E,
) -> ResourceResult<RaceStart> {
    // Arm the timer first: an invalid patience fails before any request exists.
    let timer = sched.schedule(patience, on_timeout)?;
    let request = pool.acquire(customer, sched.now());

    if request.state == RequestState::Granted {
        sched.cancel(timer);
        return Ok(RaceStart::Served(Served { request: request.id, wait: 0.0 }));
    }

    Ok(RaceStart::Pending(PendingRace {
        request:     request.id,
        enqueued_at: request.enqueued_at,
        deadline:    timer.time(),
        phase:       Phase::Waiting { timer },
    }))
}

impl PendingRace {
    pub fn request(&self) -> RequestId {
        self.request
    }

    pub fn enqueued_at(&self) -> SimTime {
        self.enqueued_at
    }

    /// The instant patience runs out.
    pub fn deadline(&self) -> SimTime {
        self.deadline
    }

    /// `true` once the timer has fired and only the commit is outstanding.
    pub fn is_expiring(&self) -> bool {
        matches!(self.phase, Phase::Expiring { .. })
    }

    /// The pool granted this race's request: cancel whatever is still
    /// scheduled and report the service outcome.
    pub fn granted<E>(self, sched: &mut Scheduler<E>, grant: &Grant) -> Served {
        match self.phase {
            Phase::Waiting { timer } => sched.cancel(timer),
            Phase::Expiring { commit } => sched.cancel(commit),
        };
        Served { request: self.request, wait: grant.wait() }
    }

    /// The patience timer fired.  Queue the renege commit (payload `commit`)
    /// behind everything already scheduled for this instant.
    ///
    /// Calling this again while already expiring is a no-op.
    pub fn expire<E>(&mut self, sched: &mut Scheduler<E>, commit: E) -> ResourceResult<()> {
        if let Phase::Waiting { .. } = self.phase {
            let handle = sched.schedule(0.0, commit)?;
            self.phase = Phase::Expiring { commit: handle };
        }
        Ok(())
    }

    /// Commit the renege: withdraw the still-queued request from `pool`.
    pub fn renege(self, pool: &mut ResourcePool, now: SimTime) -> ResourceResult<Reneged> {
        pool.cancel(self.request)?;
        Ok(Reneged { request: self.request, waited: now.since(self.enqueued_at) })
    }
}

/// A queued request with no deadline (the patient discipline).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PendingGrant {
    pub request:     RequestId,
    pub enqueued_at: SimTime,
}

impl PendingGrant {
    /// The pool granted the request.
    pub fn granted(self, grant: &Grant) -> Served {
        Served { request: self.request, wait: grant.wait() }
    }
}

/// What [`start_wait`] found.
#[derive(Debug)]
pub enum WaitStart {
    Served(Served),
    Pending(PendingGrant),
}

/// Issue `acquire()` on `pool` and wait for it without any deadline.
pub fn start_wait(pool: &mut ResourcePool, customer: CustomerId, now: SimTime) -> WaitStart {
    let request = pool.acquire(customer, now);
    match request.state {
        RequestState::Queued => WaitStart::Pending(PendingGrant {
            request:     request.id,
            enqueued_at: request.enqueued_at,
        }),
        _ => WaitStart::Served(Served { request: request.id, wait: 0.0 }),
    }
}
