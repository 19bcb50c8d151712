//! `Scheduler`: ordered queue of timed events plus the run's clock.
//!
//! # Why a `BTreeMap`
//!
//! Events are keyed by `(fire_time, seq)`.  A `BTreeMap` keeps them sorted,
//! gives O(log n) insert and pop-first and, unlike a binary heap, lets a
//! cancelled event be removed outright in O(log n).  A cancelled event
//! therefore never reaches the front of the queue and its payload is never
//! delivered.
//!
//! The payload type `E` is chosen by the caller (`cs-sim` uses a small enum
//! naming the process to resume), which keeps the scheduler free of any
//! knowledge about customers or resources.

use std::collections::BTreeMap;

use cs_core::{SimClock, SimTime};
use tracing::trace;

use crate::{ScheduleError, ScheduleResult};

/// Identifies one scheduled event.  Also its position in the queue: handles
/// order exactly like the events they name.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct EventHandle {
    time: SimTime,
    seq:  u64,
}

impl EventHandle {
    /// The instant the event fires (or would have fired).
    #[inline]
    pub fn time(self) -> SimTime {
        self.time
    }

    /// Position in scheduling order; unique within a run.
    #[inline]
    pub fn seq(self) -> u64 {
        self.seq
    }
}

/// A priority queue mapping `(fire_time, seq)` → event payload, and the
/// simulated clock it advances.
pub struct Scheduler<E> {
    queue:    BTreeMap<EventHandle, E>,
    clock:    SimClock,
    next_seq: u64,
    /// Events whose payload has been delivered.
    fired:    u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            queue:    BTreeMap::new(),
            clock:    SimClock::new(),
            next_seq: 0,
            fired:    0,
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated instant.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Enqueue `event` to fire `delay` minutes from now.
    ///
    /// The event receives the next sequence number, so among events with the
    /// same fire time it fires after every event scheduled before it.
    pub fn schedule(&mut self, delay: f64, event: E) -> ScheduleResult<EventHandle> {
        if !(delay.is_finite() && delay >= 0.0) {
            return Err(ScheduleError::InvalidDelay { delay });
        }
        let handle = EventHandle {
            time: self.clock.now().offset(delay),
            seq:  self.next_seq,
        };
        self.next_seq += 1;
        self.queue.insert(handle, event);
        Ok(handle)
    }

    /// Make the event named by `handle` inert.
    ///
    /// Returns the payload if the event was still pending, `None` if it has
    /// already fired or was cancelled before.
    pub fn cancel(&mut self, handle: EventHandle) -> Option<E> {
        let removed = self.queue.remove(&handle);
        if removed.is_some() {
            trace!(time = handle.time.0, seq = handle.seq, "event cancelled");
        }
        removed
    }

    /// `true` while the event has neither fired nor been cancelled.
    pub fn is_pending(&self, handle: EventHandle) -> bool {
        self.queue.contains_key(&handle)
    }

    /// Fire time of the earliest pending event, or `None` if empty.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.queue.keys().next().map(|h| h.time)
    }

    /// Remove the earliest pending event if it fires no later than `until`,
    /// and advance the clock to its fire time.
    pub fn pop_until(&mut self, until: SimTime) -> Option<(EventHandle, E)> {
        let next = *self.queue.keys().next()?;
        if next.time > until {
            return None;
        }
        let (handle, event) = self.queue.pop_first()?;
        self.clock.advance_to(handle.time);
        self.fired += 1;
        trace!(time = handle.time.0, seq = handle.seq, "event fired");
        Some((handle, event))
    }

    /// Fire events in `(fire_time, seq)` order until the queue is empty or
    /// the next event lies beyond `until`, then set the clock to `until`.
    ///
    /// `handler` receives the scheduler itself so it can schedule and cancel
    /// follow-up events.  The first handler error stops the run and is
    /// returned; the clock is left at the failing event's instant.
    ///
    /// Returns the number of events fired by this call.
    pub fn run<F, Er>(&mut self, until: SimTime, mut handler: F) -> Result<u64, Er>
    where
        F: FnMut(&mut Self, EventHandle, E) -> Result<(), Er>,
    {
        let start = self.fired;
        while let Some((handle, event)) = self.pop_until(until) {
            handler(self, handle, event)?;
        }
        self.clock.advance_to(until);
        Ok(self.fired - start)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total events fired over the scheduler's lifetime.
    pub fn fired_count(&self) -> u64 {
        self.fired
    }
}
