//! `ResourcePool`: one support tier: `capacity` agents and a FIFO wait queue.
//!
//! All operations complete within the current simulated instant.  In
//! particular `release` hands the freed slot to the head of the queue
//! immediately, so there is never a service gap between one customer leaving
//! and the next one being granted.

use std::collections::VecDeque;

use cs_core::{CustomerId, RequestId, SimTime, Tier};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{ResourceError, ResourceResult};

/// Where a request currently stands.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RequestState {
    Queued,
    Granted,
    Cancelled,
}

/// One `acquire()` against a pool.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub id:          RequestId,
    pub customer:    CustomerId,
    pub state:       RequestState,
    pub enqueued_at: SimTime,
    /// Set when the request transitions to `Granted`.
    pub granted_at:  Option<SimTime>,
}

/// A queued request granted by [`ResourcePool::release`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Grant {
    pub request:     RequestId,
    pub customer:    CustomerId,
    pub enqueued_at: SimTime,
    pub granted_at:  SimTime,
}

impl Grant {
    /// Minutes the customer spent queued.
    #[inline]
    pub fn wait(&self) -> f64 {
        self.granted_at.since(self.enqueued_at)
    }
}

/// A bounded-capacity server abstraction with a FIFO wait queue.
///
/// # Invariants
///
/// - `0 <= granted_count() <= capacity()`
/// - `queue_length()` equals the number of live requests in state `Queued`
/// - requests leave the pool when released or cancelled
pub struct ResourcePool {
    tier:     Tier,
    capacity: usize,
    granted:  usize,
    queue:    VecDeque<RequestId>,
    /// Live (queued or granted) requests.
    requests: FxHashMap<RequestId, Request>,
    next_id:  RequestId,
    /// Largest queue length ever observed.
    peak_queue: usize,
}

impl ResourcePool {
    /// Create a pool with `capacity` servers.  Capacity is validated by the
    /// run configuration; a zero-capacity pool simply queues forever.
    pub fn new(tier: Tier, capacity: usize) -> Self {
        Self {
            tier,
            capacity,
            granted:    0,
            queue:      VecDeque::new(),
            requests:   FxHashMap::default(),
            next_id:    RequestId::FIRST,
            peak_queue: 0,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Servers currently busy.
    pub fn granted_count(&self) -> usize {
        self.granted
    }

    /// Requests currently waiting.  No side effects; used for balking.
    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    pub fn peak_queue_length(&self) -> usize {
        self.peak_queue
    }

    /// State of a live request, `None` once it was released or cancelled.
    pub fn state(&self, id: RequestId) -> Option<RequestState> {
        self.requests.get(&id).map(|r| r.state)
    }

    pub fn request(&self, id: RequestId) -> Option<&Request> {
        self.requests.get(&id)
    }

    /// Issue a new request on behalf of `customer`.
    ///
    /// Granted on the spot when a server is free, otherwise appended to the
    /// tail of the wait queue.  Either way the returned request is live.
    pub fn acquire(&mut self, customer: CustomerId, now: SimTime) -> Request {
        let id = self.next_id;
        self.next_id = id.next();

        let request = if self.granted < self.capacity {
            self.granted += 1;
            Request {
                id,
                customer,
                state:       RequestState::Granted,
                enqueued_at: now,
                granted_at:  Some(now),
            }
        } else {
            self.queue.push_back(id);
            self.peak_queue = self.peak_queue.max(self.queue.len());
            Request {
                id,
                customer,
                state:       RequestState::Queued,
                enqueued_at: now,
                granted_at:  None,
            }
        };
        trace!(tier = %self.tier, request = id.0, customer = customer.0, state = ?request.state, "acquire");
        self.requests.insert(id, request.clone());
        request
    }

    /// Give back a granted request.
    ///
    /// If anyone is waiting, the head of the queue is granted at `now` and
    /// returned so the caller can wake that customer.
    pub fn release(&mut self, id: RequestId, now: SimTime) -> ResourceResult<Option<Grant>> {
        match self.requests.get(&id).map(|r| r.state) {
            Some(RequestState::Granted) => {}
            Some(_) => return Err(ResourceError::NotGranted { tier: self.tier, request: id }),
            None => return Err(ResourceError::UnknownRequest { tier: self.tier, request: id }),
        }
        self.requests.remove(&id);
        self.granted -= 1;

        let Some(next) = self.queue.pop_front() else {
            return Ok(None);
        };
        let entry = self
            .requests
            .get_mut(&next)
            .ok_or(ResourceError::UnknownRequest { tier: self.tier, request: next })?;
        entry.state = RequestState::Granted;
        entry.granted_at = Some(now);
        self.granted += 1;

        trace!(tier = %self.tier, released = id.0, granted = next.0, "handoff");
        Ok(Some(Grant {
            request:     next,
            customer:    entry.customer,
            enqueued_at: entry.enqueued_at,
            granted_at:  now,
        }))
    }

    /// Withdraw a queued request.
    ///
    /// Rejected with [`ResourceError::InvalidCancel`] once the request has been
    /// granted: service in progress is never preempted.
    pub fn cancel(&mut self, id: RequestId) -> ResourceResult<Request> {
        match self.requests.get(&id).map(|r| r.state) {
            Some(RequestState::Queued) => {}
            Some(_) => return Err(ResourceError::InvalidCancel { tier: self.tier, request: id }),
            None => return Err(ResourceError::UnknownRequest { tier: self.tier, request: id }),
        }
        if let Some(pos) = self.queue.iter().position(|&q| q == id) {
            self.queue.remove(pos);
        }
        let mut request = self
            .requests
            .remove(&id)
            .ok_or(ResourceError::UnknownRequest { tier: self.tier, request: id })?;
        request.state = RequestState::Cancelled;
        trace!(tier = %self.tier, request = id.0, "cancel");
        Ok(request)
    }
}
