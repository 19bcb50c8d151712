//! `cs-resource`: support-tier capacity and the waits built on top of it.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                       |
//! |------------|----------------------------------------------------------------|
//! | [`pool`]   | `ResourcePool`, `Request`, `RequestState`, `Grant`             |
//! | [`race`]   | `start_race`, `start_wait`, `PendingRace`, `PendingGrant`, outcomes |
//! | [`error`]  | `ResourceError`, `ResourceResult<T>`                           |
//!
//! # Request life cycle
//!
//! ```text
//! acquire ──► Granted ──release──► (gone; head of queue granted)
//!    │
//!    └──► Queued ──head dequeued on release──► Granted
//!            │
//!            └──cancel──► Cancelled (gone)
//! ```
//!
//! A request reaches at most one of `Granted` and `Cancelled`.  Pools never
//! touch the scheduler themselves; the race combinator is the only place
//! where a queued request and a timer are tied together.

pub mod error;
pub mod pool;
pub mod race;

#[cfg(test)]
mod tests;

pub use error::{ResourceError, ResourceResult};
pub use pool::{Grant, Request, RequestState, ResourcePool};
pub use race::{
    PendingGrant, PendingRace, RaceStart, Reneged, Served, WaitStart, start_race, start_wait,
};
