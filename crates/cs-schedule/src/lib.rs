//! `cs-schedule`: the event scheduler that drives every simulation run.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`scheduler`] | `Scheduler<E>` (`BTreeMap<(SimTime, seq), E>`), `EventHandle` |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Ordering model (summary)
//!
//! Every scheduled event gets the next value of a run-wide sequence counter.
//! Events fire in ascending `(fire_time, seq)` order:
//!
//! ```text
//! schedule(2.0, A)   → key (now+2.0, 0)
//! schedule(2.0, B)   → key (now+2.0, 1)    A fires before B
//! schedule(0.0, C)   → key (now,     2)    C fires before both
//! ```
//!
//! The sequence number is the only tie-break for events at the same instant,
//! which makes same-instant causality deterministic.

pub mod error;
pub mod scheduler;


pub use error::{ScheduleError, ScheduleResult};
pub use scheduler::{EventHandle, Scheduler};
