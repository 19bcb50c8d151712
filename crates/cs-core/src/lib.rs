//! `cs-core`: foundational types for the support-desk queueing simulator.
//!
//! This crate is a dependency of every other `cs-*` crate.  It intentionally
//! has no `cs-*` dependencies and minimal external ones (`rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `CustomerId`, `RequestId`                             |
//! | [`time`]        | `SimTime`, `SimClock`                                 |
//! | [`rng`]         | `SimRng` (one stream per run)                         |
//! | [`kind`]        | `RequestKind`, `Tier`                                 |
//! | [`config`]      | `SupportConfig` and its sub-structs, validation       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load a `SupportConfig` from JSON.              |

pub mod config;
pub mod error;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    DEFAULT_SEED, BalkRange, DeflectionRates, PatienceRange, QueueDiscipline, ServiceTimes,
    SupportConfig,
};
pub use error::{CoreError, CoreResult};
pub use ids::{CustomerId, RequestId};
pub use kind::{RequestKind, Tier};
pub use rng::SimRng;
pub use time::{SimClock, SimTime};
