//! `cs-sim`: process engine and customer journey model for the support desk.
//!
//! # Event-driven journey
//!
//! ```text
//! Arrival ──► Start ──► classify ──► AI hold ──────────────────────► AiResolved
//!                           │
//!                           └──► balk check ──► Balked
//!                                    │
//!                                    └──► L1 race ──► RenegedL1
//!                                            │
//!                                            └──► L1 service ──► L1Resolved
//!                                                     │
//!                                                     └──► L2 race ──► RenegedL2
//!                                                             │
//!                                                             └──► L2 service ──► L2Resolved
//! ```
//!
//! Every customer is an explicit state machine ([`JourneyState`]).  It only
//! runs inside a scheduler callback and suspends at exactly three points:
//! a timed hold, a plain wait for a server, or a race between a server and
//! the customer's patience.  Only one customer executes at a time, so the
//! resource pools, the RNG and the statistics collector need no locking and
//! a run is reproducible from its `(config, seed)` alone.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs staffing-sweep combinations on Rayon's thread pool. |
//! | `serde`    | Derives `Serialize` on statistics and sweep results.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cs_core::SupportConfig;
//! use cs_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SupportConfig::default()).seed(7).build()?;
//! let stats = sim.run(&mut NoopObserver)?;
//! println!("mean L1 wait: {:?}", stats.mean_wait(cs_core::Tier::L1));
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod journey;
pub mod observer;
pub mod process;
pub mod sim;
pub mod stats;
pub mod sweep;
pub mod topology;


pub use builder::{Arrivals, ScriptedArrival, SimBuilder};
pub use error::{SimError, SimResult};
pub use event::{JourneyEventKind, JourneyRecord, SimEvent};
pub use observer::{NoopObserver, RecordingObserver, SimObserver};
pub use process::{Customer, JourneyState, Outcome};
pub use sim::{Sim, SupportDesk, TierPools, simulate};
pub use stats::{OutcomeCounts, RunStatistics};
pub use sweep::{StaffingResult, StaffingSweep};
pub use topology::{JourneyTopology, NodeRole, TopologyEdge, TopologyNode};
