use cs_core::{RequestId, Tier};
use cs_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResourceError {
    /// Granted service is never preempted, so a granted request cannot be
    /// cancelled.  Signals a protocol violation by the caller.
    #[error("{tier}: cannot cancel {request}, it has already been granted")]
    InvalidCancel { tier: Tier, request: RequestId },

    #[error("{tier}: cannot release {request}, it is not granted")]
    NotGranted { tier: Tier, request: RequestId },

    #[error("{tier}: {request} is not a live request of this pool")]
    UnknownRequest { tier: Tier, request: RequestId },

    #[error("scheduler error: {0}")]
    Schedule(#[from] ScheduleError),
}

pub type ResourceResult<T> = Result<T, ResourceError>;
