use cs_core::{CoreError, CustomerId};
use cs_resource::ResourceError;
use cs_schedule::ScheduleError;
use thiserror::Error;

use crate::JourneyState;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("scheduler error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("{0} is not a live customer")]
    UnknownCustomer(CustomerId),

    /// An event reached a customer whose state cannot accept it.
    #[error("{customer} received {event} while in state {state:?}")]
    UnexpectedWake {
        customer: CustomerId,
        state:    JourneyState,
        event:    &'static str,
    },

    #[error("this simulation has already been run")]
    AlreadyRun,
}

pub type SimResult<T> = Result<T, SimError>;
