use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    /// A negative, NaN or infinite delay reached the scheduler.  Always a
    /// logic defect upstream.
    #[error("invalid event delay: {delay}")]
    InvalidDelay { delay: f64 },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
