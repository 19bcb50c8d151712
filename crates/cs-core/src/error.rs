//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so configuration problems surface unchanged at the
//! simulation boundary.

use thiserror::Error;

/// The top-level error type for `cs-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// A run configuration failed validation.  Raised before the run starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A distribution could not be built from otherwise valid parameters.
    #[error("invalid distribution parameter for {what}: {value}")]
    Distribution { what: &'static str, value: f64 },
}

/// Shorthand result type for `cs-core`.
pub type CoreResult<T> = Result<T, CoreError>;
