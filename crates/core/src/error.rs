// crates/core/src/error.rs
use thiserror::Error;

/// Errors raised while validating a trailing aggregation window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window must be between {min} and {max} days, got {days}")]
    OutOfRange { days: i64, min: u32, max: u32 },
}
