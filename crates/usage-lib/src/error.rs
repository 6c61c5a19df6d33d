//! Error types for usage generation

use thiserror::Error;

/// Errors raised while configuring, simulating or rendering usage
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A session parameter is out of range
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// An executor was asked for usage at a time not after its last sample
    #[error(
        "executor {executor_id} sampled at {requested} but last sample was at {last}; timestamps must strictly increase"
    )]
    NonIncreasingTimestamp {
        executor_id: String,
        last: i64,
        requested: i64,
    },

    /// Elapsed time between two samples does not fit in an `i64`
    #[error("executor {executor_id} cannot measure elapsed time from {last} to {requested}")]
    ElapsedOverflow {
        executor_id: String,
        last: i64,
        requested: i64,
    },

    /// The simulated clock cannot advance past its current value
    #[error("simulated clock at {current} cannot advance by another tick")]
    ClockOverflow { current: i64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A report failed to parse or is structurally unusable
    #[error("invalid report: {0}")]
    InvalidReport(String),
}

impl GeneratorError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
