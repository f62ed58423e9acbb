//! Error types for week-scheduler operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Inconsistent selection: {0}")]
    InconsistentSelection(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
