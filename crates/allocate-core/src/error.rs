//! Error types for allocate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid ISO-8601 duration: {0}")]
    InvalidDuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("schedule has no jobs and no schedule id")]
    EmptySchedule,

    #[error("allocation failed: {0}")]
    AllocationFailed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
