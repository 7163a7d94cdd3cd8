//! Report errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Core(#[from] allocate_core::Error),

    #[error("invalid job {job}: {message}")]
    InvalidJob { job: String, message: String },

    #[error("template error: {0}")]
    Render(#[from] askama::Error),
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;
