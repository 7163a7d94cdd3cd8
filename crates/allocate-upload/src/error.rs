//! Upload errors.

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}
