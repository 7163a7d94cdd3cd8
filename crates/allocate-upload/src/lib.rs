//! Job-tracking system client for the allocate toolkit.
//!
//! Delivers reshaped schedules (`NewJobs`) to the job-tracking HTTP API.

pub mod client;
pub mod error;

pub use client::JobsClient;
pub use error::UploadError;
