//! HTTP client for the job-tracking API.

use allocate_core::NewJobs;
use tracing::{debug, info};
use url::Url;

use crate::UploadError;

const ADD_JOBS_PATH: &str = "/api/v1/jobs/add";

/// Client for a job-tracking server such as `http://localhost:5000`.
pub struct JobsClient {
    client: reqwest::Client,
    base: String,
}

impl JobsClient {
    /// Create a client for `target`. A target without a scheme is taken as
    /// plain HTTP, so `localhost:5000` works.
    pub fn new(target: &str) -> Result<Self, UploadError> {
        let target = target.trim().trim_end_matches('/');
        if target.is_empty() {
            return Err(UploadError::InvalidTarget("empty target".to_string()));
        }
        let base = if target.contains("://") {
            target.to_string()
        } else {
            format!("http://{}", target)
        };
        Url::parse(&base).map_err(|e| UploadError::InvalidTarget(format!("{}: {}", base, e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    /// URL new jobs are posted to.
    pub fn add_jobs_url(&self, expected_previous: Option<&str>) -> Result<Url, UploadError> {
        let mut url = Url::parse(&format!("{}{}", self.base, ADD_JOBS_PATH))
            .map_err(|e| UploadError::InvalidTarget(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("expectedPreviousScheduleId", expected_previous.unwrap_or(""));
        Ok(url)
    }

    /// Post new jobs and return the server's response body.
    pub async fn add_jobs(
        &self,
        jobs: &NewJobs,
        expected_previous: Option<&str>,
    ) -> Result<String, UploadError> {
        let url = self.add_jobs_url(expected_previous)?;
        info!(
            url = %url,
            schedule_id = %jobs.schedule_id,
            jobs = jobs.jobs.len(),
            programs = jobs.programs.len(),
            "Uploading new jobs"
        );

        let response = self
            .client
            .post(url)
            .json(jobs)
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(UploadError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = %status, "New jobs accepted");
        Ok(body)
    }
}
