//! Upload document for the job-tracking system.

use serde::{Deserialize, Serialize};

use crate::model::ProgramEntry;
use crate::{Error, Result, ScheduleResponse};

/// New jobs document accepted by `POST /api/v1/jobs/add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewJobs {
    pub schedule_id: String,
    pub jobs: Vec<serde_json::Value>,
    pub station_use: Vec<serde_json::Value>,
    pub extra_parts: Vec<serde_json::Value>,
    pub current_unfilled_workorders: Vec<serde_json::Value>,
    pub queue_sizes: serde_json::Value,
    pub programs: Vec<ProgramEntry>,
    pub archive_completed_jobs: bool,
}

impl NewJobs {
    /// Reshape an engine response for upload.
    ///
    /// Jobs, station use, extra parts and queue sizes are carried over
    /// unchanged; only the surrounding field names differ.
    pub fn from_response(response: &ScheduleResponse, programs: Vec<ProgramEntry>) -> Result<Self> {
        let schedule_id = response
            .schedule_id()
            .ok_or(Error::EmptySchedule)?
            .to_string();

        Ok(Self {
            schedule_id,
            jobs: response.jobs.clone(),
            station_use: response.sim_stations.clone(),
            extra_parts: response.new_extra_parts.clone(),
            current_unfilled_workorders: Vec::new(),
            queue_sizes: response
                .queue_sizes
                .clone()
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            programs,
            archive_completed_jobs: true,
        })
    }
}
