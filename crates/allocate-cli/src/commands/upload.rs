//! Reshape an engine response and upload it.

use allocate_config::Settings;
use allocate_config::files::load_response;
use allocate_core::{NewJobs, Program};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::{jobs_client, programs};

pub async fn upload(
    settings: &Settings,
    response: Option<&Path>,
    download: Option<String>,
    program_dir: Option<&Path>,
    expected_previous: Option<&str>,
) -> Result<()> {
    let client = jobs_client(settings, download)?;
    let response = load_response(response)?;
    let programs = programs(program_dir)?;
    let new_jobs = NewJobs::from_response(&response, programs.iter().map(Program::entry).collect())?;

    info!(
        schedule_id = %new_jobs.schedule_id,
        jobs = new_jobs.jobs.len(),
        programs = new_jobs.programs.len(),
        "Uploading jobs"
    );
    let body = client
        .add_jobs(&new_jobs, expected_previous)
        .await
        .context("Failed to upload jobs")?;
    println!("{}", body);
    Ok(())
}
