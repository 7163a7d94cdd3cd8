//! CLI command implementations.

pub mod create;
pub mod report;
pub mod run;
pub mod upload;

use allocate_config::{Settings, load_programs, parse_timestamp};
use allocate_core::{FillMethod, Program, TimeWindow};
use allocate_upload::JobsClient;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Resolve the schedule window from optional start/end flags.
///
/// A missing start falls back to `fallback.start`; a missing end keeps the
/// fallback window's length.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    fallback: TimeWindow,
) -> Result<TimeWindow> {
    let start = start
        .map(parse_timestamp)
        .transpose()
        .context("Invalid window start")?
        .unwrap_or(fallback.start);
    let end = end
        .map(parse_timestamp)
        .transpose()
        .context("Invalid window end")?
        .unwrap_or(start + fallback.length());
    Ok(TimeWindow::new(start, end)?)
}

pub fn parse_fill(fill: Option<&str>) -> Result<FillMethod> {
    Ok(fill.map(str::parse::<FillMethod>).transpose()?.unwrap_or_default())
}

pub fn programs(dir: Option<&Path>) -> Result<Vec<Program>> {
    match dir {
        Some(dir) => load_programs(dir)
            .with_context(|| format!("Failed to load programs from {}", dir.display())),
        None => Ok(Vec::new()),
    }
}

/// Job-tracking client from the `--download` flag or the settings.
pub fn jobs_client(settings: &Settings, download: Option<String>) -> Result<JobsClient> {
    let target = download
        .or_else(|| settings.upload.target.clone())
        .context("No job-tracking server given; pass --download or set upload target")?;
    Ok(JobsClient::new(&target)?)
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    #[test]
    fn test_window_defaults() {
        let fallback = TimeWindow::default();
        assert_eq!(resolve_window(None, None, fallback).unwrap(), fallback);

        let window = resolve_window(Some("20180115 060000"), None, fallback).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2018, 1, 15, 6, 0, 0).unwrap());
        assert_eq!(window.length(), TimeDelta::days(1));
    }

    #[test]
    fn test_window_errors() {
        let fallback = TimeWindow::default();
        assert!(resolve_window(Some("tomorrow"), None, fallback).is_err());
        assert!(
            resolve_window(Some("20180115 060000"), Some("20180115 050000"), fallback).is_err()
        );
    }

    #[test]
    fn test_parse_fill() {
        assert_eq!(parse_fill(None).unwrap(), FillMethod::FillInAnyOrder);
        assert_eq!(parse_fill(Some("due-date")).unwrap(), FillMethod::FillOnlyByDueDate);
        assert!(parse_fill(Some("random")).is_err());
    }

    #[test]
    fn test_jobs_client_needs_target() {
        let settings = Settings::default();
        assert!(jobs_client(&settings, None).is_err());
        assert!(jobs_client(&settings, Some("localhost:5000".to_string())).is_ok());
    }
}
