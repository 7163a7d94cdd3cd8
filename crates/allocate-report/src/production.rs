//! Simulated production curves.
//!
//! Each path of a job's final process carries `SimulatedProduction` entries
//! of `{TimeUTC, Quantity}`, where the quantity is the running total of parts
//! completed on that path. Curves add the paths of all jobs for a part.

use allocate_core::response::parse_utc;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::summary::job_part;
use crate::{ReportError, ReportResult};

/// Cumulative completed quantity of one part over time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionCurve {
    pub part: String,
    pub points: Vec<(DateTime<Utc>, i64)>,
}

impl ProductionCurve {
    pub fn total(&self) -> i64 {
        self.points.last().map(|(_, q)| *q).unwrap_or(0)
    }
}

fn paths_of(process: &Value) -> Vec<&Value> {
    process
        .get("paths")
        .or_else(|| process.get("Paths"))
        .and_then(Value::as_array)
        .map(|a| a.iter().collect())
        .unwrap_or_default()
}

/// Completion increments of one job's final process.
fn job_increments(job: &Value) -> ReportResult<Vec<(DateTime<Utc>, i64)>> {
    let Some(last_proc) = job
        .get("ProcsAndPaths")
        .and_then(Value::as_array)
        .and_then(|procs| procs.last())
    else {
        return Ok(Vec::new());
    };

    let unique = job.get("Unique").and_then(Value::as_str).unwrap_or("?");
    let mut increments = Vec::new();
    for path in paths_of(last_proc) {
        let mut entries = Vec::new();
        for entry in path
            .get("SimulatedProduction")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            let time = entry
                .get("TimeUTC")
                .and_then(Value::as_str)
                .ok_or_else(|| ReportError::InvalidJob {
                    job: unique.to_string(),
                    message: "production entry without TimeUTC".to_string(),
                })?;
            let time = parse_utc(time).map_err(|e| ReportError::InvalidJob {
                job: unique.to_string(),
                message: e.to_string(),
            })?;
            let qty = entry.get("Quantity").and_then(Value::as_i64).unwrap_or(0);
            entries.push((time, qty));
        }
        entries.sort_by_key(|(t, _)| *t);

        let mut previous = 0;
        for (time, qty) in entries {
            increments.push((time, qty - previous));
            previous = qty;
        }
    }
    Ok(increments)
}

/// Production curves for every part with simulated production, by part name.
pub fn production_curves(jobs: &[Value]) -> ReportResult<Vec<ProductionCurve>> {
    let mut by_part: BTreeMap<&str, Vec<(DateTime<Utc>, i64)>> = BTreeMap::new();
    for job in jobs {
        let increments = job_increments(job)?;
        if !increments.is_empty() {
            by_part.entry(job_part(job)).or_default().extend(increments);
        }
    }

    Ok(by_part
        .into_iter()
        .map(|(part, mut increments)| {
            increments.sort_by_key(|(t, _)| *t);
            let mut points: Vec<(DateTime<Utc>, i64)> = Vec::new();
            let mut total = 0;
            for (time, delta) in increments {
                total += delta;
                match points.last_mut() {
                    Some(last) if last.0 == time => last.1 = total,
                    _ => points.push((time, total)),
                }
            }
            ProductionCurve {
                part: part.to_string(),
                points,
            }
        })
        .collect())
}
