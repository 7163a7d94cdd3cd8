//! Per-part job summary.

use serde_json::Value;
use std::collections::BTreeMap;

/// Jobs and planned cycles for one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSummary {
    pub part: String,
    pub jobs: usize,
    pub cycles: i64,
}

/// Extra parts the engine scheduled beyond the bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraPart {
    pub part: String,
    pub quantity: i64,
}

/// Planned cycles of a job: `Cycles`, or the sum of `CyclesOnFirstProcess`.
pub fn job_cycles(job: &Value) -> i64 {
    if let Some(c) = job.get("Cycles").and_then(Value::as_i64) {
        return c;
    }
    job.get("CyclesOnFirstProcess")
        .and_then(Value::as_array)
        .map(|paths| paths.iter().filter_map(Value::as_i64).sum())
        .unwrap_or(0)
}

/// Part name of a job, `?` when the engine left it out.
pub fn job_part(job: &Value) -> &str {
    job.get("PartName").and_then(Value::as_str).unwrap_or("?")
}

/// Group jobs by part, sorted by part name.
pub fn summarize_jobs(jobs: &[Value]) -> Vec<PartSummary> {
    let mut by_part: BTreeMap<&str, (usize, i64)> = BTreeMap::new();
    for job in jobs {
        let entry = by_part.entry(job_part(job)).or_default();
        entry.0 += 1;
        entry.1 += job_cycles(job);
    }
    by_part
        .into_iter()
        .map(|(part, (jobs, cycles))| PartSummary {
            part: part.to_string(),
            jobs,
            cycles,
        })
        .collect()
}

/// Total extra quantity per part.
pub fn summarize_extra_parts(parts: &[Value]) -> Vec<ExtraPart> {
    let mut by_part: BTreeMap<&str, i64> = BTreeMap::new();
    for p in parts {
        let name = p.get("Part").and_then(Value::as_str).unwrap_or("?");
        let qty = p.get("Quantity").and_then(Value::as_i64).unwrap_or(0);
        *by_part.entry(name).or_default() += qty;
    }
    by_part
        .into_iter()
        .map(|(part, quantity)| ExtraPart {
            part: part.to_string(),
            quantity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_jobs() {
        let jobs = vec![
            json!({"PartName": "bbb", "Cycles": 4}),
            json!({"PartName": "aaa", "CyclesOnFirstProcess": [3, 2]}),
            json!({"PartName": "aaa", "Cycles": 1}),
            json!({"Unique": "mystery"}),
        ];
        assert_eq!(
            summarize_jobs(&jobs),
            vec![
                PartSummary {
                    part: "?".to_string(),
                    jobs: 1,
                    cycles: 0
                },
                PartSummary {
                    part: "aaa".to_string(),
                    jobs: 2,
                    cycles: 6
                },
                PartSummary {
                    part: "bbb".to_string(),
                    jobs: 1,
                    cycles: 4
                },
            ]
        );
    }

    #[test]
    fn test_summarize_extra_parts() {
        let parts = vec![
            json!({"Part": "ccc", "Quantity": 2}),
            json!({"Part": "ccc", "Quantity": 3}),
            json!({"Part": "aaa", "Quantity": 1}),
        ];
        let extra = summarize_extra_parts(&parts);
        assert_eq!(extra.len(), 2);
        assert_eq!(extra[0].part, "aaa");
        assert_eq!(extra[1].quantity, 5);
    }
}
