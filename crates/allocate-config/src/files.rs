//! JSON input files.

use allocate_core::{FlexPlan, ScheduleResponse, UnscheduledStatus};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

use crate::{ConfigError, ConfigResult};

fn read_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_json(&path.display().to_string(), &text)
}

fn parse_json<T: DeserializeOwned>(origin: &str, text: &str) -> ConfigResult<T> {
    serde_json::from_str(text).map_err(|source| ConfigError::Json {
        path: origin.to_string(),
        source,
    })
}

/// Read a file, or standard input when no path is given.
fn read_json_or_stdin<T: DeserializeOwned>(path: Option<&Path>) -> ConfigResult<T> {
    match path {
        Some(p) => read_json(p),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            parse_json("<stdin>", &text)
        }
    }
}

/// Load a flexibility plan. The content is not interpreted.
pub fn load_flex_plan(path: &Path) -> ConfigResult<FlexPlan> {
    read_json(path)
}

/// Load bookings and previously scheduled parts.
pub fn load_bookings(path: Option<&Path>) -> ConfigResult<UnscheduledStatus> {
    read_json_or_stdin(path)
}

/// Load a list of station downtimes.
pub fn load_downtimes(path: &Path) -> ConfigResult<Vec<serde_json::Value>> {
    read_json(path)
}

/// Load a saved engine response.
pub fn load_response(path: Option<&Path>) -> ConfigResult<ScheduleResponse> {
    read_json_or_stdin(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_flex_plan_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flex.json");
        fs::write(&path, r#"{"Parts": [{"Name": "aaa"}], "CellEfficiency": 0.9}"#).unwrap();

        let flex = load_flex_plan(&path).unwrap();
        assert_eq!(flex["Parts"][0]["Name"], "aaa");
        assert_eq!(flex["CellEfficiency"], 0.9);
    }

    #[test]
    fn test_bookings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.json");
        fs::write(
            &path,
            r#"{"UnscheduledBookings": [{"BookingId": "aaa-0", "DueDate": "2018-01-15",
                "Priority": 100, "Parts": [{"BookingId": "aaa-0", "Part": "aaa", "Quantity": 13}]}],
                "ScheduledParts": []}"#,
        )
        .unwrap();

        let status = load_bookings(Some(&path)).unwrap();
        assert_eq!(status.unscheduled_bookings[0].booking_id, "aaa-0");
    }

    #[test]
    fn test_invalid_json_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("downtimes.json");
        fs::write(&path, "{not json").unwrap();

        match load_downtimes(&path).unwrap_err() {
            ConfigError::Json { path: p, .. } => assert!(p.ends_with("downtimes.json")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_response(Some(Path::new("/nonexistent/response.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
