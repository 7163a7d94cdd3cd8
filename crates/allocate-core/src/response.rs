//! Response document written by the scheduling engine.
//!
//! Jobs, stations and extra parts are kept as raw JSON so that every field
//! the engine produced survives the trip to the job-tracking system. Typed
//! views exist only for the fields this toolkit reads.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::duration::serde_iso;
use crate::{Error, Result};

/// Result of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
    #[serde(default)]
    pub jobs: Vec<serde_json::Value>,
    #[serde(default)]
    pub sim_stations: Vec<serde_json::Value>,
    #[serde(default)]
    pub new_extra_parts: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_sizes: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_scheduled_orders: Option<Vec<String>>,
    /// Fields not modelled above, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ScheduleResponse {
    /// Schedule id of the first job, or the top-level id when there are no jobs.
    pub fn schedule_id(&self) -> Option<&str> {
        self.jobs
            .first()
            .and_then(|j| j.get("ScheduleId"))
            .and_then(|v| v.as_str())
            .or(self.schedule_id.as_deref())
    }

    /// Typed station utilization entries.
    pub fn stations(&self) -> Result<Vec<SimulatedStation>> {
        self.sim_stations
            .iter()
            .map(|s| SimulatedStation::deserialize(s).map_err(Error::from))
            .collect()
    }
}

/// Simulated use of a single station over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimulatedStation {
    #[serde(default)]
    pub schedule_id: Option<String>,
    pub station_group: String,
    pub station_num: i32,
    #[serde(rename = "StartUTC", deserialize_with = "utc_lenient")]
    pub start_utc: DateTime<Utc>,
    #[serde(rename = "EndUTC", deserialize_with = "utc_lenient")]
    pub end_utc: DateTime<Utc>,
    #[serde(with = "serde_iso")]
    pub utilization_time: TimeDelta,
    #[serde(with = "serde_iso", default = "TimeDelta::zero")]
    pub planned_down_time: TimeDelta,
}

impl SimulatedStation {
    /// Station label such as `MC #2`.
    pub fn label(&self) -> String {
        format!("{} #{}", self.station_group, self.station_num)
    }

    pub fn period(&self) -> TimeDelta {
        self.end_utc - self.start_utc
    }
}

/// Accepts RFC 3339 timestamps and offset-less ones, which are taken as UTC.
pub fn utc_lenient<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_utc(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|n| n.and_utc())
        .map_err(|_| Error::InvalidInput(format!("invalid timestamp: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn response() -> serde_json::Value {
        json!({
            "Jobs": [
                {"Unique": "aaa-1", "PartName": "aaa", "ScheduleId": "sch42", "Priority": 100},
                {"Unique": "bbb-1", "PartName": "bbb", "ScheduleId": "sch42"}
            ],
            "SimStations": [{
                "ScheduleId": "sch42",
                "StationGroup": "MC",
                "StationNum": 1,
                "StartUTC": "2016-11-05T01:00:00Z",
                "EndUTC": "2016-11-05T03:00:00",
                "UtilizationTime": "PT1H30M",
                "PlannedDownTime": "PT0S"
            }],
            "NewExtraParts": [{"Part": "ccc", "Quantity": 2}],
            "QueueSizes": {"Transfer": {"MaxSizeBeforeStopUnloading": 4}},
            "Diagnostics": ["ok"]
        })
    }

    #[test]
    fn test_schedule_id_from_first_job() {
        let r: ScheduleResponse = serde_json::from_value(response()).unwrap();
        assert_eq!(r.schedule_id(), Some("sch42"));
    }

    #[test]
    fn test_schedule_id_falls_back_to_top_level() {
        let r: ScheduleResponse =
            serde_json::from_value(json!({"ScheduleId": "top", "Jobs": []})).unwrap();
        assert_eq!(r.schedule_id(), Some("top"));
        assert_eq!(ScheduleResponse::default().schedule_id(), None);
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let r: ScheduleResponse = serde_json::from_value(response()).unwrap();
        let back = serde_json::to_value(&r).unwrap();
        assert_eq!(back, response());
    }

    #[test]
    fn test_typed_stations() {
        let r: ScheduleResponse = serde_json::from_value(response()).unwrap();
        let stations = r.stations().unwrap();
        assert_eq!(stations.len(), 1);
        let s = &stations[0];
        assert_eq!(s.label(), "MC #1");
        assert_eq!(s.utilization_time, TimeDelta::minutes(90));
        assert_eq!(s.planned_down_time, TimeDelta::zero());
        assert_eq!(
            s.end_utc,
            Utc.with_ymd_and_hms(2016, 11, 5, 3, 0, 0).unwrap()
        );
        assert_eq!(s.period(), TimeDelta::hours(2));
    }

    #[test]
    fn test_bad_station_duration() {
        let r: ScheduleResponse = serde_json::from_value(json!({
            "SimStations": [{
                "StationGroup": "MC",
                "StationNum": 1,
                "StartUTC": "2016-11-05T01:00:00Z",
                "EndUTC": "2016-11-05T03:00:00Z",
                "UtilizationTime": "01:30:00"
            }]
        }))
        .unwrap();
        assert!(r.stations().is_err());
    }

    #[test]
    fn test_out_of_range_station_duration() {
        let r: ScheduleResponse = serde_json::from_value(json!({
            "SimStations": [{
                "StationGroup": "MC",
                "StationNum": 1,
                "StartUTC": "2016-11-05T01:00:00Z",
                "EndUTC": "2016-11-05T03:00:00Z",
                "UtilizationTime": "P200000000000000D"
            }]
        }))
        .unwrap();
        assert!(matches!(r.stations(), Err(Error::Json(_))));
    }
}
