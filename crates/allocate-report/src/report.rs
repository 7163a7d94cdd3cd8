//! Assembled schedule report.

use allocate_core::duration::format_iso_duration;
use allocate_core::{ScheduleResponse, SimulatedStation};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::production::{ProductionCurve, production_curves};
use crate::stations::{GanttRow, StationUtilization, gantt_rows, sort_stations, utilization};
use crate::summary::{ExtraPart, PartSummary, summarize_extra_parts, summarize_jobs};
use crate::table::{Align, TextTable};
use crate::ReportResult;

/// Everything shown about one engine response.
#[derive(Debug, Clone)]
pub struct Report {
    pub schedule_id: Option<String>,
    pub parts: Vec<PartSummary>,
    pub extra_parts: Vec<ExtraPart>,
    pub queues: Vec<(String, String)>,
    pub stations: Vec<SimulatedStation>,
    pub utilization: Vec<StationUtilization>,
    pub gantt: Vec<GanttRow>,
    pub production: Vec<ProductionCurve>,
}

impl Report {
    pub fn from_response(response: &ScheduleResponse) -> ReportResult<Self> {
        let mut stations = response.stations()?;
        sort_stations(&mut stations);

        let queues = response
            .queue_sizes
            .as_ref()
            .and_then(|q| q.as_object())
            .map(|q| {
                q.iter()
                    .map(|(name, size)| (name.clone(), size.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let report = Self {
            schedule_id: response.schedule_id().map(str::to_string),
            parts: summarize_jobs(&response.jobs),
            extra_parts: summarize_extra_parts(&response.new_extra_parts),
            queues,
            utilization: utilization(&stations),
            gantt: gantt_rows(&stations),
            production: production_curves(&response.jobs)?,
            stations,
        };
        debug!(
            parts = report.parts.len(),
            stations = report.utilization.len(),
            curves = report.production.len(),
            "Built schedule report"
        );
        Ok(report)
    }

    /// Earliest and latest time covered by stations or production.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let times = self
            .stations
            .iter()
            .flat_map(|s| [s.start_utc, s.end_utc])
            .chain(
                self.production
                    .iter()
                    .flat_map(|c| c.points.iter().map(|(t, _)| *t)),
            );
        let mut span: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
        for t in times {
            span = Some(match span {
                None => (t, t),
                Some((lo, hi)) => (lo.min(t), hi.max(t)),
            });
        }
        span
    }

    /// Plain-text rendering: summary, extra parts, queues, utilization, production totals.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Schedule {}\n\n",
            self.schedule_id.as_deref().unwrap_or("(none)")
        ));

        let mut parts = TextTable::new(&[
            ("Part", Align::Left),
            ("Jobs", Align::Right),
            ("Cycles", Align::Right),
            ("Completed", Align::Right),
        ]);
        for p in &self.parts {
            let completed = self
                .production
                .iter()
                .find(|c| c.part == p.part)
                .map(|c| c.total().to_string())
                .unwrap_or_default();
            parts.row(vec![
                p.part.clone(),
                p.jobs.to_string(),
                p.cycles.to_string(),
                completed,
            ]);
        }
        out.push_str(&parts.render());

        if !self.extra_parts.is_empty() {
            let mut extra = TextTable::new(&[("Extra part", Align::Left), ("Quantity", Align::Right)]);
            for e in &self.extra_parts {
                extra.row(vec![e.part.clone(), e.quantity.to_string()]);
            }
            out.push('\n');
            out.push_str(&extra.render());
        }

        if !self.queues.is_empty() {
            let mut queues = TextTable::new(&[("Queue", Align::Left), ("Size", Align::Left)]);
            for (name, size) in &self.queues {
                queues.row(vec![name.clone(), size.clone()]);
            }
            out.push('\n');
            out.push_str(&queues.render());
        }

        let mut stations = TextTable::new(&[
            ("Station", Align::Left),
            ("Busy", Align::Right),
            ("Down", Align::Right),
            ("Period", Align::Right),
            ("Util %", Align::Right),
        ]);
        for u in &self.utilization {
            stations.row(vec![
                u.label.clone(),
                hours(u.utilization),
                hours(u.planned_down_time),
                hours(u.period),
                format!("{:.1}", u.percent),
            ]);
        }
        if !stations.is_empty() {
            out.push('\n');
            out.push_str(&stations.render());
        }

        out
    }

    /// Station use rows, one per simulated period.
    pub fn station_table(&self) -> String {
        let mut table = TextTable::new(&[
            ("Station", Align::Left),
            ("Start", Align::Left),
            ("End", Align::Left),
            ("Utilization", Align::Right),
            ("Planned down", Align::Right),
        ]);
        for s in &self.stations {
            table.row(vec![
                s.label(),
                s.start_utc.format("%Y-%m-%d %H:%M").to_string(),
                s.end_utc.format("%Y-%m-%d %H:%M").to_string(),
                format_iso_duration(s.utilization_time),
                format_iso_duration(s.planned_down_time),
            ]);
        }
        table.render()
    }
}

fn hours(d: TimeDelta) -> String {
    format!("{:.2}h", d.num_seconds() as f64 / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_response() -> ScheduleResponse {
        serde_json::from_value(json!({
            "Jobs": [
                {
                    "Unique": "aaa-1",
                    "PartName": "aaa",
                    "ScheduleId": "sch42",
                    "Cycles": 4,
                    "ProcsAndPaths": [{"paths": [{"SimulatedProduction": [
                        {"TimeUTC": "2016-11-05T03:00:00Z", "Quantity": 1},
                        {"TimeUTC": "2016-11-05T05:00:00Z", "Quantity": 4}
                    ]}]}]
                },
                {"Unique": "bbb-1", "PartName": "bbb", "ScheduleId": "sch42", "Cycles": 2}
            ],
            "SimStations": [
                {
                    "StationGroup": "MC", "StationNum": 1,
                    "StartUTC": "2016-11-05T01:00:00Z", "EndUTC": "2016-11-05T03:00:00Z",
                    "UtilizationTime": "PT1H", "PlannedDownTime": "PT0S"
                },
                {
                    "StationGroup": "L/U", "StationNum": 1,
                    "StartUTC": "2016-11-05T01:00:00Z", "EndUTC": "2016-11-05T06:00:00Z",
                    "UtilizationTime": "PT30M", "PlannedDownTime": "PT0S"
                }
            ],
            "NewExtraParts": [{"Part": "ccc", "Quantity": 2}],
            "QueueSizes": {"Transfer": 4}
        }))
        .unwrap()
    }

    #[test]
    fn test_from_response() {
        let report = Report::from_response(&sample_response()).unwrap();
        assert_eq!(report.schedule_id.as_deref(), Some("sch42"));
        assert_eq!(report.parts.len(), 2);
        assert_eq!(report.utilization[0].label, "L/U #1");
        assert_eq!(report.queues, vec![("Transfer".to_string(), "4".to_string())]);
        assert_eq!(report.production[0].total(), 4);
    }

    #[test]
    fn test_time_span() {
        let report = Report::from_response(&sample_response()).unwrap();
        let (lo, hi) = report.time_span().unwrap();
        assert_eq!(lo, Utc.with_ymd_and_hms(2016, 11, 5, 1, 0, 0).unwrap());
        assert_eq!(hi, Utc.with_ymd_and_hms(2016, 11, 5, 6, 0, 0).unwrap());
        assert!(Report::from_response(&ScheduleResponse::default())
            .unwrap()
            .time_span()
            .is_none());
    }

    #[test]
    fn test_text() {
        let text = Report::from_response(&sample_response()).unwrap().to_text();
        assert!(text.starts_with("Schedule sch42\n"));
        let aaa: Vec<&str> = text
            .lines()
            .find(|l| l.starts_with("aaa"))
            .unwrap()
            .split_whitespace()
            .collect();
        assert_eq!(aaa, vec!["aaa", "1", "4", "4"]);
        assert!(text.contains("ccc"));
        assert!(text.contains("Transfer"));
        assert!(text.contains("MC #1"));
        assert!(text.contains("50.0"));
    }

    #[test]
    fn test_station_table() {
        let table = Report::from_response(&sample_response())
            .unwrap()
            .station_table();
        assert!(table.contains("2016-11-05 01:00"));
        assert!(table.contains("PT30M"));
    }
}
