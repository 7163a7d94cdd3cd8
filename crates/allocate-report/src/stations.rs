//! Station utilization and Gantt rows.

use allocate_core::SimulatedStation;
use chrono::{DateTime, TimeDelta, Utc};

/// Utilization totals for one station over all of its simulated periods.
#[derive(Debug, Clone, PartialEq)]
pub struct StationUtilization {
    pub label: String,
    pub utilization: TimeDelta,
    pub planned_down_time: TimeDelta,
    pub period: TimeDelta,
    /// Utilization as a percentage of the time the station was not down.
    pub percent: f64,
}

/// One bar of the Gantt chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttBar {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Fraction of the bar the station was busy, between 0 and 1.
    pub busy: f64,
}

/// All bars for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttRow {
    pub label: String,
    pub bars: Vec<GanttBar>,
}

/// Sort stations by group, number and start time.
pub fn sort_stations(stations: &mut [SimulatedStation]) {
    stations.sort_by(|a, b| {
        a.station_group
            .cmp(&b.station_group)
            .then(a.station_num.cmp(&b.station_num))
            .then(a.start_utc.cmp(&b.start_utc))
    });
}

fn ratio(part: TimeDelta, whole: TimeDelta) -> f64 {
    let whole = whole.num_milliseconds();
    if whole <= 0 {
        return 0.0;
    }
    part.num_milliseconds() as f64 / whole as f64
}

/// Per-station utilization. `stations` must be sorted with `sort_stations`.
pub fn utilization(stations: &[SimulatedStation]) -> Vec<StationUtilization> {
    let mut out: Vec<StationUtilization> = Vec::new();
    for s in stations {
        let label = s.label();
        match out.last_mut() {
            Some(u) if u.label == label => {
                u.utilization += s.utilization_time;
                u.planned_down_time += s.planned_down_time;
                u.period += s.period();
            }
            _ => out.push(StationUtilization {
                label,
                utilization: s.utilization_time,
                planned_down_time: s.planned_down_time,
                period: s.period(),
                percent: 0.0,
            }),
        }
    }
    for u in &mut out {
        u.percent = 100.0 * ratio(u.utilization, u.period - u.planned_down_time);
    }
    out
}

/// Gantt rows, one per station. `stations` must be sorted with `sort_stations`.
pub fn gantt_rows(stations: &[SimulatedStation]) -> Vec<GanttRow> {
    let mut rows: Vec<GanttRow> = Vec::new();
    for s in stations {
        let bar = GanttBar {
            start: s.start_utc,
            end: s.end_utc,
            busy: ratio(s.utilization_time, s.period()).clamp(0.0, 1.0),
        };
        let label = s.label();
        match rows.last_mut() {
            Some(row) if row.label == label => row.bars.push(bar),
            _ => rows.push(GanttRow {
                label,
                bars: vec![bar],
            }),
        }
    }
    rows
}
