//! Self-contained HTML report with SVG charts.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::{Report, ReportResult};

const CHART_WIDTH: f64 = 960.0;
const LABEL_WIDTH: f64 = 110.0;
const PLOT_WIDTH: f64 = CHART_WIDTH - LABEL_WIDTH - 30.0;
const GANTT_ROW: f64 = 26.0;
const CURVE_HEIGHT: f64 = 320.0;
const CURVE_MARGIN: f64 = 20.0;

const PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

// ============================================================================
// Template structs
// ============================================================================

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    schedule_id: String,
    parts: Vec<PartView>,
    extra_parts: Vec<ExtraView>,
    queues: Vec<QueueView>,
    stations: Vec<StationView>,
    has_chart: bool,
    span_label: String,
    chart_width: String,
    gantt_height: String,
    gantt_labels: Vec<LabelView>,
    gantt_bars: Vec<BarView>,
    curve_height: String,
    curves: Vec<CurveView>,
    max_quantity: i64,
}

// ============================================================================
// View models
// ============================================================================

struct PartView {
    part: String,
    jobs: usize,
    cycles: i64,
    completed: i64,
}

struct ExtraView {
    part: String,
    quantity: i64,
}

struct QueueView {
    name: String,
    size: String,
}

struct StationView {
    label: String,
    busy_hours: String,
    down_hours: String,
    percent: String,
}

struct LabelView {
    y: String,
    text: String,
}

struct BarView {
    x: String,
    y: String,
    width: String,
    height: String,
    opacity: String,
    title: String,
}

struct CurveView {
    part: String,
    color: String,
    points: String,
    total: i64,
}

/// Maps times onto the horizontal axis of a chart.
struct TimeAxis {
    lo: DateTime<Utc>,
    span_ms: f64,
}

impl TimeAxis {
    fn new(lo: DateTime<Utc>, hi: DateTime<Utc>) -> Self {
        let span_ms = ((hi - lo).num_milliseconds() as f64).max(1.0);
        Self { lo, span_ms }
    }

    fn x(&self, t: DateTime<Utc>) -> f64 {
        LABEL_WIDTH + PLOT_WIDTH * ((t - self.lo).num_milliseconds() as f64 / self.span_ms)
    }
}

fn px(v: f64) -> String {
    format!("{:.1}", v)
}

fn hours(d: chrono::TimeDelta) -> String {
    format!("{:.2}", d.num_seconds() as f64 / 3600.0)
}

impl Report {
    /// Render the report as a standalone HTML page.
    pub fn to_html(&self) -> ReportResult<String> {
        let span = self.time_span();

        let mut gantt_labels = Vec::new();
        let mut gantt_bars = Vec::new();
        let mut curves = Vec::new();
        let max_quantity = self
            .production
            .iter()
            .map(|c| c.total())
            .max()
            .unwrap_or(0);

        if let Some((lo, hi)) = span {
            let axis = TimeAxis::new(lo, hi);

            for (i, row) in self.gantt.iter().enumerate() {
                let y = i as f64 * GANTT_ROW;
                gantt_labels.push(LabelView {
                    y: px(y + GANTT_ROW * 0.65),
                    text: row.label.clone(),
                });
                for bar in &row.bars {
                    let x = axis.x(bar.start);
                    gantt_bars.push(BarView {
                        x: px(x),
                        y: px(y + 3.0),
                        width: px((axis.x(bar.end) - x).max(1.0)),
                        height: px(GANTT_ROW - 6.0),
                        opacity: format!("{:.2}", 0.15 + 0.85 * bar.busy),
                        title: format!(
                            "{} {} to {} ({:.0}% busy)",
                            row.label,
                            bar.start.format("%m-%d %H:%M"),
                            bar.end.format("%m-%d %H:%M"),
                            bar.busy * 100.0
                        ),
                    });
                }
            }

            let plot_h = CURVE_HEIGHT - 2.0 * CURVE_MARGIN;
            let y_of = |q: i64| -> f64 {
                let max = max_quantity.max(1) as f64;
                CURVE_HEIGHT - CURVE_MARGIN - plot_h * (q as f64 / max)
            };
            for (i, curve) in self.production.iter().enumerate() {
                // step line: hold the previous total until the next completion
                let mut points = vec![format!("{},{}", px(axis.x(lo)), px(y_of(0)))];
                let mut previous = 0;
                for (t, q) in &curve.points {
                    let x = px(axis.x(*t));
                    points.push(format!("{},{}", x, px(y_of(previous))));
                    points.push(format!("{},{}", x, px(y_of(*q))));
                    previous = *q;
                }
                points.push(format!("{},{}", px(axis.x(hi)), px(y_of(previous))));
                curves.push(CurveView {
                    part: curve.part.clone(),
                    color: PALETTE[i % PALETTE.len()].to_string(),
                    points: points.join(" "),
                    total: curve.total(),
                });
            }
        }

        let template = ReportTemplate {
            schedule_id: self.schedule_id.clone().unwrap_or_default(),
            parts: self
                .parts
                .iter()
                .map(|p| PartView {
                    part: p.part.clone(),
                    jobs: p.jobs,
                    cycles: p.cycles,
                    completed: self
                        .production
                        .iter()
                        .find(|c| c.part == p.part)
                        .map(|c| c.total())
                        .unwrap_or(0),
                })
                .collect(),
            extra_parts: self
                .extra_parts
                .iter()
                .map(|e| ExtraView {
                    part: e.part.clone(),
                    quantity: e.quantity,
                })
                .collect(),
            queues: self
                .queues
                .iter()
                .map(|(name, size)| QueueView {
                    name: name.clone(),
                    size: size.clone(),
                })
                .collect(),
            stations: self
                .utilization
                .iter()
                .map(|u| StationView {
                    label: u.label.clone(),
                    busy_hours: hours(u.utilization),
                    down_hours: hours(u.planned_down_time),
                    percent: format!("{:.1}", u.percent),
                })
                .collect(),
            has_chart: span.is_some(),
            span_label: span
                .map(|(lo, hi)| {
                    format!(
                        "{} to {}",
                        lo.format("%Y-%m-%d %H:%M UTC"),
                        hi.format("%Y-%m-%d %H:%M UTC")
                    )
                })
                .unwrap_or_default(),
            chart_width: px(CHART_WIDTH),
            gantt_height: px((self.gantt.len() as f64 * GANTT_ROW).max(GANTT_ROW)),
            gantt_labels,
            gantt_bars,
            curve_height: px(CURVE_HEIGHT),
            curves,
            max_quantity,
        };

        Ok(template.render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocate_core::ScheduleResponse;
    use serde_json::json;

    fn response() -> ScheduleResponse {
        serde_json::from_value(json!({
            "Jobs": [{
                "Unique": "aaa-1",
                "PartName": "aaa",
                "ScheduleId": "sch<42>",
                "Cycles": 3,
                "ProcsAndPaths": [{"paths": [{"SimulatedProduction": [
                    {"TimeUTC": "2016-11-05T02:00:00Z", "Quantity": 1},
                    {"TimeUTC": "2016-11-05T03:00:00Z", "Quantity": 3}
                ]}]}]
            }],
            "SimStations": [{
                "StationGroup": "MC", "StationNum": 1,
                "StartUTC": "2016-11-05T01:00:00Z", "EndUTC": "2016-11-05T05:00:00Z",
                "UtilizationTime": "PT2H", "PlannedDownTime": "PT0S"
            }],
            "NewExtraParts": []
        }))
        .unwrap()
    }

    #[test]
    fn test_axis() {
        let lo = chrono::TimeZone::with_ymd_and_hms(&Utc, 2016, 11, 5, 1, 0, 0).unwrap();
        let axis = TimeAxis::new(lo, lo + chrono::TimeDelta::hours(4));
        assert_eq!(axis.x(lo), LABEL_WIDTH);
        assert_eq!(
            axis.x(lo + chrono::TimeDelta::hours(2)),
            LABEL_WIDTH + PLOT_WIDTH / 2.0
        );
    }

    #[test]
    fn test_html_contains_charts() {
        let report = Report::from_response(&response()).unwrap();
        let html = report.to_html().unwrap();

        assert!(html.contains("<svg"));
        assert!(html.contains("MC #1"));
        assert!(html.contains("<polyline"));
        assert!(html.contains("50.0"));
        // schedule id is escaped
        assert!(html.contains("sch&#60;42&#62;") || html.contains("sch&lt;42&gt;"));
    }

    #[test]
    fn test_empty_response_renders() {
        let report = Report::from_response(&ScheduleResponse::default()).unwrap();
        let html = report.to_html().unwrap();
        assert!(html.contains("No station or production data"));
        assert!(!html.contains("<polyline"));
    }
}
