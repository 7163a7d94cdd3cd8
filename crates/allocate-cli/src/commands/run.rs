//! Run the engine on a bookings file.

use allocate_config::Settings;
use allocate_config::files::{load_bookings, load_downtimes, load_flex_plan};
use allocate_core::{
    FlexPlan, RequestBuilder, ScheduleId, ScheduleRequest, TimeWindow, UnscheduledStatus,
};
use allocate_engine::PluginEngine;
use anyhow::Result;
use chrono::TimeDelta;
use std::path::PathBuf;

use super::create::schedule;
use super::{parse_fill, resolve_window, to_json};

pub struct RunArgs {
    pub plugin: String,
    pub bookings: Option<PathBuf>,
    pub flex: PathBuf,
    pub start: Option<String>,
    pub end: Option<String>,
    pub fill: Option<String>,
    pub downtimes: Option<PathBuf>,
    pub schedule_id: Option<String>,
}

/// 2016-11-05T07:00:00Z to 2016-11-06T07:00:00Z.
fn default_window() -> TimeWindow {
    let window = TimeWindow::default();
    TimeWindow {
        start: window.start + TimeDelta::hours(6),
        end: window.end + TimeDelta::hours(6),
    }
}

pub fn build_request(
    settings: &Settings,
    args: &RunArgs,
    flex_plan: FlexPlan,
    status: UnscheduledStatus,
    downtimes: Option<Vec<serde_json::Value>>,
) -> Result<ScheduleRequest> {
    let window = resolve_window(
        args.start.as_deref(),
        args.end.as_deref(),
        settings.window.unwrap_or_else(default_window),
    )?;
    let schedule_id = args
        .schedule_id
        .clone()
        .map(ScheduleId::from)
        .unwrap_or_else(ScheduleId::new);

    let mut builder = RequestBuilder::new(flex_plan)
        .window(window)
        .fill_method(parse_fill(args.fill.as_deref())?)
        .schedule_id(Some(schedule_id))
        .bookings(status.unscheduled_bookings)
        .scheduled_parts(status.scheduled_parts);
    if let Some(downtimes) = downtimes {
        builder = builder.downtimes(downtimes);
    }
    Ok(builder.build()?)
}

pub async fn run(settings: &Settings, args: RunArgs) -> Result<()> {
    let flex_plan = load_flex_plan(&args.flex)?;
    let status = load_bookings(args.bookings.as_deref())?;
    let downtimes = args.downtimes.as_deref().map(load_downtimes).transpose()?;
    let request = build_request(settings, &args, flex_plan, status, downtimes)?;

    let engine = PluginEngine::new(settings.engine.clone(), args.plugin.clone());
    let response = schedule(&engine, &request).await?;
    println!("{}", to_json(&response)?);
    Ok(())
}
