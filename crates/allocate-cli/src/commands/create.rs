//! Create a schedule for a list of parts.

use allocate_config::files::load_flex_plan;
use allocate_config::{Settings, parse_part_token};
use allocate_core::{
    Allocator, FlexPlan, NewJobs, Program, RequestBuilder, ScheduleRequest, TimeWindow,
};
use allocate_engine::PluginEngine;
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use super::{jobs_client, parse_fill, programs, resolve_window, to_json};

pub struct CreateArgs {
    pub flex: PathBuf,
    pub plugin: String,
    pub download: Option<String>,
    pub new_jobs: bool,
    pub program_dir: Option<PathBuf>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub today: bool,
    pub fill: Option<String>,
    pub parts: Vec<String>,
    pub verbose: bool,
}

/// Build the request for `args` from an already loaded flex plan and programs.
pub fn build_request(
    settings: &Settings,
    args: &CreateArgs,
    flex_plan: FlexPlan,
    programs: &[Program],
) -> Result<ScheduleRequest> {
    let window = if args.today {
        TimeWindow::day(Utc::now().date_naive())
    } else {
        resolve_window(
            args.start.as_deref(),
            args.end.as_deref(),
            settings.window.unwrap_or_default(),
        )?
    };

    let mut builder = RequestBuilder::new(flex_plan)
        .window(window)
        .fill_method(parse_fill(args.fill.as_deref())?)
        .default_quantity(settings.booking.quantity)
        .priority(settings.booking.priority)
        .programs(programs.iter().cloned());
    for token in &args.parts {
        let (part, quantity) =
            parse_part_token(token).with_context(|| format!("Invalid part '{}'", token))?;
        builder = builder.add_part(part, quantity);
    }

    Ok(builder.build()?)
}

pub async fn create(settings: &Settings, args: CreateArgs) -> Result<()> {
    let flex_plan = load_flex_plan(&args.flex)?;
    let programs = programs(args.program_dir.as_deref())?;
    let request = build_request(settings, &args, flex_plan, &programs)?;

    let engine = PluginEngine::new(settings.engine.clone(), args.plugin.clone());
    execute(
        &engine,
        settings,
        &args,
        &request,
        &programs,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await
}

/// Schedule `request` and write the result to `out`: the server reply when
/// uploading, the reshaped jobs with `--new-jobs`, otherwise the engine
/// response. Verbose dumps go to `diag`.
pub async fn execute(
    allocator: &dyn Allocator,
    settings: &Settings,
    args: &CreateArgs,
    request: &ScheduleRequest,
    programs: &[Program],
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<()> {
    if args.verbose {
        writeln!(diag, "{}", to_json(request)?)?;
    }

    let response = schedule(allocator, request).await?;

    if args.download.is_none() && !args.new_jobs {
        writeln!(out, "{}", to_json(&response)?)?;
        return Ok(());
    }

    if args.verbose {
        writeln!(diag, "{}", to_json(&response)?)?;
    }
    let new_jobs = NewJobs::from_response(&response, programs.iter().map(Program::entry).collect())?;

    if args.download.is_some() {
        let client = jobs_client(settings, args.download.clone())?;
        let body = client
            .add_jobs(&new_jobs, None)
            .await
            .context("Failed to upload jobs")?;
        writeln!(out, "{}", body)?;
    } else {
        writeln!(out, "{}", to_json(&new_jobs)?)?;
    }
    Ok(())
}

pub(crate) async fn schedule(
    allocator: &dyn Allocator,
    request: &ScheduleRequest,
) -> Result<allocate_core::ScheduleResponse> {
    info!(
        allocator = allocator.name(),
        bookings = request.unscheduled_bookings.len(),
        start = %request.start_utc,
        end = %request.end_utc,
        "Requesting schedule"
    );
    allocator
        .allocate(request)
        .await
        .context("Scheduling engine failed")
}
