//! Allocate CLI tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "allocate")]
#[command(about = "Build schedule requests, run the scheduling engine and upload jobs", long_about = None)]
struct Cli {
    /// Settings file
    #[arg(long, global = true, env = "ALLOCATE_CONFIG")]
    config: Option<PathBuf>,

    /// Print requests and responses to stderr and enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a schedule for a list of parts
    Create {
        /// Flexibility plan JSON file
        #[arg(short, long)]
        flex: PathBuf,
        /// Scheduling plugin passed to the engine
        #[arg(short, long)]
        plugin: String,
        /// Upload the jobs to this job-tracking server
        #[arg(short, long)]
        download: Option<String>,
        /// Print the reshaped jobs instead of the engine response
        #[arg(long)]
        new_jobs: bool,
        /// Part program file or directory
        #[arg(long)]
        program_dir: Option<PathBuf>,
        /// Window start, "YYYYMMDD HHMMSS" or RFC 3339
        #[arg(long)]
        start: Option<String>,
        /// Window end, "YYYYMMDD HHMMSS" or RFC 3339
        #[arg(long)]
        end: Option<String>,
        /// Schedule today, midnight to midnight UTC
        #[arg(long, conflicts_with_all = ["start", "end"])]
        today: bool,
        /// Fill method: any-order or due-date
        #[arg(long)]
        fill: Option<String>,
        /// Parts to schedule, as part or part,quantity
        #[arg(required = true)]
        parts: Vec<String>,
    },
    /// Run the engine on bookings and print the response
    Run {
        /// Scheduling plugin passed to the engine
        #[arg(short, long)]
        plugin: String,
        /// Bookings JSON file; stdin when absent
        #[arg(short, long)]
        bookings: Option<PathBuf>,
        /// Flexibility plan JSON file
        #[arg(short, long)]
        flex: PathBuf,
        /// Window start
        #[arg(short, long)]
        start: Option<String>,
        /// Window end
        #[arg(short, long)]
        end: Option<String>,
        /// Fill method: any-order or due-date
        #[arg(long)]
        fill: Option<String>,
        /// Downtimes JSON file
        #[arg(long)]
        downtimes: Option<PathBuf>,
        /// Schedule id; generated when absent
        #[arg(long)]
        schedule_id: Option<String>,
    },
    /// Summarize an engine response
    Report {
        /// Response JSON file; stdin when absent
        response: Option<PathBuf>,
        /// Also write an HTML report
        #[arg(long)]
        html: Option<PathBuf>,
        /// Print every simulated station period
        #[arg(long)]
        stations: bool,
    },
    /// Reshape an engine response and upload it
    Upload {
        /// Response JSON file; stdin when absent
        response: Option<PathBuf>,
        /// Job-tracking server
        #[arg(short, long)]
        download: Option<String>,
        /// Part program file or directory
        #[arg(long)]
        program_dir: Option<PathBuf>,
        /// Schedule id the server must currently hold
        #[arg(long)]
        expected_previous: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let settings = allocate_config::Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Create {
            flex,
            plugin,
            download,
            new_jobs,
            program_dir,
            start,
            end,
            today,
            fill,
            parts,
        } => {
            let args = commands::create::CreateArgs {
                flex,
                plugin,
                download,
                new_jobs,
                program_dir,
                start,
                end,
                today,
                fill,
                parts,
                verbose: cli.verbose,
            };
            commands::create::create(&settings, args).await?;
        }
        Commands::Run {
            plugin,
            bookings,
            flex,
            start,
            end,
            fill,
            downtimes,
            schedule_id,
        } => {
            let args = commands::run::RunArgs {
                plugin,
                bookings,
                flex,
                start,
                end,
                fill,
                downtimes,
                schedule_id,
            };
            commands::run::run(&settings, args).await?;
        }
        Commands::Report {
            response,
            html,
            stations,
        } => {
            commands::report::report(response.as_deref(), html.as_deref(), stations)?;
        }
        Commands::Upload {
            response,
            download,
            program_dir,
            expected_previous,
        } => {
            commands::upload::upload(
                &settings,
                response.as_deref(),
                download,
                program_dir.as_deref(),
                expected_previous.as_deref(),
            )
            .await?;
        }
    }

    Ok(())
}
