//! Summarize an engine response.

use allocate_config::files::load_response;
use allocate_report::Report;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub fn report(response: Option<&Path>, html: Option<&Path>, stations: bool) -> Result<()> {
    let response = load_response(response)?;
    let report = Report::from_response(&response)?;

    print!("{}", report.to_text());
    if stations {
        println!();
        print!("{}", report.station_table());
    }

    if let Some(path) = html {
        let page = report.to_html()?;
        std::fs::write(path, page)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "Wrote HTML report");
    }
    Ok(())
}
