//! Engine run as a child process hosting a scheduling plugin.

use allocate_config::EngineConfig;
use allocate_core::{Allocator, ScheduleRequest, ScheduleResponse};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::EngineError;

/// Runs the configured engine command once per allocation.
#[derive(Debug, Clone)]
pub struct PluginEngine {
    config: EngineConfig,
    plugin: String,
}

impl PluginEngine {
    pub fn new(config: EngineConfig, plugin: impl Into<String>) -> Self {
        Self {
            config,
            plugin: plugin.into(),
        }
    }

    /// Program and arguments that will be run.
    pub fn command_line(&self) -> (&str, Vec<String>) {
        (&self.config.command, self.config.args_for(&self.plugin))
    }

    /// Run the engine with `input` on stdin and return its stdout.
    pub async fn run_raw(&self, input: &str) -> Result<String, EngineError> {
        let (program, args) = self.command_line();
        info!(command = %program, args = ?args, "Running scheduling engine");

        let mut child = Command::new(program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                command: program.to_string(),
                source,
            })?;

        // Feed stdin while stdout is drained so large documents cannot deadlock.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_owned();
            tokio::spawn(async move {
                stdin.write_all(input.as_bytes()).await?;
                stdin.shutdown().await
            })
        });

        let output = child.wait_with_output().await?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Engine did not read the whole request"),
                Err(e) => warn!(error = %e, "Request writer task failed"),
            }
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            warn!(status = %output.status, stderr = %stderr, "Scheduling engine failed");
            return Err(EngineError::Failed {
                status: output.status,
                stderr,
            });
        }
        if !stderr.is_empty() {
            debug!(stderr = %stderr, "Scheduling engine diagnostics");
        }

        String::from_utf8(output.stdout).map_err(|e| {
            EngineError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Run the engine on a request and parse its response.
    pub async fn run(&self, request: &ScheduleRequest) -> Result<ScheduleResponse, EngineError> {
        let input = serde_json::to_string(request)?;
        let stdout = self.run_raw(&input).await?;
        let response: ScheduleResponse = serde_json::from_str(&stdout)?;

        info!(
            jobs = response.jobs.len(),
            stations = response.sim_stations.len(),
            extra_parts = response.new_extra_parts.len(),
            "Scheduling engine completed"
        );
        Ok(response)
    }
}

#[async_trait]
impl Allocator for PluginEngine {
    fn name(&self) -> &'static str {
        "plugin"
    }

    async fn allocate(&self, request: &ScheduleRequest) -> allocate_core::Result<ScheduleResponse> {
        Ok(self.run(request).await?)
    }
}
