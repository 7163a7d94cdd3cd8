//! Settings file (`allocate.kdl`) parsing.
//!
//! Example:
//!
//! ```kdl
//! engine "dotnet" {
//!     args "run" "--framework" "netcoreapp3.1" "-p" "{plugin}"
//! }
//! window start="2016-11-05T01:00:00Z" end="2016-11-06T01:00:00Z"
//! booking quantity=5 priority=100
//! upload target="http://localhost:5000"
//! ```
//!
//! Values given on the command line win over the environment
//! (`ALLOCATE_ENGINE_BIN`, `ALLOCATE_TARGET`), which wins over this file.

use allocate_core::TimeWindow;
use allocate_core::request::{DEFAULT_PRIORITY, DEFAULT_QUANTITY};
use kdl::{KdlDocument, KdlNode};
use std::path::Path;
use tracing::debug;

use crate::inputs::parse_timestamp;
use crate::{ConfigError, ConfigResult};

/// Placeholder replaced by the plugin path in engine arguments.
pub const PLUGIN_PLACEHOLDER: &str = "{plugin}";

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "ALLOCATE_CONFIG";

/// All settings, with defaults filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub engine: EngineConfig,
    /// Schedule window; unset leaves each command's own default.
    pub window: Option<TimeWindow>,
    pub booking: BookingDefaults,
    pub upload: UploadConfig,
}

/// How to start the scheduling engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Program to run.
    pub command: String,
    /// Arguments; `{plugin}` is replaced by the plugin path.
    pub args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: "dotnet".to_string(),
            args: ["run", "--framework", "netcoreapp3.1", "-p", PLUGIN_PLACEHOLDER]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Arguments with the plugin path substituted.
    pub fn args_for(&self, plugin: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace(PLUGIN_PLACEHOLDER, plugin))
            .collect()
    }
}

/// Defaults for bookings created from part tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingDefaults {
    pub quantity: u32,
    pub priority: i32,
}

impl Default for BookingDefaults {
    fn default() -> Self {
        Self {
            quantity: DEFAULT_QUANTITY,
            priority: DEFAULT_PRIORITY,
        }
    }
}

/// Job-tracking system settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadConfig {
    pub target: Option<String>,
}

impl Settings {
    /// Load settings from `path`, or from `$ALLOCATE_CONFIG` when no path is
    /// given, then apply environment overrides. Missing both yields defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let env_path = std::env::var(CONFIG_ENV).ok();
        let path = path.or(env_path.as_deref().map(Path::new));

        let mut settings = match path {
            Some(p) => {
                debug!(path = %p.display(), "Loading settings");
                let text = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.display().to_string(),
                    source,
                })?;
                parse_settings(&text)?
            }
            None => Settings::default(),
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply `ALLOCATE_ENGINE_BIN` and `ALLOCATE_TARGET` overrides.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bin) = lookup("ALLOCATE_ENGINE_BIN").filter(|s| !s.is_empty()) {
            self.engine.command = bin;
        }
        if let Some(target) = lookup("ALLOCATE_TARGET").filter(|s| !s.is_empty()) {
            self.upload.target = Some(target);
        }
    }
}

/// Parse settings from KDL text.
pub fn parse_settings(kdl: &str) -> ConfigResult<Settings> {
    let doc: KdlDocument = kdl.parse()?;
    let mut settings = Settings::default();

    for node in doc.nodes() {
        match node.name().value() {
            "engine" => {
                settings.engine = parse_engine(node)?;
            }
            "window" => {
                settings.window = Some(parse_window(node)?);
            }
            "booking" => {
                if let Some(q) = get_int_prop(node, "quantity") {
                    settings.booking.quantity = u32::try_from(q)
                        .ok()
                        .filter(|q| *q > 0)
                        .ok_or_else(|| {
                            ConfigError::invalid("booking quantity", format!("{}", q))
                        })?;
                }
                if let Some(p) = get_int_prop(node, "priority") {
                    settings.booking.priority = i32::try_from(p)
                        .map_err(|_| ConfigError::invalid("booking priority", format!("{}", p)))?;
                }
            }
            "upload" => {
                settings.upload.target = get_string_prop(node, "target");
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(settings)
}

fn parse_engine(node: &KdlNode) -> ConfigResult<EngineConfig> {
    let defaults = EngineConfig::default();
    let command = get_first_string_arg(node).unwrap_or(defaults.command);

    let mut args = None;
    if let Some(children) = node.children() {
        for child in children.nodes() {
            if child.name().value() == "args" {
                args = Some(get_all_string_args(child));
            }
        }
    }

    if command.is_empty() {
        return Err(ConfigError::MissingField("engine command".to_string()));
    }

    Ok(EngineConfig {
        command,
        args: args.unwrap_or(defaults.args),
    })
}

fn parse_window(node: &KdlNode) -> ConfigResult<TimeWindow> {
    let start = get_string_prop(node, "start")
        .ok_or_else(|| ConfigError::MissingField("window start".to_string()))?;
    let end = get_string_prop(node, "end")
        .ok_or_else(|| ConfigError::MissingField("window end".to_string()))?;

    TimeWindow::new(parse_timestamp(&start)?, parse_timestamp(&end)?)
        .map_err(|e| ConfigError::invalid("window", e.to_string()))
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_all_string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .filter_map(|e| e.value().as_string())
        .map(|s| s.to_string())
        .collect()
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

fn get_int_prop(node: &KdlNode, name: &str) -> Option<i128> {
    node.get(name).and_then(|v| v.as_integer())
}
