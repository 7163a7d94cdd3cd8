//! Configuration and input parsing for the allocate scheduling toolkit.
//!
//! This crate handles:
//! - The optional `allocate.kdl` settings file and environment overrides
//! - Command-line inputs (part tokens, timestamps)
//! - Part program directories
//! - JSON input files (flex plan, bookings, downtimes, engine responses)

pub mod error;
pub mod files;
pub mod inputs;
pub mod programs;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use inputs::{parse_cli_timestamp, parse_part_token, parse_timestamp};
pub use programs::{load_programs, parse_program};
pub use settings::{BookingDefaults, EngineConfig, Settings, UploadConfig};
