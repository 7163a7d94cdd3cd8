//! Scheduling engine backends for the allocate toolkit.
//!
//! The engine is a separately built program. It reads a schedule request
//! as JSON on standard input and writes the schedule as JSON on standard
//! output.

pub mod error;
pub mod plugin;

pub use allocate_core::allocator::Allocator;
pub use error::EngineError;
pub use plugin::PluginEngine;
