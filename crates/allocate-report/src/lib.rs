//! Schedule analysis for the allocate toolkit.
//!
//! Turns an engine response into the tables and charts used to review a
//! schedule before it is uploaded: a per-part summary, station utilization,
//! a station Gantt chart and cumulative production curves. Output is either
//! plain text or a self-contained HTML page.

pub mod error;
pub mod html;
pub mod production;
pub mod report;
pub mod stations;
pub mod summary;
pub mod table;

pub use error::{ReportError, ReportResult};
pub use report::Report;
