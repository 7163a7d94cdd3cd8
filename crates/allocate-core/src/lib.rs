//! Core domain types and traits for the allocate scheduling toolkit.
//!
//! This crate contains:
//! - Booking, program and flex plan types sent to the scheduling engine
//! - Schedule request assembly and the engine response model
//! - Reshaping a response into the job-tracking "new jobs" document
//! - The `Allocator` trait implemented by engine backends
//! - ISO-8601 duration parsing and schedule id generation

pub mod allocator;
pub mod duration;
pub mod error;
pub mod model;
pub mod newjobs;
pub mod request;
pub mod response;
pub mod schedule_id;

pub use allocator::Allocator;
pub use error::{Error, Result};
pub use model::{
    Booking, BookingDemand, FillMethod, FlexPlan, Program, ProgramEntry, ProgramForProcess,
    UnscheduledStatus,
};
pub use newjobs::NewJobs;
pub use request::{RequestBuilder, ScheduleRequest, TimeWindow};
pub use response::{ScheduleResponse, SimulatedStation};
pub use schedule_id::ScheduleId;
