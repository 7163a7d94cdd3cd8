//! Bookings, part programs and the other inputs of a schedule request.

use serde::{Deserialize, Serialize};

/// Flexibility plan describing part routings. Opaque to this toolkit and
/// passed to the engine unmodified.
pub type FlexPlan = serde_json::Value;

/// How the engine should fill the time window with bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillMethod {
    #[default]
    FillInAnyOrder,
    FillOnlyByDueDate,
}

impl std::str::FromStr for FillMethod {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "FillInAnyOrder" | "any" | "any-order" => Ok(Self::FillInAnyOrder),
            "FillOnlyByDueDate" | "due-date" => Ok(Self::FillOnlyByDueDate),
            _ => Err(crate::Error::InvalidInput(format!(
                "unknown fill method: {}",
                s
            ))),
        }
    }
}

/// Main program used by one process of a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProgramForProcess {
    pub process_number: String,
    pub machine_group: String,
    pub program_name: String,
}

/// Demand for a quantity of one part inside a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookingDemand {
    pub booking_id: String,
    pub part: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programs: Option<Vec<ProgramForProcess>>,
}

/// A demand for parts by a due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Booking {
    pub booking_id: String,
    /// ISO date (YYYY-MM-DD) or datetime, passed through as written.
    pub due_date: String,
    pub priority: i32,
    pub parts: Vec<BookingDemand>,
}

/// Bookings not yet scheduled plus parts already scheduled without a booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnscheduledStatus {
    #[serde(default)]
    pub unscheduled_bookings: Vec<Booking>,
    #[serde(default)]
    pub scheduled_parts: Vec<serde_json::Value>,
}

/// A part program read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub part: String,
    pub process_number: String,
    pub machine_group: String,
    pub name: String,
    pub content: String,
}

impl Program {
    /// Reference attached to a booking demand.
    pub fn for_process(&self) -> ProgramForProcess {
        ProgramForProcess {
            process_number: self.process_number.clone(),
            machine_group: self.machine_group.clone(),
            program_name: self.name.clone(),
        }
    }

    /// Entry registered with the job-tracking system.
    pub fn entry(&self) -> ProgramEntry {
        ProgramEntry {
            program_name: self.name.clone(),
            revision: -1,
            comment: format!("Comment for {}", self.name),
            program_content: self.content.clone(),
        }
    }
}

/// Program definition uploaded alongside new jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProgramEntry {
    pub program_name: String,
    /// `-1` asks the job-tracking system to allocate the next revision.
    pub revision: i64,
    pub comment: String,
    pub program_content: String,
}
