//! Schedule request assembly.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Booking, BookingDemand, FillMethod, FlexPlan, Program, ProgramForProcess};
use crate::{Error, Result, ScheduleId};

/// Quantity used when a part is requested without one.
pub const DEFAULT_QUANTITY: u32 = 5;

/// Priority given to bookings created from part requests.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Request document sent to the scheduling engine on its standard input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(rename = "ScheduleId")]
    pub schedule_id: Option<ScheduleId>,
    #[serde(rename = "StartUTC")]
    pub start_utc: DateTime<Utc>,
    #[serde(rename = "EndUTC")]
    pub end_utc: DateTime<Utc>,
    #[serde(rename = "UnscheduledBookings")]
    pub unscheduled_bookings: Vec<Booking>,
    #[serde(rename = "ScheduledParts")]
    pub scheduled_parts: Vec<serde_json::Value>,
    #[serde(rename = "FlexPlan")]
    pub flex_plan: FlexPlan,
    #[serde(rename = "FillMethod")]
    pub fill_method: FillMethod,
    #[serde(
        rename = "Downtimes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub downtimes: Option<Vec<serde_json::Value>>,
}

/// The period the engine schedules into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(Error::InvalidInput(format!(
                "schedule window ends ({}) before it starts ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// The whole UTC day starting at midnight of `date`.
    pub fn day(date: NaiveDate) -> Self {
        let start = Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN));
        Self {
            start,
            end: start + TimeDelta::days(1),
        }
    }

    pub fn length(&self) -> TimeDelta {
        self.end - self.start
    }
}

impl Default for TimeWindow {
    /// 2016-11-05 01:00 UTC for 24 hours.
    fn default() -> Self {
        let start = Utc.with_ymd_and_hms(2016, 11, 5, 1, 0, 0).unwrap();
        Self {
            start,
            end: start + TimeDelta::days(1),
        }
    }
}

/// Builds a `ScheduleRequest` from flat inputs.
///
/// Parts requested through `add_part` become one booking each, numbered
/// `booking0`, `booking1`, ... in request order. Programs are matched to
/// those demands by part name when the request is built.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    flex_plan: FlexPlan,
    window: TimeWindow,
    fill_method: FillMethod,
    schedule_id: Option<ScheduleId>,
    due_date: Option<NaiveDate>,
    default_quantity: u32,
    priority: i32,
    programs: Vec<Program>,
    parts: Vec<(String, Option<u32>)>,
    bookings: Vec<Booking>,
    scheduled_parts: Vec<serde_json::Value>,
    downtimes: Option<Vec<serde_json::Value>>,
}

impl RequestBuilder {
    pub fn new(flex_plan: FlexPlan) -> Self {
        Self {
            flex_plan,
            window: TimeWindow::default(),
            fill_method: FillMethod::default(),
            schedule_id: None,
            due_date: None,
            default_quantity: DEFAULT_QUANTITY,
            priority: DEFAULT_PRIORITY,
            programs: Vec::new(),
            parts: Vec::new(),
            bookings: Vec::new(),
            scheduled_parts: Vec::new(),
            downtimes: None,
        }
    }

    pub fn window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn fill_method(mut self, fill_method: FillMethod) -> Self {
        self.fill_method = fill_method;
        self
    }

    pub fn schedule_id(mut self, id: Option<ScheduleId>) -> Self {
        self.schedule_id = id;
        self
    }

    /// Due date of bookings created from parts; today when unset.
    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn default_quantity(mut self, quantity: u32) -> Self {
        self.default_quantity = quantity;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn programs(mut self, programs: impl IntoIterator<Item = Program>) -> Self {
        self.programs.extend(programs);
        self
    }

    pub fn add_part(mut self, part: impl Into<String>, quantity: Option<u32>) -> Self {
        self.parts.push((part.into(), quantity));
        self
    }

    pub fn bookings(mut self, bookings: impl IntoIterator<Item = Booking>) -> Self {
        self.bookings.extend(bookings);
        self
    }

    pub fn scheduled_parts(mut self, parts: impl IntoIterator<Item = serde_json::Value>) -> Self {
        self.scheduled_parts.extend(parts);
        self
    }

    pub fn downtimes(mut self, downtimes: Vec<serde_json::Value>) -> Self {
        self.downtimes = Some(downtimes);
        self
    }

    fn programs_for(&self, part: &str) -> Option<Vec<ProgramForProcess>> {
        let progs: Vec<ProgramForProcess> = self
            .programs
            .iter()
            .filter(|p| p.part == part)
            .map(Program::for_process)
            .collect();
        if progs.is_empty() { None } else { Some(progs) }
    }

    pub fn build(self) -> Result<ScheduleRequest> {
        let due_date = self
            .due_date
            .unwrap_or_else(|| Utc::now().date_naive())
            .format("%Y-%m-%d")
            .to_string();

        let mut bookings = self.bookings.clone();
        for (idx, (part, quantity)) in self.parts.iter().enumerate() {
            let quantity = quantity.unwrap_or(self.default_quantity);
            if quantity == 0 {
                return Err(Error::InvalidInput(format!(
                    "quantity for part '{}' must be positive",
                    part
                )));
            }
            let booking_id = format!("booking{}", idx);
            bookings.push(Booking {
                booking_id: booking_id.clone(),
                due_date: due_date.clone(),
                priority: self.priority,
                parts: vec![BookingDemand {
                    booking_id,
                    part: part.clone(),
                    quantity,
                    programs: self.programs_for(part),
                }],
            });
        }

        Ok(ScheduleRequest {
            schedule_id: self.schedule_id,
            start_utc: self.window.start,
            end_utc: self.window.end,
            unscheduled_bookings: bookings,
            scheduled_parts: self.scheduled_parts,
            flex_plan: self.flex_plan,
            fill_method: self.fill_method,
            downtimes: self.downtimes,
        })
    }
}
