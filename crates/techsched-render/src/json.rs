//! JSON renderer
//!
//! Emits both result lists plus the run summary:
//!
//! ```text
//! {
//!   "scheduled": [
//!     { "date": "2025-03-03", "start_time": "08:00", "end_time": "12:00",
//!       "machine": "press-1", "assigned_technicians": "alice, bob" }
//!   ],
//!   "unscheduled": [
//!     { "date": "2025-03-03", "machine_name": "crane", "hours_required": 1.0,
//!       "people_required": 3, "reason": "..." }
//!   ],
//!   "summary": { ... }
//! }
//! ```

use serde::Serialize;
use techsched_core::{
    RenderError, Renderer, RunSummary, ScheduleOutcome, ScheduleRow, UnscheduledRow,
};

/// JSON document renderer
#[derive(Clone, Debug, Default)]
pub struct JsonRenderer {
    /// Indent the output
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

#[derive(Serialize)]
struct Document<'a> {
    scheduled: Vec<ScheduledRecord<'a>>,
    unscheduled: Vec<UnscheduledRecord<'a>>,
    summary: RunSummary,
}

#[derive(Serialize)]
struct ScheduledRecord<'a> {
    date: String,
    start_time: String,
    end_time: String,
    machine: &'a str,
    assigned_technicians: String,
}

impl<'a> From<&'a ScheduleRow> for ScheduledRecord<'a> {
    fn from(row: &'a ScheduleRow) -> Self {
        Self {
            date: row.date.format("%Y-%m-%d").to_string(),
            start_time: row.start.format("%H:%M").to_string(),
            end_time: row.end.format("%H:%M").to_string(),
            machine: &row.machine,
            assigned_technicians: row.technicians.join(", "),
        }
    }
}

#[derive(Serialize)]
struct UnscheduledRecord<'a> {
    date: String,
    machine_name: &'a str,
    hours_required: f64,
    people_required: u32,
    reason: &'a str,
}

impl<'a> From<&'a UnscheduledRow> for UnscheduledRecord<'a> {
    fn from(row: &'a UnscheduledRow) -> Self {
        Self {
            date: row.date.format("%Y-%m-%d").to_string(),
            machine_name: &row.machine,
            hours_required: row.hours_required,
            people_required: row.people_required,
            reason: &row.reason,
        }
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, outcome: &ScheduleOutcome) -> Result<String, RenderError> {
        let document = Document {
            scheduled: outcome.scheduled.iter().map(ScheduledRecord::from).collect(),
            unscheduled: outcome.unscheduled.iter().map(UnscheduledRecord::from).collect(),
            summary: outcome.summary(),
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        rendered.map_err(|e| RenderError::Format(e.to_string()))
    }
}
