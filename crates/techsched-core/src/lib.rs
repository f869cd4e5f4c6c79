//! # techsched-core
//!
//! Core domain model and traits for the techsched scheduling engine.
//!
//! This crate provides:
//! - Domain types: `Task`, `Technician`, `Interval`, `AvailabilityTable`
//! - Result types: `ScheduleRow`, `UnscheduledRow`, `ScheduleOutcome`
//! - Core traits: `Scheduler`, `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::{NaiveDate, NaiveTime};
//! use techsched_core::{DayAvailability, Technician};
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let shift = DayAvailability::normal(
//!     NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
//!     NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
//! );
//!
//! let mut tech = Technician::new("alice");
//! let start = monday.and_hms_opt(8, 0, 0).unwrap();
//! let end = monday.and_hms_opt(12, 0, 0).unwrap();
//!
//! assert!(tech.is_available(start, end, Some(&shift)));
//! tech.assign(start, end);
//! assert!(!tech.is_available(start, end, Some(&shift)));
//! ```

pub mod availability;

pub use availability::{
    build_table, parse_time, parse_weekday, AvailabilityTable, AvailabilityTableBuilder,
    DayAvailability, RawAvailability, NORMAL_STATUS,
};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason recorded when the slot search exhausts the workday
pub const NO_SLOT_REASON: &str = "Could not find an available time slot with enough technicians.";

/// Reason recorded for tasks that break the `Task` contract
pub const INVALID_TASK_REASON: &str = "Task has a non-positive duration or headcount.";

// Oversized durations saturate here; nothing this long fits in a workday.
const MAX_TASK_MICROS: f64 = 7.0 * 24.0 * 3600.0 * 1e6;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

// ============================================================================
// Task
// ============================================================================

/// One unit of work on a machine, to be placed on its date
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Calendar date the work must happen on
    pub date: NaiveDate,
    /// Machine identifier (not unique)
    pub machine_name: String,
    /// Duration in hours
    pub hours_required: f64,
    /// Technicians needed simultaneously for the whole duration
    pub people_required: u32,
}

impl Task {
    pub fn new(
        date: NaiveDate,
        machine_name: impl Into<String>,
        hours_required: f64,
        people_required: u32,
    ) -> Self {
        Self {
            date,
            machine_name: machine_name.into(),
            hours_required,
            people_required,
        }
    }

    pub fn update_hours(&mut self, hours: f64) {
        self.hours_required = hours;
    }

    pub fn update_people(&mut self, people: u32) {
        self.people_required = people;
    }

    pub fn change_machine(&mut self, machine_name: impl Into<String>) {
        self.machine_name = machine_name.into();
    }

    pub fn reschedule(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Weekday of the task's date
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Required duration, to the microsecond.
    ///
    /// Non-finite or negative hours yield zero; absurdly large values
    /// saturate at one week.
    pub fn duration(&self) -> chrono::Duration {
        let micros = (self.hours_required * MICROS_PER_HOUR).round();
        if !micros.is_finite() {
            return chrono::Duration::zero();
        }
        chrono::Duration::microseconds(micros.clamp(0.0, MAX_TASK_MICROS) as i64)
    }

    /// True when the task has a positive duration and headcount
    pub fn is_well_formed(&self) -> bool {
        self.people_required > 0 && self.hours_required.is_finite() && self.hours_required > 0.0
    }
}

// Intra-day spans never overflow i64 microseconds.
fn hours_of(duration: chrono::Duration) -> f64 {
    duration.num_microseconds().unwrap_or(i64::MAX) as f64 / MICROS_PER_HOUR
}

/// Parse a task date.
///
/// Accepts `YYYY-MM-DD`, or a date-time string whose date part is kept.
pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }
    Err(ParseError::InvalidDate(value.to_string()))
}

// ============================================================================
// Interval
// ============================================================================

/// Half-open `[start, end)` span of wall-clock time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Open-interval overlap: `max(a, c) < min(b, d)`
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    /// True when `other` lies entirely inside this interval
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.start.format("%Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

// ============================================================================
// Technician
// ============================================================================

/// A technician and the intervals already committed to them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    /// Unique name across the pool
    pub name: String,
    /// Committed intervals, in insertion order
    busy: Vec<Interval>,
}

impl Technician {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            busy: Vec::new(),
        }
    }

    /// Check whether `[start, end)` can be given to this technician.
    ///
    /// Requires a "Normal" day entry whose window (taken on `start`'s
    /// date) contains the interval, and no overlap with any committed
    /// interval. Has no side effects.
    pub fn is_available(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        day: Option<&DayAvailability>,
    ) -> bool {
        let Some(day) = day else {
            return false;
        };
        if !day.is_working() {
            return false;
        }

        let requested = Interval::new(start, end);
        if !day.window_on(start.date()).contains(&requested) {
            return false;
        }

        !self.busy.iter().any(|busy| busy.overlaps(&requested))
    }

    /// Commit `[start, end)`.
    ///
    /// No re-validation: callers check `is_available` immediately before.
    pub fn assign(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
        self.busy.push(Interval::new(start, end));
    }

    pub fn busy_intervals(&self) -> &[Interval] {
        &self.busy
    }

    /// Total committed time in hours
    pub fn committed_hours(&self) -> f64 {
        self.busy
            .iter()
            .map(|interval| hours_of(interval.duration()))
            .sum()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Workday bounds and search granularity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Hour the search starts at (inclusive)
    pub workday_start_hour: u32,
    /// Hour every task must be finished by
    pub workday_end_hour: u32,
    /// Step between candidate start times
    pub slot_interval_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workday_start_hour: 8,
            workday_end_hour: 17,
            slot_interval_minutes: 15,
        }
    }
}

impl SchedulerConfig {
    pub fn workday(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.workday_start_hour = start_hour;
        self.workday_end_hour = end_hour;
        self
    }

    pub fn slot_interval(mut self, minutes: u32) -> Self {
        self.slot_interval_minutes = minutes;
        self
    }

    /// Reject bounds that cannot describe an intra-day workday
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workday_end_hour > 23 || self.workday_start_hour >= self.workday_end_hour {
            return Err(ConfigError::InvalidWorkday {
                start: self.workday_start_hour,
                end: self.workday_end_hour,
            });
        }
        if self.slot_interval_minutes == 0 {
            return Err(ConfigError::InvalidInterval(self.slot_interval_minutes));
        }
        Ok(())
    }

    pub fn day_start(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + chrono::Duration::hours(i64::from(self.workday_start_hour))
    }

    pub fn day_end(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + chrono::Duration::hours(i64::from(self.workday_end_hour))
    }

    /// The configured workday on `date`
    pub fn workday_on(&self, date: NaiveDate) -> Interval {
        Interval::new(self.day_start(date), self.day_end(date))
    }

    pub fn slot_step(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.slot_interval_minutes))
    }
}

// ============================================================================
// Schedule (Result)
// ============================================================================

/// A task placed on the timeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub machine: String,
    /// Assigned technicians, in on-duty order
    pub technicians: Vec<String>,
}

impl ScheduleRow {
    pub fn interval(&self) -> Interval {
        Interval::new(self.date.and_time(self.start), self.date.and_time(self.end))
    }

    pub fn hours(&self) -> f64 {
        hours_of(self.interval().duration())
    }
}

/// A task that could not be placed, with the reason
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnscheduledRow {
    pub date: NaiveDate,
    pub machine: String,
    pub hours_required: f64,
    pub people_required: u32,
    pub reason: String,
}

impl UnscheduledRow {
    pub fn from_task(task: &Task, reason: impl Into<String>) -> Self {
        Self {
            date: task.date,
            machine: task.machine_name.clone(),
            hours_required: task.hours_required,
            people_required: task.people_required,
            reason: reason.into(),
        }
    }
}

/// Everything a scheduling run produces, in processing order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub scheduled: Vec<ScheduleRow>,
    pub unscheduled: Vec<UnscheduledRow>,
    /// Final state of the run's technician pool
    pub technicians: Vec<Technician>,
}

impl ScheduleOutcome {
    /// True when every task was placed
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.scheduled.len() + self.unscheduled.len()
    }

    pub fn technician(&self, name: &str) -> Option<&Technician> {
        self.technicians.iter().find(|t| t.name == name)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            scheduled_tasks: self.scheduled.len(),
            unscheduled_tasks: self.unscheduled.len(),
            technician_hours: self
                .scheduled
                .iter()
                .map(|row| row.hours() * row.technicians.len() as f64)
                .sum(),
            workload: self
                .technicians
                .iter()
                .map(|t| (t.name.clone(), t.committed_hours()))
                .collect(),
        }
    }
}

/// Aggregate figures for a finished run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub scheduled_tasks: usize,
    pub unscheduled_tasks: usize,
    /// Sum of duration × headcount over scheduled tasks
    pub technician_hours: f64,
    /// Committed hours per technician, in pool order
    pub workload: Vec<(String, f64)>,
}

// ============================================================================
// Traits
// ============================================================================

/// Core scheduling abstraction
pub trait Scheduler {
    /// Place every task, producing exactly one row per task
    fn schedule(&self, tasks: &[Task], availability: &AvailabilityTable) -> ScheduleOutcome;
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a finished run to the output format
    fn render(&self, outcome: &ScheduleOutcome) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Input parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid {field} for technician '{technician}': {value:?} is not a time of day")]
    InvalidTime {
        technician: String,
        field: &'static str,
        value: String,
    },

    #[error("Invalid day of week for technician '{technician}': {value:?}")]
    InvalidWeekday { technician: String, value: String },

    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid workday {start}:00-{end}:00: start must precede end and end must be at most 23")]
    InvalidWorkday { start: u32, end: u32 },

    #[error("Invalid slot search interval: {0} minutes")]
    InvalidInterval(u32),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

// ============================================================================
// Tests
// ============================================================================
