//! Technician availability table
//!
//! Maps technician → weekday → working window and status. Built once per run
//! from raw per-technician-per-day rows and read-only afterwards.
//!
//! Only the literal status `"Normal"` denotes a working day. Any other
//! status (vacation, sick, ...) keeps the technician off the timeline for
//! that weekday even though the entry still places them in the day's
//! on-duty pool.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::{Interval, ParseError};

/// The only status that lets a technician work
pub const NORMAL_STATUS: &str = "Normal";

/// Looser forms tried after strict `HH:MM:SS`; only the time-of-day is kept
const LOOSE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// One technician's working window and status for a weekday
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub status: String,
}

impl DayAvailability {
    pub fn new(start: NaiveTime, end: NaiveTime, status: impl Into<String>) -> Self {
        Self {
            start,
            end,
            status: status.into(),
        }
    }

    /// A working day with the given window
    pub fn normal(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(start, end, NORMAL_STATUS)
    }

    pub fn is_working(&self) -> bool {
        self.status == NORMAL_STATUS
    }

    /// The window as an interval on a calendar date
    pub fn window_on(&self, date: NaiveDate) -> Interval {
        Interval::new(date.and_time(self.start), date.and_time(self.end))
    }
}

/// An availability row as delivered by the loader, before parsing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAvailability {
    #[serde(alias = "Technician Name")]
    pub technician: String,
    #[serde(alias = "Day of Week")]
    pub day_of_week: String,
    #[serde(alias = "Available Start")]
    pub available_start: String,
    #[serde(alias = "Available End")]
    pub available_end: String,
    #[serde(alias = "Status")]
    pub status: String,
}

impl RawAvailability {
    pub fn new(
        technician: impl Into<String>,
        day_of_week: impl Into<String>,
        available_start: impl Into<String>,
        available_end: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            technician: technician.into(),
            day_of_week: day_of_week.into(),
            available_start: available_start.into(),
            available_end: available_end.into(),
            status: status.into(),
        }
    }
}

/// Technician → weekday → availability.
///
/// Technicians iterate in the order they first appeared in the source rows.
/// That order decides which of several interchangeable technicians a task
/// receives, so it is never re-sorted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AvailabilityTable {
    order: Vec<String>,
    entries: HashMap<String, HashMap<Weekday, DayAvailability>>,
}

impl AvailabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used when assembling a table by hand
    pub fn with_entry(
        mut self,
        technician: impl Into<String>,
        weekday: Weekday,
        day: DayAvailability,
    ) -> Self {
        self.insert(technician.into(), weekday, day);
        self
    }

    /// Insert or replace an entry. A replaced entry keeps the technician's
    /// original position.
    pub fn insert(&mut self, technician: String, weekday: Weekday, day: DayAvailability) {
        if !self.entries.contains_key(&technician) {
            self.order.push(technician.clone());
        }
        self.entries.entry(technician).or_default().insert(weekday, day);
    }

    pub fn get(&self, technician: &str, weekday: Weekday) -> Option<&DayAvailability> {
        self.entries.get(technician)?.get(&weekday)
    }

    /// Technician names in source order
    pub fn technicians(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Technicians with any entry for `weekday`, whatever its status
    pub fn on_duty(&self, weekday: Weekday) -> Vec<&str> {
        self.technicians()
            .filter(|name| self.get(name, weekday).is_some())
            .collect()
    }

    /// Number of technicians
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Incremental table construction from raw rows
#[derive(Debug, Default)]
pub struct AvailabilityTableBuilder {
    table: AvailabilityTable,
}

impl AvailabilityTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and insert one row. The last row for a (technician, weekday)
    /// pair wins.
    pub fn add(&mut self, row: &RawAvailability) -> Result<&mut Self, ParseError> {
        let weekday =
            parse_weekday(&row.day_of_week).ok_or_else(|| ParseError::InvalidWeekday {
                technician: row.technician.clone(),
                value: row.day_of_week.clone(),
            })?;
        let start = parse_time(&row.available_start).ok_or_else(|| ParseError::InvalidTime {
            technician: row.technician.clone(),
            field: "available start",
            value: row.available_start.clone(),
        })?;
        let end = parse_time(&row.available_end).ok_or_else(|| ParseError::InvalidTime {
            technician: row.technician.clone(),
            field: "available end",
            value: row.available_end.clone(),
        })?;

        self.table.insert(
            row.technician.clone(),
            weekday,
            DayAvailability::new(start, end, row.status.clone()),
        );
        Ok(self)
    }

    pub fn build(self) -> AvailabilityTable {
        self.table
    }
}

/// Build a table from raw rows, failing on the first malformed one
pub fn build_table<'a>(
    rows: impl IntoIterator<Item = &'a RawAvailability>,
) -> Result<AvailabilityTable, ParseError> {
    let mut builder = AvailabilityTableBuilder::new();
    for row in rows {
        builder.add(row)?;
    }
    Ok(builder.build())
}

/// Parse a wall-clock time.
///
/// Strict `HH:MM:SS` first, then date-time strings (time-of-day kept),
/// then `HH:MM`, then 12-hour forms such as `8AM`, `5 PM` or `5:30 pm`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M:%S") {
        return Some(time);
    }
    for format in LOOSE_DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.time());
        }
    }
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
        .or_else(|| parse_twelve_hour(value))
}

fn parse_twelve_hour(value: &str) -> Option<NaiveTime> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    let (clock, meridiem) = ["AM", "PM"]
        .into_iter()
        .find_map(|suffix| compact.strip_suffix(suffix).map(|clock| (clock, suffix)))?;

    // chrono needs a minute field to build a time
    let clock = if clock.contains(':') {
        clock.to_string()
    } else {
        format!("{clock}:00")
    };
    NaiveTime::parse_from_str(&format!("{clock} {meridiem}"), "%I:%M %p").ok()
}

/// Parse an English weekday name, full or abbreviated, any case
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    value.trim().parse().ok()
}
