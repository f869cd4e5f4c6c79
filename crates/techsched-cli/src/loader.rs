//! JSON input loading
//!
//! Tasks arrive as an array of objects with a string `date`. Rows whose
//! date is missing or unparseable are skipped and reported; everything
//! else in the file must be well-formed. Technician rows are raw
//! availability records turned into an `AvailabilityTable`; rows naming
//! no known weekday can never match a task date and are dropped with a
//! warning.
//!
//! Both files also accept the spreadsheet column headers as keys
//! ("Date", "Machine Name", "Technician Name", ...).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use techsched_core::{
    build_table, parse_date, parse_weekday, AvailabilityTable, RawAvailability, Task,
};

#[derive(Debug, Deserialize)]
struct TaskRecord {
    #[serde(default, alias = "Date")]
    date: Option<String>,
    #[serde(alias = "Machine Name")]
    machine_name: String,
    #[serde(alias = "Hours Required")]
    hours_required: f64,
    #[serde(alias = "People Required")]
    people_required: u32,
}

/// A task row left out because its date could not be read
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedTask {
    /// Zero-based position in the source array
    pub row: usize,
    pub machine_name: String,
    pub date: Option<String>,
}

impl std::fmt::Display for SkippedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.date {
            Some(date) => write!(f, "row {} ({}): invalid date {:?}", self.row, self.machine_name, date),
            None => write!(f, "row {} ({}): missing date", self.row, self.machine_name),
        }
    }
}

/// Tasks read from one file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    pub skipped: Vec<SkippedTask>,
}

pub fn parse_tasks(source: &str) -> Result<LoadedTasks> {
    let records: Vec<TaskRecord> =
        serde_json::from_str(source).context("tasks must be a JSON array of task objects")?;

    let mut loaded = LoadedTasks::default();
    for (row, record) in records.into_iter().enumerate() {
        let date = record.date.as_deref().map(parse_date);
        match date {
            Some(Ok(date)) => loaded.tasks.push(Task::new(
                date,
                record.machine_name,
                record.hours_required,
                record.people_required,
            )),
            _ => loaded.skipped.push(SkippedTask {
                row,
                machine_name: record.machine_name,
                date: record.date,
            }),
        }
    }
    Ok(loaded)
}

pub fn load_tasks(path: &Path) -> Result<LoadedTasks> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tasks file {}", path.display()))?;
    let loaded = parse_tasks(&source).with_context(|| format!("in {}", path.display()))?;

    for skipped in &loaded.skipped {
        tracing::warn!(file = %path.display(), "skipping task {skipped}");
    }
    tracing::info!(
        file = %path.display(),
        tasks = loaded.tasks.len(),
        skipped = loaded.skipped.len(),
        "loaded tasks"
    );
    Ok(loaded)
}

pub fn parse_technicians(source: &str) -> Result<AvailabilityTable> {
    let rows: Vec<RawAvailability> = serde_json::from_str(source)
        .context("technicians must be a JSON array of availability rows")?;
    let known = rows.iter().filter(|row| {
        let known = parse_weekday(&row.day_of_week).is_some();
        if !known {
            tracing::warn!(
                technician = %row.technician,
                "skipping availability row with unknown day of week {:?}",
                row.day_of_week
            );
        }
        known
    });
    let table = build_table(known)?;
    Ok(table)
}

pub fn load_technicians(path: &Path) -> Result<AvailabilityTable> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read technicians file {}", path.display()))?;
    let table = parse_technicians(&source).with_context(|| format!("in {}", path.display()))?;

    tracing::info!(file = %path.display(), technicians = table.len(), "loaded availability");
    Ok(table)
}
