//! # techsched-render
//!
//! Rendering backends for techsched scheduling runs.
//!
//! This crate provides:
//! - Plain-text tables (terminal output)
//! - JSON documents (machine-readable output)
//! - Excel workbooks, one for scheduled and one for unscheduled tasks
//!
//! ## Example
//!
//! ```rust,ignore
//! use techsched_core::Renderer;
//! use techsched_render::{ExcelRenderer, JsonRenderer, TextRenderer};
//!
//! let text = TextRenderer::new().render(&outcome)?;
//! println!("{text}");
//!
//! let json = JsonRenderer::new().pretty().render(&outcome)?;
//!
//! let report = ExcelRenderer::new().render(&outcome)?;
//! report.write_to(std::path::Path::new("output"))?;
//! ```

pub mod excel;
pub mod json;

pub use excel::{ExcelRenderer, ExcelReport, SCHEDULED_FILE_NAME, UNSCHEDULED_FILE_NAME};
pub use json::JsonRenderer;

use techsched_core::{RenderError, Renderer, ScheduleOutcome};

/// Column headers of the scheduled-task table
pub const SCHEDULED_HEADERS: [&str; 5] =
    ["Date", "Start Time", "End Time", "Machine", "Assigned Technicians"];

/// Column headers of the unscheduled-task table
pub const UNSCHEDULED_HEADERS: [&str; 5] =
    ["Date", "Machine Name", "Hours Required", "People Required", "Reason"];

/// Plain-text table renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Append a one-line summary after the tables
    pub show_summary: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit the trailing summary line
    pub fn no_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, outcome: &ScheduleOutcome) -> Result<String, RenderError> {
        let mut out = String::new();

        out.push_str(&format!("Scheduled tasks ({})\n", outcome.scheduled.len()));
        let scheduled: Vec<Vec<String>> = outcome.scheduled.iter().map(scheduled_cells).collect();
        out.push_str(&text_table(&SCHEDULED_HEADERS, &scheduled));

        out.push('\n');
        out.push_str(&format!("Unscheduled tasks ({})\n", outcome.unscheduled.len()));
        let unscheduled: Vec<Vec<String>> =
            outcome.unscheduled.iter().map(unscheduled_cells).collect();
        out.push_str(&text_table(&UNSCHEDULED_HEADERS, &unscheduled));

        if self.show_summary {
            let summary = outcome.summary();
            out.push('\n');
            out.push_str(&format!(
                "{} scheduled, {} unscheduled, {} technician-hours assigned\n",
                summary.scheduled_tasks, summary.unscheduled_tasks, summary.technician_hours
            ));
        }

        Ok(out)
    }
}

/// Cells of a scheduled row, in `SCHEDULED_HEADERS` order
pub fn scheduled_cells(row: &techsched_core::ScheduleRow) -> Vec<String> {
    vec![
        row.date.format("%Y-%m-%d").to_string(),
        row.start.format("%H:%M").to_string(),
        row.end.format("%H:%M").to_string(),
        row.machine.clone(),
        row.technicians.join(", "),
    ]
}

/// Cells of an unscheduled row, in `UNSCHEDULED_HEADERS` order
pub fn unscheduled_cells(row: &techsched_core::UnscheduledRow) -> Vec<String> {
    vec![
        row.date.format("%Y-%m-%d").to_string(),
        row.machine.clone(),
        row.hours_required.to_string(),
        row.people_required.to_string(),
        row.reason.clone(),
    ]
}

fn text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "  (none)\n".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
