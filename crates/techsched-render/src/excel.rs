//! Excel report renderer
//!
//! Produces two XLSX workbooks:
//! - `scheduled_tasks.xlsx`: Date, Start Time, End Time, Machine,
//!   Assigned Technicians
//! - `unscheduled_tasks.xlsx`: Date, Machine Name, Hours Required,
//!   People Required, Reason
//!
//! A workbook is only produced when its list is non-empty, so an
//! all-scheduled run leaves no unscheduled file behind.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use techsched_core::{RenderError, Renderer, ScheduleOutcome, ScheduleRow, UnscheduledRow};

use crate::{scheduled_cells, SCHEDULED_HEADERS, UNSCHEDULED_HEADERS};

/// File name of the scheduled-task workbook
pub const SCHEDULED_FILE_NAME: &str = "scheduled_tasks.xlsx";

/// File name of the unscheduled-task workbook
pub const UNSCHEDULED_FILE_NAME: &str = "unscheduled_tasks.xlsx";

/// Excel workbook renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Header background color (RGB)
    pub header_color: u32,
    /// Freeze the header row
    pub freeze_header: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            header_color: 0x4472C4,
            freeze_header: true,
        }
    }
}

/// Workbook bytes produced by one render
#[derive(Clone, Debug, Default)]
pub struct ExcelReport {
    pub scheduled: Option<Vec<u8>>,
    pub unscheduled: Option<Vec<u8>>,
}

impl ExcelReport {
    /// Write the produced workbooks into `dir`, creating it if needed.
    ///
    /// Returns the paths written.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for (bytes, name) in [
            (&self.scheduled, SCHEDULED_FILE_NAME),
            (&self.unscheduled, UNSCHEDULED_FILE_NAME),
        ] {
            if let Some(bytes) = bytes {
                let path = dir.join(name);
                std::fs::write(&path, bytes)?;
                written.push(path);
            }
        }
        Ok(written)
    }
}

struct Formats {
    header: Format,
    text: Format,
    number: Format,
    integer: Format,
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header background color
    pub fn header_color(mut self, rgb: u32) -> Self {
        self.header_color = rgb;
        self
    }

    /// Workbook for the scheduled rows
    pub fn scheduled_workbook(&self, rows: &[ScheduleRow]) -> Result<Vec<u8>, RenderError> {
        let formats = self.create_formats();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Schedule")
            .map_err(|e| RenderError::Format(e.to_string()))?;
        self.write_headers(sheet, &SCHEDULED_HEADERS, &formats)?;

        for (index, row) in rows.iter().enumerate() {
            let line = index as u32 + 1;
            for (col, cell) in scheduled_cells(row).iter().enumerate() {
                sheet
                    .write_with_format(line, col as u16, cell, &formats.text)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
            }
        }

        sheet.set_column_width(0, 12).ok();
        sheet.set_column_width(1, 11).ok();
        sheet.set_column_width(2, 11).ok();
        sheet.set_column_width(3, 20).ok();
        sheet.set_column_width(4, 40).ok();

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Workbook for the unscheduled rows
    pub fn unscheduled_workbook(&self, rows: &[UnscheduledRow]) -> Result<Vec<u8>, RenderError> {
        let formats = self.create_formats();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Unscheduled")
            .map_err(|e| RenderError::Format(e.to_string()))?;
        self.write_headers(sheet, &UNSCHEDULED_HEADERS, &formats)?;

        for (index, row) in rows.iter().enumerate() {
            let line = index as u32 + 1;
            sheet
                .write_with_format(line, 0, row.date.format("%Y-%m-%d").to_string(), &formats.text)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(line, 1, &row.machine, &formats.text)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(line, 2, row.hours_required, &formats.number)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(line, 3, f64::from(row.people_required), &formats.integer)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(line, 4, &row.reason, &formats.text)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        sheet.set_column_width(0, 12).ok();
        sheet.set_column_width(1, 20).ok();
        sheet.set_column_width(2, 15).ok();
        sheet.set_column_width(3, 15).ok();
        sheet.set_column_width(4, 60).ok();

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    fn write_headers(
        &self,
        sheet: &mut Worksheet,
        headers: &[&str],
        formats: &Formats,
    ) -> Result<(), RenderError> {
        for (col, header) in headers.iter().enumerate() {
            sheet
                .write_with_format(0, col as u16, *header, &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }
        if self.freeze_header {
            sheet.set_freeze_panes(1, 0).ok();
        }
        Ok(())
    }

    fn create_formats(&self) -> Formats {
        Formats {
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(self.header_color)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            text: Format::new().set_border(FormatBorder::Thin),
            number: Format::new()
                .set_num_format("0.00")
                .set_border(FormatBorder::Thin),
            integer: Format::new()
                .set_num_format("0")
                .set_border(FormatBorder::Thin),
        }
    }
}

impl Renderer for ExcelRenderer {
    type Output = ExcelReport;

    fn render(&self, outcome: &ScheduleOutcome) -> Result<ExcelReport, RenderError> {
        let scheduled = if outcome.scheduled.is_empty() {
            None
        } else {
            Some(self.scheduled_workbook(&outcome.scheduled)?)
        };
        let unscheduled = if outcome.unscheduled.is_empty() {
            None
        } else {
            Some(self.unscheduled_workbook(&outcome.unscheduled)?)
        };
        Ok(ExcelReport {
            scheduled,
            unscheduled,
        })
    }
}
