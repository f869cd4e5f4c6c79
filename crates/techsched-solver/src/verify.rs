//! Post-run verification
//!
//! Re-checks a finished outcome against its inputs: every task covered
//! exactly once, scheduled rows matching a task's duration and headcount,
//! no technician double-booked, and every assignment inside both the
//! workday and the technician's "Normal" window.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use techsched_core::{AvailabilityTable, Interval, ScheduleOutcome, SchedulerConfig, Task};
use thiserror::Error;

/// A broken scheduling property
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("Task '{machine}' on {date} appears in neither result list")]
    TaskNotCovered { date: NaiveDate, machine: String },

    #[error("Scheduled row '{machine}' on {date} matches no task with that duration and headcount")]
    UnmatchedScheduledRow { date: NaiveDate, machine: String },

    #[error("Unscheduled row '{machine}' on {date} matches no remaining task")]
    UnmatchedUnscheduledRow { date: NaiveDate, machine: String },

    #[error("Technician '{technician}' is double-booked: {first} overlaps {second}")]
    DoubleBooking {
        technician: String,
        first: Interval,
        second: Interval,
    },

    #[error("'{machine}' is scheduled at {interval}, outside the workday")]
    OutsideWorkday { machine: String, interval: Interval },

    #[error("Technician '{technician}' works '{machine}' at {interval}, outside their window")]
    OutsideAvailability {
        technician: String,
        machine: String,
        interval: Interval,
    },

    #[error("Technician '{technician}' works '{machine}' on {date} without a Normal day")]
    NotWorking {
        technician: String,
        machine: String,
        date: NaiveDate,
    },
}

/// Check `outcome` against the inputs it was produced from.
///
/// Returns every violation found; an empty list means the outcome is sound.
pub fn verify_outcome(
    outcome: &ScheduleOutcome,
    tasks: &[Task],
    availability: &AvailabilityTable,
    config: &SchedulerConfig,
) -> Vec<Violation> {
    let mut violations = check_coverage(outcome, tasks);
    violations.extend(check_double_booking(outcome));
    violations.extend(check_containment(outcome, availability, config));
    violations
}

fn check_coverage(outcome: &ScheduleOutcome, tasks: &[Task]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut remaining: Vec<Option<&Task>> = tasks.iter().map(Some).collect();

    for row in &outcome.scheduled {
        let duration = row.interval().duration();
        let found = remaining.iter_mut().find(|slot| {
            slot.is_some_and(|task| {
                task.date == row.date
                    && task.machine_name == row.machine
                    && task.duration() == duration
                    && task.people_required as usize == row.technicians.len()
            })
        });
        match found {
            Some(slot) => *slot = None,
            None => violations.push(Violation::UnmatchedScheduledRow {
                date: row.date,
                machine: row.machine.clone(),
            }),
        }
    }

    for row in &outcome.unscheduled {
        let found = remaining.iter_mut().find(|slot| {
            slot.is_some_and(|task| {
                task.date == row.date
                    && task.machine_name == row.machine
                    && task.people_required == row.people_required
                    && (task.hours_required == row.hours_required
                        || (task.hours_required.is_nan() && row.hours_required.is_nan()))
            })
        });
        match found {
            Some(slot) => *slot = None,
            None => violations.push(Violation::UnmatchedUnscheduledRow {
                date: row.date,
                machine: row.machine.clone(),
            }),
        }
    }

    violations.extend(remaining.into_iter().flatten().map(|task| Violation::TaskNotCovered {
        date: task.date,
        machine: task.machine_name.clone(),
    }));
    violations
}

fn check_double_booking(outcome: &ScheduleOutcome) -> Vec<Violation> {
    let mut booked: BTreeMap<&str, Vec<Interval>> = BTreeMap::new();
    for row in &outcome.scheduled {
        for name in &row.technicians {
            booked.entry(name.as_str()).or_default().push(row.interval());
        }
    }

    let mut violations = Vec::new();
    for (name, intervals) in booked {
        for (i, first) in intervals.iter().enumerate() {
            for second in &intervals[i + 1..] {
                if first.overlaps(second) {
                    violations.push(Violation::DoubleBooking {
                        technician: name.to_string(),
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
    }
    violations
}

fn check_containment(
    outcome: &ScheduleOutcome,
    availability: &AvailabilityTable,
    config: &SchedulerConfig,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for row in &outcome.scheduled {
        let interval = row.interval();
        if !config.workday_on(row.date).contains(&interval) {
            violations.push(Violation::OutsideWorkday {
                machine: row.machine.clone(),
                interval,
            });
        }

        for name in &row.technicians {
            match availability.get(name, row.date.weekday()) {
                Some(day) if !day.is_working() => violations.push(Violation::NotWorking {
                    technician: name.clone(),
                    machine: row.machine.clone(),
                    date: row.date,
                }),
                Some(day) if !day.window_on(row.date).contains(&interval) => {
                    violations.push(Violation::OutsideAvailability {
                        technician: name.clone(),
                        machine: row.machine.clone(),
                        interval,
                    });
                }
                Some(_) => {}
                None => violations.push(Violation::NotWorking {
                    technician: name.clone(),
                    machine: row.machine.clone(),
                    date: row.date,
                }),
            }
        }
    }
    violations
}
