//! # techsched-solver
//!
//! Day-partitioned greedy slot assignment.
//!
//! This crate provides:
//! - `DailyScheduler`: groups tasks by date, orders each day by headcount and
//!   places every task in the first window with enough free technicians
//! - First-fit slot search over stepped candidate windows
//! - Post-run verification of a finished outcome
//!
//! ## Algorithm
//!
//! 1. Group tasks by calendar date; dates are processed in ascending order.
//! 2. The day's on-duty pool is every technician with any availability entry
//!    for the weekday. Status and window are checked per candidate window.
//! 3. Tasks are stable-sorted by descending `people_required`.
//! 4. Each task takes the first window where enough technicians are free,
//!    commits it, and is never revisited. Tasks that find nothing are
//!    reported as unscheduled.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{NaiveDate, NaiveTime, Weekday};
//! use techsched_core::{AvailabilityTable, DayAvailability, SchedulerConfig, Task};
//! use techsched_solver::DailyScheduler;
//!
//! let shift = DayAvailability::normal(
//!     NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
//!     NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
//! );
//! let table = AvailabilityTable::new()
//!     .with_entry("alice", Weekday::Mon, shift.clone())
//!     .with_entry("bob", Weekday::Mon, shift);
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let tasks = vec![Task::new(monday, "press-1", 4.0, 2)];
//!
//! let scheduler = DailyScheduler::new(SchedulerConfig::default()).unwrap();
//! let outcome = scheduler.run(&tasks, &table);
//! assert_eq!(outcome.scheduled[0].technicians, vec!["alice", "bob"]);
//! ```

pub mod slot;
pub mod verify;

pub use slot::{candidate_windows, find_first_fit, CandidateWindows, OnDuty, SlotMatch};
pub use verify::{verify_outcome, Violation};

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use techsched_core::{
    AvailabilityTable, ConfigError, ScheduleOutcome, ScheduleRow, Scheduler, SchedulerConfig,
    Task, Technician, UnscheduledRow, INVALID_TASK_REASON, NO_SLOT_REASON,
};
use tracing::{debug, trace, warn};

/// Greedy first-fit scheduler, one calendar day at a time
#[derive(Clone, Debug, Default)]
pub struct DailyScheduler {
    config: SchedulerConfig,
}

impl DailyScheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Place every task against a fresh technician pool.
    ///
    /// Each task ends up in exactly one of `scheduled` / `unscheduled`.
    /// The pool (one technician per table entry, in table order) is owned by
    /// this run and returned in the outcome.
    pub fn run(&self, tasks: &[Task], availability: &AvailabilityTable) -> ScheduleOutcome {
        let mut technicians: Vec<Technician> =
            availability.technicians().map(Technician::new).collect();
        let mut outcome = ScheduleOutcome::default();

        for (date, mut day_tasks) in group_by_date(tasks) {
            order_by_headcount(&mut day_tasks);
            self.schedule_day(date, &day_tasks, availability, &mut technicians, &mut outcome);
        }

        debug!(
            scheduled = outcome.scheduled.len(),
            unscheduled = outcome.unscheduled.len(),
            "scheduling run finished"
        );
        outcome.technicians = technicians;
        outcome
    }

    fn schedule_day(
        &self,
        date: NaiveDate,
        tasks: &[&Task],
        availability: &AvailabilityTable,
        technicians: &mut [Technician],
        outcome: &mut ScheduleOutcome,
    ) {
        let weekday = date.weekday();
        let on_duty: Vec<OnDuty<'_>> = technicians
            .iter()
            .enumerate()
            .filter_map(|(index, tech)| {
                availability
                    .get(&tech.name, weekday)
                    .map(|day| OnDuty { index, day })
            })
            .collect();

        debug!(%date, %weekday, on_duty = on_duty.len(), tasks = tasks.len(), "scheduling day");

        for &task in tasks {
            if !task.is_well_formed() {
                warn!(
                    %date,
                    machine = %task.machine_name,
                    hours = task.hours_required,
                    people = task.people_required,
                    "task has a non-positive duration or headcount"
                );
                outcome
                    .unscheduled
                    .push(UnscheduledRow::from_task(task, INVALID_TASK_REASON));
                continue;
            }

            match find_first_fit(task, &self.config, &on_duty, technicians) {
                Some(slot) => {
                    for &index in &slot.team {
                        technicians[index].assign(slot.window.start, slot.window.end);
                    }
                    let team: Vec<String> = slot
                        .team
                        .iter()
                        .map(|&index| technicians[index].name.clone())
                        .collect();
                    trace!(machine = %task.machine_name, window = %slot.window, ?team, "task placed");

                    outcome.scheduled.push(ScheduleRow {
                        date: task.date,
                        start: slot.window.start.time(),
                        end: slot.window.end.time(),
                        machine: task.machine_name.clone(),
                        technicians: team,
                    });
                }
                None => {
                    debug!(
                        %date,
                        machine = %task.machine_name,
                        people = task.people_required,
                        "no window with enough technicians"
                    );
                    outcome
                        .unscheduled
                        .push(UnscheduledRow::from_task(task, NO_SLOT_REASON));
                }
            }
        }
    }
}

impl Scheduler for DailyScheduler {
    fn schedule(&self, tasks: &[Task], availability: &AvailabilityTable) -> ScheduleOutcome {
        self.run(tasks, availability)
    }
}

/// Bucket tasks by date, keeping input order inside each bucket
pub fn group_by_date(tasks: &[Task]) -> BTreeMap<NaiveDate, Vec<&Task>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        by_date.entry(task.date).or_default().push(task);
    }
    by_date
}

/// Highest headcount first; ties keep their relative order
pub fn order_by_headcount(tasks: &mut [&Task]) {
    tasks.sort_by_key(|task| Reverse(task.people_required));
}
