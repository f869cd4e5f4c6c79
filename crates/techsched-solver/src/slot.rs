//! First-fit slot search
//!
//! Candidate windows start at the workday start and advance by the configured
//! step while a full-duration window still ends by close of day. The first
//! window where enough on-duty technicians pass the availability check wins;
//! later windows are never compared against it.

use chrono::{Duration, NaiveDateTime};
use techsched_core::{DayAvailability, Interval, SchedulerConfig, Task, Technician};

/// An on-duty technician: index into the run's pool plus that day's entry
#[derive(Clone, Copy, Debug)]
pub struct OnDuty<'a> {
    pub index: usize,
    pub day: &'a DayAvailability,
}

/// The window and team chosen for a task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotMatch {
    pub window: Interval,
    /// Pool indices of the assigned technicians, in on-duty order
    pub team: Vec<usize>,
}

/// Iterator over the candidate windows of one task
#[derive(Clone, Debug)]
pub struct CandidateWindows {
    next_start: NaiveDateTime,
    duration: Duration,
    step: Duration,
    day_end: NaiveDateTime,
}

impl Iterator for CandidateWindows {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        let end = self.next_start + self.duration;
        if end > self.day_end {
            return None;
        }
        let window = Interval::new(self.next_start, end);
        self.next_start += self.step;
        Some(window)
    }
}

/// Candidate windows for `task` under `config`
pub fn candidate_windows(task: &Task, config: &SchedulerConfig) -> CandidateWindows {
    CandidateWindows {
        next_start: config.day_start(task.date),
        duration: task.duration(),
        step: config.slot_step(),
        day_end: config.day_end(task.date),
    }
}

/// Find the first window where `task.people_required` technicians are free.
///
/// The team is the first `people_required` technicians that pass, in
/// on-duty order.
pub fn find_first_fit(
    task: &Task,
    config: &SchedulerConfig,
    on_duty: &[OnDuty<'_>],
    technicians: &[Technician],
) -> Option<SlotMatch> {
    let needed = task.people_required as usize;

    candidate_windows(task, config).find_map(|window| {
        let free: Vec<usize> = on_duty
            .iter()
            .filter(|member| {
                technicians[member.index].is_available(window.start, window.end, Some(member.day))
            })
            .map(|member| member.index)
            .collect();

        (free.len() >= needed).then(|| SlotMatch {
            window,
            team: free.into_iter().take(needed).collect(),
        })
    })
}
