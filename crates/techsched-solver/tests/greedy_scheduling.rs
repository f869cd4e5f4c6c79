//! Integration tests for the day-partitioned greedy scheduler

use chrono::{NaiveDate, NaiveTime, Weekday};
use pretty_assertions::assert_eq;
use techsched_core::{
    build_table, AvailabilityTable, DayAvailability, Interval, RawAvailability, Scheduler,
    SchedulerConfig, Task, INVALID_TASK_REASON, NO_SLOT_REASON,
};
use techsched_solver::{verify_outcome, DailyScheduler};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// 2025-03-03 is a Monday
fn monday() -> NaiveDate {
    date(2025, 3, 3)
}

fn full_day() -> DayAvailability {
    DayAvailability::normal(time(8, 0), time(17, 0))
}

fn two_technicians() -> AvailabilityTable {
    AvailabilityTable::new()
        .with_entry("alice", Weekday::Mon, full_day())
        .with_entry("bob", Weekday::Mon, full_day())
}

fn run(tasks: &[Task], table: &AvailabilityTable) -> techsched_core::ScheduleOutcome {
    let scheduler = DailyScheduler::new(SchedulerConfig::default()).unwrap();
    let outcome = scheduler.run(tasks, table);
    let violations = verify_outcome(&outcome, tasks, table, scheduler.config());
    assert!(violations.is_empty(), "violations: {violations:#?}");
    outcome
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_a_full_team_at_day_start() {
    let tasks = vec![Task::new(monday(), "press-1", 4.0, 2)];
    let outcome = run(&tasks, &two_technicians());

    assert_eq!(outcome.scheduled.len(), 1);
    let row = &outcome.scheduled[0];
    assert_eq!(row.date, monday());
    assert_eq!(row.start, time(8, 0));
    assert_eq!(row.end, time(12, 0));
    assert_eq!(row.machine, "press-1");
    assert_eq!(row.technicians, vec!["alice", "bob"]);
    assert!(outcome.unscheduled.is_empty());
}

#[test]
fn scenario_b_second_task_waits_for_noon() {
    let tasks = vec![
        Task::new(monday(), "press-1", 4.0, 2),
        Task::new(monday(), "lathe-2", 2.0, 1),
    ];
    let outcome = run(&tasks, &two_technicians());

    assert_eq!(outcome.scheduled.len(), 2);
    let second = &outcome.scheduled[1];
    assert_eq!(second.machine, "lathe-2");
    assert_eq!(second.start, time(12, 0));
    assert_eq!(second.end, time(14, 0));
    assert_eq!(second.technicians, vec!["alice"]);
}

#[test]
fn scenario_b_holds_regardless_of_input_order() {
    // The one-person task comes first in the input but is sorted after
    let tasks = vec![
        Task::new(monday(), "lathe-2", 2.0, 1),
        Task::new(monday(), "press-1", 4.0, 2),
    ];
    let outcome = run(&tasks, &two_technicians());

    assert_eq!(outcome.scheduled[0].machine, "press-1");
    assert_eq!(outcome.scheduled[0].start, time(8, 0));
    assert_eq!(outcome.scheduled[1].machine, "lathe-2");
    assert_eq!(outcome.scheduled[1].start, time(12, 0));
}

#[test]
fn scenario_c_headcount_beyond_pool() {
    let tasks = vec![Task::new(monday(), "crane", 1.0, 3)];
    let outcome = run(&tasks, &two_technicians());

    assert!(outcome.scheduled.is_empty());
    assert_eq!(outcome.unscheduled.len(), 1);
    let row = &outcome.unscheduled[0];
    assert_eq!(row.machine, "crane");
    assert_eq!(row.hours_required, 1.0);
    assert_eq!(row.people_required, 3);
    assert_eq!(row.reason, NO_SLOT_REASON);
    assert!(row.reason.contains("enough technicians"));

    // Nobody was touched
    assert!(outcome.technicians.iter().all(|t| t.busy_intervals().is_empty()));
}

#[test]
fn scenario_d_non_normal_status_never_selected() {
    let table = AvailabilityTable::new()
        .with_entry(
            "alice",
            Weekday::Mon,
            DayAvailability::new(time(8, 0), time(17, 0), "Vacation"),
        )
        .with_entry("bob", Weekday::Mon, full_day());
    let tasks = vec![
        Task::new(monday(), "press-1", 1.0, 1),
        Task::new(monday(), "press-2", 1.0, 1),
        Task::new(monday(), "press-3", 1.0, 2),
    ];
    let outcome = run(&tasks, &table);

    assert_eq!(outcome.unscheduled.len(), 1);
    assert_eq!(outcome.unscheduled[0].machine, "press-3");
    for row in &outcome.scheduled {
        assert_eq!(row.technicians, vec!["bob"]);
    }
    assert_eq!(outcome.scheduled[0].start, time(8, 0));
    assert_eq!(outcome.scheduled[1].start, time(9, 0));
    assert!(outcome.technician("alice").unwrap().busy_intervals().is_empty());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn every_task_covered_exactly_once() {
    let table = two_technicians();
    let tasks = vec![
        Task::new(monday(), "a", 3.0, 2),
        Task::new(monday(), "b", 3.0, 2),
        Task::new(monday(), "c", 3.0, 2),
        Task::new(monday(), "d", 3.0, 2),
        Task::new(monday(), "e", 1.0, 1),
        Task::new(date(2025, 3, 4), "f", 1.0, 1),
    ];
    let outcome = run(&tasks, &table);

    assert_eq!(outcome.task_count(), tasks.len());
    // Three 3h two-person tasks fill 08:00-17:00; the fourth and the
    // one-person task have no room left.
    assert_eq!(outcome.scheduled.len(), 3);
    let unscheduled: Vec<_> = outcome.unscheduled.iter().map(|r| r.machine.as_str()).collect();
    // Tuesday has no on-duty technicians at all
    assert_eq!(unscheduled, vec!["d", "e", "f"]);
}

#[test]
fn higher_headcount_goes_first_when_supply_is_scarce() {
    let table = two_technicians();
    let tasks = vec![
        Task::new(monday(), "solo-1", 9.0, 1),
        Task::new(monday(), "solo-2", 9.0, 1),
        Task::new(monday(), "pair", 9.0, 2),
    ];
    let outcome = run(&tasks, &table);

    assert_eq!(outcome.scheduled.len(), 1);
    assert_eq!(outcome.scheduled[0].machine, "pair");
    let unscheduled: Vec<_> = outcome.unscheduled.iter().map(|r| r.machine.as_str()).collect();
    assert_eq!(unscheduled, vec!["solo-1", "solo-2"]);
}

#[test]
fn dates_processed_in_ascending_order() {
    let table = AvailabilityTable::new()
        .with_entry("alice", Weekday::Mon, full_day())
        .with_entry("alice", Weekday::Tue, full_day());
    let tasks = vec![
        Task::new(date(2025, 3, 11), "late", 1.0, 1),
        Task::new(date(2025, 3, 4), "tuesday", 1.0, 1),
        Task::new(date(2025, 3, 3), "monday", 1.0, 1),
    ];
    let outcome = run(&tasks, &table);

    let order: Vec<_> = outcome.scheduled.iter().map(|r| r.machine.as_str()).collect();
    assert_eq!(order, vec!["monday", "tuesday", "late"]);
}

#[test]
fn commitments_carry_across_dates_without_conflict() {
    // Same weekday, different dates: busy intervals on one date never
    // block the other.
    let table = AvailabilityTable::new().with_entry("alice", Weekday::Mon, full_day());
    let tasks = vec![
        Task::new(date(2025, 3, 3), "week-1", 9.0, 1),
        Task::new(date(2025, 3, 10), "week-2", 9.0, 1),
    ];
    let outcome = run(&tasks, &table);

    assert_eq!(outcome.scheduled.len(), 2);
    assert_eq!(outcome.technician("alice").unwrap().busy_intervals().len(), 2);
}

#[test]
fn personal_windows_shift_the_start() {
    let table = AvailabilityTable::new()
        .with_entry("alice", Weekday::Mon, DayAvailability::normal(time(10, 30), time(15, 0)))
        .with_entry("bob", Weekday::Mon, DayAvailability::normal(time(9, 0), time(17, 0)));
    let tasks = vec![Task::new(monday(), "press", 2.0, 2)];
    let outcome = run(&tasks, &table);

    assert_eq!(outcome.scheduled[0].start, time(10, 30));
    assert_eq!(outcome.scheduled[0].end, time(12, 30));
}

#[test]
fn fractional_hours_keep_exact_duration() {
    let tasks = vec![
        Task::new(monday(), "a", 1.25, 1),
        Task::new(monday(), "b", 0.75, 1),
    ];
    let table = AvailabilityTable::new().with_entry("alice", Weekday::Mon, full_day());
    let outcome = run(&tasks, &table);

    assert_eq!(outcome.scheduled[0].start, time(8, 0));
    assert_eq!(outcome.scheduled[0].end, time(9, 15));
    assert_eq!(outcome.scheduled[1].start, time(9, 15));
    assert_eq!(outcome.scheduled[1].end, time(10, 0));
}

#[test]
fn sub_second_hours_keep_exact_duration() {
    let tasks = vec![Task::new(monday(), "gauge", 0.1234, 1)];
    let table = AvailabilityTable::new().with_entry("alice", Weekday::Mon, full_day());
    let outcome = run(&tasks, &table);

    let row = &outcome.scheduled[0];
    assert_eq!(row.start, time(8, 0));
    assert_eq!(
        row.interval().duration(),
        chrono::Duration::microseconds(444_240_000)
    );
    assert_eq!(row.end, NaiveTime::from_hms_micro_opt(8, 7, 24, 240_000).unwrap());
}

#[test]
fn tiny_positive_tasks_are_scheduled() {
    let tasks = vec![Task::new(monday(), "blip", 0.0001, 1)];
    let table = AvailabilityTable::new().with_entry("alice", Weekday::Mon, full_day());
    let outcome = run(&tasks, &table);

    assert!(outcome.unscheduled.is_empty());
    assert_eq!(outcome.scheduled[0].technicians, vec!["alice"]);
    assert_eq!(
        outcome.scheduled[0].interval().duration(),
        chrono::Duration::milliseconds(360)
    );
}

#[test]
fn granularity_skips_unaligned_gaps() {
    // alice is busy until 08:50 after the first task; with a 15-minute step
    // the next start is 09:00, not 08:50.
    let tasks = vec![
        Task::new(monday(), "short", 50.0 / 60.0, 1),
        Task::new(monday(), "next", 1.0, 1),
    ];
    let table = AvailabilityTable::new().with_entry("alice", Weekday::Mon, full_day());
    let outcome = run(&tasks, &table);

    assert_eq!(outcome.scheduled[0].end, time(8, 50));
    assert_eq!(outcome.scheduled[1].start, time(9, 0));
}

#[test]
fn custom_workday_and_interval() {
    let config = SchedulerConfig::default().workday(6, 10).slot_interval(30);
    let scheduler = DailyScheduler::new(config.clone()).unwrap();
    let table = AvailabilityTable::new()
        .with_entry("alice", Weekday::Mon, DayAvailability::normal(time(6, 0), time(22, 0)));
    let tasks = vec![
        Task::new(monday(), "a", 2.5, 1),
        Task::new(monday(), "b", 1.5, 1),
        Task::new(monday(), "c", 1.0, 1),
    ];
    let outcome = scheduler.run(&tasks, &table);

    assert!(verify_outcome(&outcome, &tasks, &table, &config).is_empty());
    assert_eq!(outcome.scheduled[0].start, time(6, 0));
    assert_eq!(outcome.scheduled[1].start, time(8, 30));
    assert_eq!(outcome.scheduled[1].end, time(10, 0));
    assert_eq!(outcome.unscheduled[0].machine, "c");
}

#[test]
fn malformed_tasks_reported_not_scheduled() {
    let tasks = vec![
        Task::new(monday(), "zero-hours", 0.0, 1),
        Task::new(monday(), "nobody", 1.0, 0),
        Task::new(monday(), "fine", 1.0, 1),
    ];
    let outcome = run(&tasks, &two_technicians());

    assert_eq!(outcome.scheduled.len(), 1);
    assert_eq!(outcome.scheduled[0].machine, "fine");
    assert_eq!(outcome.unscheduled.len(), 2);
    assert!(outcome.unscheduled.iter().all(|r| r.reason == INVALID_TASK_REASON));
}

#[test]
fn scheduling_is_deterministic() {
    let rows = vec![
        RawAvailability::new("zoe", "Monday", "08:00:00", "17:00:00", "Normal"),
        RawAvailability::new("adam", "Monday", "09:00:00", "13:00:00", "Normal"),
        RawAvailability::new("mia", "Monday", "08:00:00", "17:00:00", "Sick"),
        RawAvailability::new("lee", "Monday", "12:00:00", "17:00:00", "Normal"),
        RawAvailability::new("lee", "Tuesday", "08:00:00", "17:00:00", "Normal"),
    ];
    let table = build_table(&rows).unwrap();
    let tasks: Vec<Task> = (0..12)
        .map(|i| {
            let day = if i % 3 == 0 { date(2025, 3, 4) } else { monday() };
            Task::new(day, format!("m{i}"), 1.0 + f64::from(i % 4) * 0.5, 1 + (i % 3))
        })
        .collect();

    let scheduler = DailyScheduler::default();
    let first = scheduler.schedule(&tasks, &table);
    for _ in 0..5 {
        assert_eq!(scheduler.schedule(&tasks, &table), first);
    }
    assert!(verify_outcome(&first, &tasks, &table, scheduler.config()).is_empty());
}

#[test]
fn technicians_are_never_double_booked() {
    let table = two_technicians().with_entry("carol", Weekday::Mon, full_day());
    let tasks: Vec<Task> = (0..20)
        .map(|i| Task::new(monday(), format!("m{i}"), 0.5 + f64::from(i % 5) * 0.25, 1 + i % 3))
        .collect();
    let outcome = run(&tasks, &table);

    for tech in &outcome.technicians {
        let busy: &[Interval] = tech.busy_intervals();
        for (i, a) in busy.iter().enumerate() {
            for b in &busy[i + 1..] {
                assert!(!a.overlaps(b), "{} double-booked: {a} / {b}", tech.name);
            }
        }
    }
}
