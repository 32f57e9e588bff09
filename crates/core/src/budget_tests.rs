// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn limits() -> BudgetLimits {
    BudgetLimits {
        max_iterations_per_task: 3,
        max_consecutive_failures: 3,
        max_actions_without_progress: 3,
        max_active_tasks: 1,
        max_pending_tasks: 100,
        max_task_duration_minutes: 60,
        max_curiosity_tasks_per_day: 2,
        max_curiosity_depth: 2,
        min_curiosity_value_threshold: 0.6,
        curiosity_enabled: true,
    }
}

#[test]
fn record_resets_consecutive_failures_on_success() {
    let mut counters = BudgetCounters::new_for_task(0, "2026-07-28");
    counters.record(false, true);
    counters.record(false, true);
    assert_eq!(counters.consecutive_failures, 2);
    counters.record(true, false);
    assert_eq!(counters.consecutive_failures, 0);
    assert_eq!(counters.actions_without_progress, 0);
}

#[test]
fn record_tracks_actions_without_progress_independently_of_failure() {
    let mut counters = BudgetCounters::new_for_task(0, "2026-07-28");
    counters.record(false, false);
    assert_eq!(counters.actions_without_progress, 1);
    assert_eq!(counters.consecutive_failures, 0);
}

#[test]
fn can_continue_fails_exactly_at_max_iterations() {
    let limits = limits();
    let mut counters = BudgetCounters::new_for_task(0, "2026-07-28");
    for _ in 0..3 {
        let (ok, _) = BudgetEnforcer::can_continue(&limits, &counters, 0);
        assert!(ok);
        counters.record(true, false);
    }
    let (ok, reason) = BudgetEnforcer::can_continue(&limits, &counters, 0);
    assert!(!ok);
    assert_eq!(
        reason.unwrap(),
        "Reached maximum iterations (3) for this task"
    );
}

#[test]
fn can_continue_fails_on_consecutive_failures() {
    let limits = limits();
    let mut counters = BudgetCounters::new_for_task(0, "2026-07-28");
    counters.record(false, true);
    counters.record(false, true);
    counters.record(false, true);
    let (ok, reason) = BudgetEnforcer::can_continue(&limits, &counters, 0);
    assert!(!ok);
    assert!(reason.unwrap().contains("consecutive failures"));
}

#[test]
fn can_continue_fails_past_max_duration() {
    let limits = limits();
    let counters = BudgetCounters::new_for_task(0, "2026-07-28");
    let past_deadline_ms = (limits.max_task_duration_minutes as i64 + 1) * 60_000;
    let (ok, reason) = BudgetEnforcer::can_continue(&limits, &counters, past_deadline_ms);
    assert!(!ok);
    assert!(reason.unwrap().contains("maximum task duration"));
}

#[test]
fn can_continue_succeeds_under_every_limit() {
    let limits = limits();
    let counters = BudgetCounters::new_for_task(0, "2026-07-28");
    let (ok, reason) = BudgetEnforcer::can_continue(&limits, &counters, 1_000);
    assert!(ok);
    assert!(reason.is_none());
}

#[test]
fn can_create_curiosity_rejects_when_disabled() {
    let mut limits = limits();
    limits.curiosity_enabled = false;
    let counters = BudgetCounters::new_for_task(0, "2026-07-28");
    let (ok, reason) = BudgetEnforcer::can_create_curiosity(&limits, &counters, 0, "2026-07-28");
    assert!(!ok);
    assert_eq!(reason.unwrap(), "curiosity_disabled");
}

#[test]
fn can_create_curiosity_rejects_at_max_depth() {
    let limits = limits();
    let counters = BudgetCounters::new_for_task(0, "2026-07-28");
    let (ok, reason) = BudgetEnforcer::can_create_curiosity(&limits, &counters, 2, "2026-07-28");
    assert!(!ok);
    assert_eq!(reason.unwrap(), "max_depth_exceeded");
}

#[test]
fn can_create_curiosity_rejects_at_daily_budget() {
    let limits = limits();
    let mut counters = BudgetCounters::new_for_task(0, "2026-07-28");
    counters.record_curiosity("2026-07-28");
    counters.record_curiosity("2026-07-28");
    let (ok, reason) = BudgetEnforcer::can_create_curiosity(&limits, &counters, 0, "2026-07-28");
    assert!(!ok);
    assert_eq!(reason.unwrap(), "daily_budget_exhausted");
}

#[test]
fn record_curiosity_rolls_day_counter_on_date_change() {
    let mut counters = BudgetCounters::new_for_task(0, "2026-07-28");
    counters.record_curiosity("2026-07-28");
    counters.record_curiosity("2026-07-28");
    assert_eq!(counters.curiosity_tasks_today, 2);
    counters.record_curiosity("2026-07-29");
    assert_eq!(counters.curiosity_tasks_today, 1);
    assert_eq!(counters.curiosity_day, "2026-07-29");
}

#[test]
fn can_create_task_enforces_active_cap_before_pending_cap() {
    let limits = limits();
    let (ok, reason) = BudgetEnforcer::can_create_task(&limits, 0, 1);
    assert!(!ok);
    assert_eq!(reason.unwrap(), "Maximum active tasks reached");
}

#[test]
fn can_create_task_enforces_pending_cap() {
    let limits = limits();
    let (ok, reason) = BudgetEnforcer::can_create_task(&limits, 100, 0);
    assert!(!ok);
    assert_eq!(reason.unwrap(), "Maximum pending tasks reached");
}

#[test]
fn reset_for_task_zeros_per_task_counters_but_keeps_curiosity_day() {
    let mut counters = BudgetCounters::new_for_task(0, "2026-07-28");
    counters.record(false, true);
    counters.record_curiosity("2026-07-28");
    counters.reset_for_task(5_000);
    assert_eq!(counters.iterations, 0);
    assert_eq!(counters.consecutive_failures, 0);
    assert_eq!(counters.task_started_at, 5_000);
    assert_eq!(counters.curiosity_tasks_today, 1);
}

proptest! {
    /// Over any sequence of progress/failure flags, `record`'s two streak
    /// counters never exceed the number of calls made and always reset to
    /// zero the call after their tripping condition stops holding.
    #[test]
    fn record_streaks_never_exceed_call_count(
        flags in prop::collection::vec((any::<bool>(), any::<bool>()), 0..200)
    ) {
        let mut counters = BudgetCounters::new_for_task(0, "2026-07-28");
        let mut expected_failures = 0u32;
        let mut expected_stalled = 0u32;
        for (iteration, (made_progress, had_failure)) in flags.iter().enumerate() {
            counters.record(*made_progress, *had_failure);
            expected_failures = if *had_failure { expected_failures + 1 } else { 0 };
            expected_stalled = if *made_progress { 0 } else { expected_stalled + 1 };
            prop_assert_eq!(counters.iterations, iteration as u32 + 1);
            prop_assert_eq!(counters.consecutive_failures, expected_failures);
            prop_assert_eq!(counters.actions_without_progress, expected_stalled);
        }
    }

    /// `record_curiosity` tracks a run-length over consecutive same-day
    /// calls: it resets to 1 the moment the day changes and otherwise
    /// increments by exactly one per call, regardless of how many
    /// distinct days have been seen before.
    #[test]
    fn record_curiosity_counter_tracks_current_day_run_length(
        days in prop::collection::vec(0u8..3, 0..50)
    ) {
        let mut counters = BudgetCounters::new_for_task(0, "day-255");
        let mut run_length = 0u32;
        let mut last_day: Option<u8> = None;
        for day in &days {
            let label = format!("day-{day}");
            counters.record_curiosity(label);
            run_length = if last_day == Some(*day) { run_length + 1 } else { 1 };
            last_day = Some(*day);
            prop_assert_eq!(counters.curiosity_tasks_today, run_length);
            prop_assert_eq!(counters.curiosity_day.as_str(), format!("day-{day}"));
        }
    }
}
