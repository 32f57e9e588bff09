// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Budget limits and counters. Pure logic only — persistence lives in
//! `vigil-storage` so this crate stays IO-free.

use serde::{Deserialize, Serialize};

/// Hard, configured limits. Exceeding any of these forces a pause, never
/// a silent continue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetLimits {
    pub max_iterations_per_task: u32,
    pub max_consecutive_failures: u32,
    pub max_actions_without_progress: u32,
    pub max_active_tasks: u32,
    pub max_pending_tasks: u32,
    pub max_task_duration_minutes: u32,
    pub max_curiosity_tasks_per_day: u32,
    pub max_curiosity_depth: u32,
    pub min_curiosity_value_threshold: f64,
    pub curiosity_enabled: bool,
}

impl Default for BudgetLimits {
    fn default() -> Self {
        BudgetLimits {
            max_iterations_per_task: 20,
            max_consecutive_failures: 3,
            max_actions_without_progress: 5,
            max_active_tasks: 1,
            max_pending_tasks: 100,
            max_task_duration_minutes: 60,
            max_curiosity_tasks_per_day: 5,
            max_curiosity_depth: 2,
            min_curiosity_value_threshold: 0.6,
            curiosity_enabled: true,
        }
    }
}

/// Runtime counters, persisted after every cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCounters {
    pub iterations: u32,
    pub consecutive_failures: u32,
    pub actions_without_progress: u32,
    /// Milliseconds since the Unix epoch.
    pub task_started_at: i64,
    /// Calendar date (host time zone) the curiosity counter belongs to.
    pub curiosity_day: String,
    pub curiosity_tasks_today: u32,
}

impl BudgetCounters {
    pub fn new_for_task(now_ms: i64, today: impl Into<String>) -> Self {
        BudgetCounters {
            iterations: 0,
            consecutive_failures: 0,
            actions_without_progress: 0,
            task_started_at: now_ms,
            curiosity_day: today.into(),
            curiosity_tasks_today: 0,
        }
    }

    /// Zero the per-task counters and set `task_started_at = now`.
    /// Day-scoped counters are untouched.
    pub fn reset_for_task(&mut self, now_ms: i64) {
        self.iterations = 0;
        self.consecutive_failures = 0;
        self.actions_without_progress = 0;
        self.task_started_at = now_ms;
    }

    /// Increment iterations; increment `consecutive_failures` iff
    /// `had_failure` else reset it; if `iteration_made_progress` reset
    /// `actions_without_progress` else increment it.
    pub fn record(&mut self, iteration_made_progress: bool, had_failure: bool) {
        self.iterations += 1;
        if had_failure {
            self.consecutive_failures += 1;
        } else {
            self.consecutive_failures = 0;
        }
        if iteration_made_progress {
            self.actions_without_progress = 0;
        } else {
            self.actions_without_progress += 1;
        }
    }

    /// Rolls the day counter if the stored date differs from `today`,
    /// then increments it.
    pub fn record_curiosity(&mut self, today: impl Into<String>) {
        let today = today.into();
        if self.curiosity_day != today {
            self.curiosity_day = today;
            self.curiosity_tasks_today = 0;
        }
        self.curiosity_tasks_today += 1;
    }
}

/// Evaluates counters against limits. Stateless: every method takes the
/// counters and limits explicitly so it composes with any storage layer.
pub struct BudgetEnforcer;

impl BudgetEnforcer {
    /// `false` (with a specific, human-readable reason) if any hard limit
    /// has been reached.
    pub fn can_continue(
        limits: &BudgetLimits,
        counters: &BudgetCounters,
        now_ms: i64,
    ) -> (bool, Option<String>) {
        if counters.iterations >= limits.max_iterations_per_task {
            return (
                false,
                Some(format!(
                    "Reached maximum iterations ({}) for this task",
                    limits.max_iterations_per_task
                )),
            );
        }
        if counters.consecutive_failures >= limits.max_consecutive_failures {
            return (
                false,
                Some(format!(
                    "Reached maximum consecutive failures ({})",
                    limits.max_consecutive_failures
                )),
            );
        }
        if counters.actions_without_progress >= limits.max_actions_without_progress {
            return (
                false,
                Some(format!(
                    "Reached maximum actions without progress ({})",
                    limits.max_actions_without_progress
                )),
            );
        }
        let elapsed_minutes = (now_ms - counters.task_started_at).max(0) as f64 / 60_000.0;
        if elapsed_minutes > limits.max_task_duration_minutes as f64 {
            return (
                false,
                Some(format!(
                    "Exceeded maximum task duration ({} minutes)",
                    limits.max_task_duration_minutes
                )),
            );
        }
        (true, None)
    }

    /// Enforces global queue caps.
    pub fn can_create_task(
        limits: &BudgetLimits,
        pending_n: u32,
        active_n: u32,
    ) -> (bool, Option<String>) {
        if active_n >= limits.max_active_tasks {
            return (false, Some("Maximum active tasks reached".into()));
        }
        if pending_n >= limits.max_pending_tasks {
            return (false, Some("Maximum pending tasks reached".into()));
        }
        (true, None)
    }

    /// `false` if curiosity is disabled, depth is at or past the max, or
    /// today's curiosity counter is exhausted.
    pub fn can_create_curiosity(
        limits: &BudgetLimits,
        counters: &BudgetCounters,
        depth: u32,
        today: &str,
    ) -> (bool, Option<String>) {
        if !limits.curiosity_enabled {
            return (false, Some("curiosity_disabled".into()));
        }
        if depth >= limits.max_curiosity_depth {
            return (false, Some("max_depth_exceeded".into()));
        }
        let today_count = if counters.curiosity_day == today {
            counters.curiosity_tasks_today
        } else {
            0
        };
        if today_count >= limits.max_curiosity_tasks_per_day {
            return (false, Some("daily_budget_exhausted".into()));
        }
        (true, None)
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
