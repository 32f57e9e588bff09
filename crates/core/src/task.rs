// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Task` domain type and its lifecycle.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::define_id;

define_id! {
    /// Identifies a task, shaped `<ORIGIN_PREFIX>-<yyyymmddHHMMSS>`.
    pub struct TaskId;
}

/// Scheduling priority. Ranking for queue ordering: `high=0, medium=1,
/// low=2, unknown=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// Parses a priority from a task record field, tolerating unknown
    /// values by ranking them last rather than rejecting the record.
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Unknown priority ranks after every known priority.
pub const UNKNOWN_PRIORITY_RANK: u8 = 99;

/// Where a task came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Plan,
    Curiosity,
    Recovery,
}

impl Origin {
    /// The prefix used when minting a new task id for this origin.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Origin::User => "USR",
            Origin::Plan => "PLN",
            Origin::Curiosity => "CUR",
            Origin::Recovery => "REC",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Origin::User => "user",
            Origin::Plan => "plan",
            Origin::Curiosity => "curiosity",
            Origin::Recovery => "recovery",
        }
    }
}

/// Where a task currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Active,
    Completed,
    Blocked,
    Paused,
}

/// A unit of work the agent loop drives through cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub priority: Priority,
    pub deadline: Option<String>,
    pub description: String,
    pub success_criteria: Vec<String>,
    pub context: Option<String>,
    pub origin: Origin,
    pub parent_task_id: Option<TaskId>,
    pub curiosity_depth: u32,
    pub created_at: String,
    pub status: TaskStatus,
    /// Set by `pause`; re-surfaced to the inbox annotation on requeue.
    pub pause_reason: Option<String>,
}

impl Task {
    /// Mints a fresh pending task, id-stamped from `clock`.
    pub fn new(config: &TaskConfig, clock: &dyn Clock) -> Task {
        let task_id = TaskId::new(format!("{}-{}", config.origin.id_prefix(), clock.timestamp_compact()));
        Task {
            task_id,
            priority: config.priority,
            deadline: None,
            description: config.description.clone(),
            success_criteria: config.success_criteria.clone(),
            context: config.context.clone(),
            origin: config.origin,
            parent_task_id: config.parent_task_id.clone(),
            curiosity_depth: config.curiosity_depth,
            created_at: clock.today(),
            status: TaskStatus::Pending,
            pause_reason: None,
        }
    }
}

/// Parameters accepted by `TaskStore::create`.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub description: String,
    pub origin: Origin,
    pub priority: Priority,
    pub parent_task_id: Option<TaskId>,
    pub context: Option<String>,
    pub success_criteria: Vec<String>,
    pub curiosity_depth: u32,
}

/// Priority rank for queue ordering, `unknown` ranking last.
pub fn priority_rank(priority: Priority) -> u8 {
    priority.rank()
}

/// Orders pending tasks by `(priority_rank, deadline_or_max)` per the
/// task store contract.
pub fn pending_order_key(task: &Task) -> (u8, &str) {
    (
        task.priority.rank(),
        task.deadline.as_deref().unwrap_or("9999-99-99"),
    )
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
