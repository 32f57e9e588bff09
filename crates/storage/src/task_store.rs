// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task lifecycle management over plain files: inbox, the singleton
//! active slot, and the completed/blocked archives. Grounded on
//! `tasks.py::TaskManager`, extended per spec.md §4.4 with a `pause`
//! transition and curiosity-aware record creation.

use crate::error::StorageError;
use crate::paths::AgentPaths;
use crate::task_parse::{parse_records, ParsedTaskRecord};
use std::fs;
use std::path::Path;
use vigil_core::{Clock, Priority, Task, TaskConfig, TaskId, TaskStatus};

const NO_ACTIVE_TASK_MARKER: &str = "*No active task*";
const NO_ACTIVE_TASK_BODY: &str = "# Active Task\n\n*No active task*\n";

pub struct TaskStore<'a> {
    paths: &'a AgentPaths,
}

impl<'a> TaskStore<'a> {
    pub fn new(paths: &'a AgentPaths) -> Self {
        TaskStore { paths }
    }

    fn io_err(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io { path: path.display().to_string(), source }
    }

    /// All tasks currently waiting in the inbox, priority-sorted per
    /// spec.md §4.4 (high < medium < low, ties broken by earliest
    /// deadline, tasks without a deadline sorting last).
    pub fn pending_tasks(&self) -> Result<Vec<Task>, StorageError> {
        let path = self.paths.inbox_md();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| Self::io_err(&path, e))?;
        let mut tasks: Vec<Task> = parse_records(&content).into_iter().map(into_task).collect();
        tasks.sort_by_key(vigil_core::pending_order_key);
        Ok(tasks)
    }

    /// The task currently occupying the active slot, if any.
    pub fn active_task(&self) -> Result<Option<Task>, StorageError> {
        let path = self.paths.active_md();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| Self::io_err(&path, e))?;
        if content.contains(NO_ACTIVE_TASK_MARKER) {
            return Ok(None);
        }
        let mut records = parse_records(&content);
        Ok(records.drain(..).next().map(into_task))
    }

    /// Moves a pending task from the inbox into the active slot.
    /// Errors if a task is already active, preserving spec.md §3's
    /// singleton-active-task invariant.
    pub fn activate(&self, task_id: &TaskId) -> Result<Task, StorageError> {
        if self.active_task()?.is_some() {
            return Err(StorageError::Conflict(format!(
                "cannot activate {task_id}: a task is already active"
            )));
        }

        let inbox_path = self.paths.inbox_md();
        let content = fs::read_to_string(&inbox_path).map_err(|e| Self::io_err(&inbox_path, e))?;
        let records = parse_records(&content);
        let record = records
            .into_iter()
            .find(|r| r.task_id == task_id.as_str())
            .ok_or_else(|| StorageError::Conflict(format!("task {task_id} not found in inbox")))?;

        let active_path = self.paths.active_md();
        fs::write(&active_path, &record.raw).map_err(|e| Self::io_err(&active_path, e))?;

        let new_inbox = content.replacen(&record.raw, "", 1);
        fs::write(&inbox_path, new_inbox).map_err(|e| Self::io_err(&inbox_path, e))?;

        tracing::info!(task_id = %task_id, "activated task");
        Ok(into_task(record))
    }

    /// Writes the completion report and clears the active slot.
    pub fn complete(
        &self,
        task: &Task,
        summary: &str,
        approach: &str,
        artifacts: &[String],
        learnings: Option<&str>,
        clock: &dyn Clock,
    ) -> Result<(), StorageError> {
        let today = clock.today();
        let artifacts_block = if artifacts.is_empty() {
            "None".to_string()
        } else {
            artifacts.iter().map(|a| format!("- {a}")).collect::<Vec<_>>().join("\n")
        };
        let report = format!(
            "# Task: {task_id}\nStatus: \u{2705} Complete\nCompleted: {today}\n\n\
             ## Summary\n{summary}\n\n## Approach\n{approach}\n\n\
             ## Artifacts\n{artifacts_block}\n\n## Learnings\n{learnings}\n",
            task_id = task.task_id,
            learnings = learnings.unwrap_or("None noted."),
        );

        let report_path = self.paths.completed_dir().join(format!("{}.md", task.task_id));
        fs::write(&report_path, report).map_err(|e| Self::io_err(&report_path, e))?;

        let active_path = self.paths.active_md();
        fs::write(&active_path, NO_ACTIVE_TASK_BODY).map_err(|e| Self::io_err(&active_path, e))?;

        tracing::info!(task_id = %task.task_id, "completed task");
        Ok(())
    }

    /// Writes the blocked report and clears the active slot.
    pub fn block(&self, task: &Task, reason: &str, clock: &dyn Clock) -> Result<(), StorageError> {
        let today = clock.today();
        let report = format!(
            "# Task: {task_id}\nStatus: \u{23f8} Blocked\nBlocked: {today}\n\n\
             ## Reason\n{reason}\n\n## Original Task\n{raw}\n",
            task_id = task.task_id,
            raw = render_record(task),
        );

        let report_path = self.paths.blocked_dir().join(format!("{}.md", task.task_id));
        fs::write(&report_path, report).map_err(|e| Self::io_err(&report_path, e))?;

        let active_path = self.paths.active_md();
        fs::write(&active_path, NO_ACTIVE_TASK_BODY).map_err(|e| Self::io_err(&active_path, e))?;

        tracing::info!(task_id = %task.task_id, "blocked task");
        Ok(())
    }

    /// Clears the active slot and re-inserts the task into the inbox
    /// annotated with `reason`, per spec.md §3/§4.4: a paused task
    /// returns to `pending` rather than disappearing.
    pub fn pause(&self, task_id: &TaskId, reason: &str) -> Result<(), StorageError> {
        let active_path = self.paths.active_md();
        let active_content = if active_path.exists() {
            fs::read_to_string(&active_path).map_err(|e| Self::io_err(&active_path, e))?
        } else {
            String::new()
        };

        if !active_content.contains(NO_ACTIVE_TASK_MARKER) {
            if let Some(mut task) =
                parse_records(&active_content).into_iter().map(into_task).find(|t| &t.task_id == task_id)
            {
                task.status = TaskStatus::Paused;
                task.pause_reason = Some(reason.to_string());
                self.append_to_inbox(&render_record(&task))?;
            }
        }

        fs::write(&active_path, NO_ACTIVE_TASK_BODY).map_err(|e| Self::io_err(&active_path, e))?;
        tracing::info!(task_id = %task_id, reason, "paused task, returned to inbox");
        Ok(())
    }

    /// Appends a new record to the inbox, used for plan-spawned and
    /// curiosity-admitted tasks alike.
    pub fn create(&self, config: &TaskConfig, clock: &dyn Clock) -> Result<Task, StorageError> {
        let task = Task::new(config, clock);
        self.append_to_inbox(&render_record(&task))?;
        tracing::info!(task_id = %task.task_id, "created task");
        Ok(task)
    }

    fn append_to_inbox(&self, record: &str) -> Result<(), StorageError> {
        let inbox_path = self.paths.inbox_md();
        let mut existing = if inbox_path.exists() {
            fs::read_to_string(&inbox_path).map_err(|e| Self::io_err(&inbox_path, e))?
        } else {
            String::new()
        };
        if !existing.is_empty() && !existing.ends_with('\n') {
            existing.push('\n');
        }
        existing.push_str(record);
        fs::write(&inbox_path, existing).map_err(|e| Self::io_err(&inbox_path, e))
    }

    /// All descendants (direct and transitive) of `root` among the
    /// currently pending tasks, used to report a curiosity subtree.
    pub fn tree(&self, root: &TaskId) -> Result<Vec<Task>, StorageError> {
        let pending = self.pending_tasks()?;
        let mut frontier = vec![root.as_str().to_string()];
        let mut descendants = Vec::new();
        loop {
            let mut next_frontier = Vec::new();
            for task in &pending {
                if task
                    .parent_task_id
                    .as_ref()
                    .is_some_and(|parent| frontier.contains(&parent.as_str().to_string()))
                {
                    next_frontier.push(task.task_id.as_str().to_string());
                    descendants.push(task.clone());
                }
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }
        Ok(descendants)
    }
}

fn into_task(record: ParsedTaskRecord) -> Task {
    // An unparseable priority field ranks last, per UNKNOWN_PRIORITY_RANK;
    // Low is the nearest concrete variant and the record is kept rather
    // than dropped.
    let priority = Priority::parse(&record.priority).unwrap_or(Priority::Low);
    let origin = record.origin.as_deref().map(parse_origin).unwrap_or(vigil_core::Origin::User);
    Task {
        task_id: TaskId::new(record.task_id),
        priority,
        deadline: record.deadline,
        description: record.description,
        success_criteria: record.success_criteria,
        context: record.context,
        origin,
        parent_task_id: record.parent_task.map(TaskId::new),
        curiosity_depth: record.curiosity_depth.unwrap_or(0),
        created_at: String::new(),
        status: TaskStatus::Pending,
        pause_reason: record.pause_reason,
    }
}

fn parse_origin(s: &str) -> vigil_core::Origin {
    match s.trim().to_ascii_lowercase().as_str() {
        "plan" => vigil_core::Origin::Plan,
        "curiosity" => vigil_core::Origin::Curiosity,
        "recovery" => vigil_core::Origin::Recovery,
        _ => vigil_core::Origin::User,
    }
}

fn render_record(task: &Task) -> String {
    let mut header = format!("task_id: {}\npriority: {}\n", task.task_id, task.priority.as_str());
    if let Some(deadline) = &task.deadline {
        header.push_str(&format!("deadline: {deadline}\n"));
    }
    header.push_str(&format!("origin: {}\n", task.origin.as_str()));
    if let Some(parent) = &task.parent_task_id {
        header.push_str(&format!("parent_task: {parent}\n"));
    }
    if task.curiosity_depth > 0 {
        header.push_str(&format!("curiosity_depth: {}\n", task.curiosity_depth));
    }
    if let Some(reason) = &task.pause_reason {
        header.push_str("pause_reason: |\n");
        for line in reason.lines() {
            header.push_str(&format!("  {line}\n"));
        }
    }
    if let Some(context) = &task.context {
        header.push_str("context: |\n");
        for line in context.lines() {
            header.push_str(&format!("  {line}\n"));
        }
    }

    let mut criteria_block = String::new();
    if !task.success_criteria.is_empty() {
        criteria_block.push_str("\n## Success criteria\n");
        for item in &task.success_criteria {
            criteria_block.push_str(&format!("- {item}\n"));
        }
    }

    format!("---\n{header}---\n{description}\n{criteria_block}\n", description = task.description)
}

#[cfg(test)]
#[path = "task_store_tests.rs"]
mod tests;
