// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent-home directory skeleton, per spec.md §6's filesystem layout.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AgentPaths {
    pub root: PathBuf,
}

impl AgentPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AgentPaths { root: root.into() }
    }

    pub fn boot_dir(&self) -> PathBuf {
        self.root.join("boot")
    }
    pub fn identity_md(&self) -> PathBuf {
        self.boot_dir().join("identity.md")
    }
    pub fn invariants_md(&self) -> PathBuf {
        self.boot_dir().join("invariants.md")
    }
    pub fn operating_principles_md(&self) -> PathBuf {
        self.boot_dir().join("operating_principles.md")
    }

    pub fn memory_dir(&self) -> PathBuf {
        self.root.join("memory")
    }
    pub fn working_md(&self) -> PathBuf {
        self.memory_dir().join("working.md")
    }
    pub fn long_term_md(&self) -> PathBuf {
        self.memory_dir().join("long_term.md")
    }
    pub fn beliefs_md(&self) -> PathBuf {
        self.memory_dir().join("beliefs.md")
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.root.join("skills")
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }
    pub fn inbox_md(&self) -> PathBuf {
        self.tasks_dir().join("inbox.md")
    }
    pub fn active_md(&self) -> PathBuf {
        self.tasks_dir().join("active.md")
    }
    pub fn completed_dir(&self) -> PathBuf {
        self.tasks_dir().join("completed")
    }
    pub fn blocked_dir(&self) -> PathBuf {
        self.tasks_dir().join("blocked")
    }
    pub fn history_dir(&self) -> PathBuf {
        self.tasks_dir().join("history")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
    pub fn events_dir(&self) -> PathBuf {
        self.logs_dir().join("events")
    }
    pub fn curiosity_log(&self) -> PathBuf {
        self.logs_dir().join("curiosity.jsonl")
    }
    pub fn daily_logs_dir(&self) -> PathBuf {
        self.logs_dir().join("daily")
    }
    pub fn weekly_logs_dir(&self) -> PathBuf {
        self.logs_dir().join("weekly")
    }
    pub fn health_logs_dir(&self) -> PathBuf {
        self.logs_dir().join("health")
    }

    pub fn runtime_dir(&self) -> PathBuf {
        self.root.join("runtime")
    }
    pub fn budgets_json(&self) -> PathBuf {
        self.runtime_dir().join("budgets.json")
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join("snapshots")
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join("scratch")
    }

    /// The full directory skeleton created by `init`.
    pub fn skeleton(&self) -> Vec<PathBuf> {
        vec![
            self.boot_dir(),
            self.memory_dir(),
            self.skills_dir().join("core"),
            self.skills_dir().join("candidates"),
            self.skills_dir().join("learned"),
            self.skills_dir().join("deprecated"),
            self.skills_dir().join("failed"),
            self.events_dir(),
            self.daily_logs_dir(),
            self.weekly_logs_dir(),
            self.health_logs_dir(),
            self.completed_dir(),
            self.blocked_dir(),
            self.history_dir(),
            self.runtime_dir(),
            self.snapshots_dir().join("daily"),
            self.snapshots_dir().join("weekly"),
            self.snapshots_dir().join("monthly"),
            self.scratch_dir(),
        ]
    }
}

impl AsRef<Path> for AgentPaths {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
