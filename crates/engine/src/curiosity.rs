// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admits filtered curiosity proposals into the task queue, consulting
//! the Budget Ledger for each and recording every admission or
//! rejection to `logs/curiosity.jsonl`. Grounded on spec.md §4.9.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use vigil_core::{
    BudgetCounters, BudgetEnforcer, BudgetLimits, Clock, CuriosityProposal, Origin, TaskConfig, TaskId,
};
use vigil_storage::{AgentPaths, StorageError, TaskStore};

#[derive(Debug, Serialize)]
struct CuriosityLogEntry<'a> {
    timestamp: String,
    parent_task_id: &'a str,
    description: &'a str,
    admitted: bool,
    reason: Option<String>,
}

pub struct CuriosityAdmitter<'a> {
    paths: &'a AgentPaths,
}

impl<'a> CuriosityAdmitter<'a> {
    pub fn new(paths: &'a AgentPaths) -> Self {
        CuriosityAdmitter { paths }
    }

    /// Attempts to admit each proposal as a new task, returning the
    /// admitted `Task`s. Consults `can_create_curiosity`/`can_create_task`
    /// per proposal, records `record_curiosity()` on the counters for
    /// every admission, and appends one log line per proposal regardless
    /// of outcome.
    #[allow(clippy::too_many_arguments)]
    pub fn admit(
        &self,
        proposals: Vec<CuriosityProposal>,
        parent_task_id: &TaskId,
        parent_depth: u32,
        pending_n: u32,
        limits: &BudgetLimits,
        counters: &mut BudgetCounters,
        clock: &dyn Clock,
    ) -> Result<Vec<vigil_core::Task>, StorageError> {
        let store = TaskStore::new(self.paths);
        let mut admitted = Vec::new();

        for proposal in proposals {
            let today = clock.today();
            let (curiosity_ok, curiosity_reason) =
                BudgetEnforcer::can_create_curiosity(limits, counters, parent_depth + 1, &today);
            let (queue_ok, queue_reason) = BudgetEnforcer::can_create_task(limits, pending_n, 0);

            if curiosity_ok && queue_ok {
                let config = TaskConfig {
                    description: proposal.description.clone(),
                    origin: Origin::Curiosity,
                    priority: proposal.priority,
                    parent_task_id: Some(parent_task_id.clone()),
                    context: Some(proposal.justification.clone()),
                    success_criteria: vec![],
                    curiosity_depth: parent_depth + 1,
                };
                let task = store.create(&config, clock)?;
                counters.record_curiosity(today.clone());
                self.log(parent_task_id, &proposal.description, true, None, clock);
                admitted.push(task);
            } else {
                let reason = curiosity_reason.or(queue_reason);
                self.log(parent_task_id, &proposal.description, false, reason, clock);
            }
        }

        Ok(admitted)
    }

    /// Logs a proposal that never reached budget evaluation — rejected
    /// earlier by the Reflection Analyzer's curiosity filter (e.g. for
    /// `low_value`) — so `logs/curiosity.jsonl` carries every proposal's
    /// fate, not only the ones the admitter itself evaluated.
    pub fn log_rejection(&self, parent_task_id: &TaskId, description: &str, reason: &str, clock: &dyn Clock) {
        self.log(parent_task_id, description, false, Some(reason.to_string()), clock);
    }

    fn log(&self, parent_task_id: &TaskId, description: &str, admitted: bool, reason: Option<String>, clock: &dyn Clock) {
        let entry = CuriosityLogEntry {
            timestamp: clock.now_iso8601(),
            parent_task_id: parent_task_id.as_str(),
            description,
            admitted,
            reason,
        };
        let Ok(line) = serde_json::to_string(&entry) else {
            eprintln!("CRITICAL: failed to serialize curiosity log entry for {parent_task_id}");
            return;
        };
        let path = self.paths.curiosity_log();
        if let Err(err) = std::fs::create_dir_all(self.paths.logs_dir()) {
            eprintln!("CRITICAL: failed to create logs directory: {err}");
            return;
        }
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| writeln!(file, "{line}"));
        if let Err(err) = result {
            eprintln!("CRITICAL: failed to append curiosity log to {}: {err}", path.display());
        }
    }
}

#[cfg(test)]
#[path = "curiosity_tests.rs"]
mod tests;
