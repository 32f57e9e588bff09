// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL history of cycle results, one file per task under
//! `tasks/history/<task_id>.jsonl`. Grounded on the event log's
//! append-and-tolerate-corruption posture (spec.md §4.1), applied here
//! to `CycleResult` records (spec.md §4.10).

use crate::error::StorageError;
use crate::paths::AgentPaths;
use std::fs::{self, OpenOptions};
use std::io::Write;
use vigil_core::CycleResult;

pub struct CycleLog<'a> {
    paths: &'a AgentPaths,
}

impl<'a> CycleLog<'a> {
    pub fn new(paths: &'a AgentPaths) -> Self {
        CycleLog { paths }
    }

    fn io_err(path: &std::path::Path, source: std::io::Error) -> StorageError {
        StorageError::Io { path: path.display().to_string(), source }
    }

    fn file_for(&self, task_id: &str) -> std::path::PathBuf {
        self.paths.history_dir().join(format!("{task_id}.jsonl"))
    }

    /// Appends one cycle result to the task's history file.
    pub fn append(&self, task_id: &str, result: &CycleResult) -> Result<(), StorageError> {
        fs::create_dir_all(self.paths.history_dir())
            .map_err(|e| Self::io_err(&self.paths.history_dir(), e))?;
        let path = self.file_for(task_id);
        let mut file =
            OpenOptions::new().create(true).append(true).open(&path).map_err(|e| Self::io_err(&path, e))?;
        let line = serde_json::to_string(result)
            .map_err(|e| StorageError::Conflict(format!("failed to serialize cycle result: {e}")))?;
        writeln!(file, "{line}").map_err(|e| Self::io_err(&path, e))?;
        Ok(())
    }

    /// Loads every cycle result recorded for a task, skipping malformed
    /// lines with a warning rather than failing the whole read.
    pub fn load(&self, task_id: &str) -> Result<Vec<CycleResult>, StorageError> {
        let path = self.file_for(task_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| Self::io_err(&path, e))?;
        let mut results = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<CycleResult>(line) {
                Ok(result) => results.push(result),
                Err(err) => {
                    tracing::warn!(task_id, lineno, %err, "skipping malformed cycle history line")
                }
            }
        }
        Ok(results)
    }

    /// Number of recorded cycles for a task, used by the stuck detector
    /// without loading the whole history into memory twice.
    pub fn count(&self, task_id: &str) -> Result<usize, StorageError> {
        Ok(self.load(task_id)?.len())
    }

    /// The most recent cycle result for a task, if any.
    pub fn last(&self, task_id: &str) -> Result<Option<CycleResult>, StorageError> {
        Ok(self.load(task_id)?.into_iter().next_back())
    }
}

#[cfg(test)]
#[path = "cycle_log_tests.rs"]
mod tests;
