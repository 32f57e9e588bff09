// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persists `BudgetCounters` to `runtime/budgets.json`. Grounded on
//! `budgets.py`'s save/load pair: load is non-fatal on absence or
//! corruption, starting from zero with a warning rather than failing
//! the tick.

use crate::error::StorageError;
use crate::paths::AgentPaths;
use std::fs;
use vigil_core::{BudgetCounters, Clock};

pub struct BudgetStore<'a> {
    paths: &'a AgentPaths,
}

impl<'a> BudgetStore<'a> {
    pub fn new(paths: &'a AgentPaths) -> Self {
        BudgetStore { paths }
    }

    /// Writes the counters as pretty JSON, creating `runtime/` if needed.
    pub fn save(&self, counters: &BudgetCounters) -> Result<(), StorageError> {
        let dir = self.paths.runtime_dir();
        fs::create_dir_all(&dir).map_err(|e| StorageError::Io { path: dir.display().to_string(), source: e })?;

        let path = self.paths.budgets_json();
        let json = serde_json::to_string_pretty(counters)
            .map_err(|e| StorageError::Conflict(format!("failed to serialize budget counters: {e}")))?;
        fs::write(&path, json).map_err(|e| StorageError::Io { path: path.display().to_string(), source: e })
    }

    /// Loads the counters, or fresh zeroed counters if the file is
    /// absent or unparseable. Never fails the caller's tick.
    pub fn load(&self, clock: &dyn Clock) -> BudgetCounters {
        let path = self.paths.budgets_json();
        let fresh = || BudgetCounters::new_for_task(clock.now_ms(), clock.today());

        let Ok(content) = fs::read_to_string(&path) else {
            return fresh();
        };
        match serde_json::from_str(&content) {
            Ok(counters) => counters,
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "budget counters file is corrupt, starting from zero");
                fresh()
            }
        }
    }
}

#[cfg(test)]
#[path = "budget_store_tests.rs"]
mod tests;
