// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain error kinds shared across the runtime.
//!
//! Each downstream crate defines its own `thiserror` enum for the errors
//! it actually produces (`StorageError`, `EngineError`, `LlmError`,
//! `ExecutorError`); this enum names the ten kinds spec.md §7 classifies
//! by propagation policy, for callers that want to reason about
//! recoverability in those terms rather than matching on crate-specific
//! variants.

use thiserror::Error;

/// A domain-level failure, independent of which crate raised it.
#[derive(Debug, Error)]
pub enum VigilError {
    #[error("config invalid: {0}")]
    ConfigInvalid(String),

    #[error("filesystem access denied: {0}")]
    FilesystemDenied(String),

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("language model unavailable: {0}")]
    LmUnavailable(String),

    #[error("language model returned an unusable response: {0}")]
    LmBadResponse(String),

    #[error("command execution timed out: {0}")]
    ExecutorTimeout(String),

    #[error("command could not be spawned: {0}")]
    ExecutorSpawnFailure(String),

    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),

    #[error("task is stuck: {0}")]
    Stuck(String),

    #[error("store conflict: {0}")]
    StoreConflict(String),
}

impl VigilError {
    /// Whether the current cycle can still make progress after this error,
    /// or whether it must resolve to `BLOCKED` for this tick.
    pub fn recoverable(&self) -> bool {
        matches!(
            self,
            VigilError::ExecutorTimeout(_) | VigilError::ExecutorSpawnFailure(_)
        )
    }

    /// Whether this error should end the current tick outright, rather
    /// than being folded into an `Observation` and handed to REFLECT.
    pub fn terminates_tick(&self) -> bool {
        matches!(
            self,
            VigilError::ConfigInvalid(_)
                | VigilError::FilesystemDenied(_)
                | VigilError::LmUnavailable(_)
                | VigilError::BudgetExceeded(_)
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
