// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the cycle engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("llm unavailable: {0}")]
    LmUnavailable(String),
    #[error("llm returned an unparseable response: {0}")]
    LmBadResponse(String),
    #[error("shell execution failed: {0}")]
    Executor(#[from] vigil_shell::ExecutorError),
    #[error("storage error: {0}")]
    Storage(#[from] vigil_storage::StorageError),
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
