// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("language model unavailable: {0}")]
    Unavailable(String),

    #[error("language model returned an unusable response: {0}")]
    BadResponse(String),

    #[error("language model call timed out after {0:?}")]
    Timeout(std::time::Duration),
}
