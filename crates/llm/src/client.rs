// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability interface every LM provider implements, per spec.md §4.3
//! and the "provider abstraction" design note in §9: the core talks to a
//! provider only through `chat` and `health`.

use async_trait::async_trait;

use crate::error::LlmError;
use crate::message::Message;
use crate::response::ChatResponse;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends an ordered conversation and returns the model's reply.
    /// Errors surface as `LlmError`; implementations must never panic the
    /// caller's tick.
    async fn chat(&self, messages: &[Message]) -> Result<ChatResponse, LlmError>;

    /// Liveness probe, used by the agent loop's pre-flight health report.
    async fn health(&self) -> bool;
}
