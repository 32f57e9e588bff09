// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A scripted `LlmClient` for deterministic tests elsewhere in the
//! workspace — the engine's PLAN/REFLECT/DECIDE calls can be driven with
//! canned responses without a network round-trip.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::message::Message;
use crate::response::{ChatResponse, Usage};

pub struct FakeLlmClient {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    healthy: Mutex<bool>,
}

impl FakeLlmClient {
    pub fn new() -> Self {
        FakeLlmClient {
            responses: Mutex::new(VecDeque::new()),
            healthy: Mutex::new(true),
        }
    }

    /// Queues a successful response to be returned by the next `chat()` call.
    pub fn push_response(&self, content: impl Into<String>) {
        self.responses.lock().push_back(Ok(content.into()));
    }

    /// Queues an error to be returned by the next `chat()` call.
    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().push_back(Err(error));
    }

    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.lock() = healthy;
    }
}

impl Default for FakeLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn chat(&self, _messages: &[Message]) -> Result<ChatResponse, LlmError> {
        let next = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok("TASK_COMPLETE: no more scripted responses".into()));
        let content = next?;
        Ok(ChatResponse {
            content,
            model: "fake".into(),
            usage: Usage::default(),
            raw: serde_json::Value::Null,
        })
    }

    async fn health(&self) -> bool {
        *self.healthy.lock()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
