// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single generic HTTP JSON-chat provider. spec.md §1 places vendor
//! wire formats explicitly out of scope, so rather than one adapter per
//! vendor (Ollama/OpenAI/Anthropic, as the source this was distilled
//! from has) this is the one configurable shape the core ships with; a
//! vendor-specific client can implement `LlmClient` directly and be
//! wired in through `factory::create_client` alongside this one.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::LlmClient;
use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::message::Message;
use crate::response::{ChatResponse, Usage};

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

pub struct HttpLlmClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl HttpLlmClient {
    pub fn new(config: &LlmConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(key) = &config.api_key {
            let mut headers = reqwest::header::HeaderMap::new();
            if let Ok(value) = reqwest::header::HeaderValue::from_str(&format!("Bearer {key}")) {
                headers.insert(reqwest::header::AUTHORIZATION, value);
            }
            builder = builder.default_headers(headers);
        }
        HttpLlmClient {
            http: builder.build().unwrap_or_default(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "http://127.0.0.1:11434".into()),
            model: config.model.clone(),
            timeout,
        }
    }

    fn role_str(role: crate::message::Role) -> &'static str {
        match role {
            crate::message::Role::System => "system",
            crate::message::Role::User => "user",
            crate::message::Role::Assistant => "assistant",
        }
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn chat(&self, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        let wire_messages: Vec<WireMessage<'_>> = messages
            .iter()
            .map(|m| WireMessage { role: Self::role_str(m.role), content: &m.content })
            .collect();
        let body = json!({
            "model": self.model,
            "messages": wire_messages,
            "stream": false,
        });

        let url = format!("{}/chat", self.base_url.trim_end_matches('/'));
        let response = tokio::time::timeout(self.timeout, self.http.post(&url).json(&body).send())
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))?
            .map_err(|e| LlmError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LlmError::Unavailable(format!(
                "provider returned HTTP {}",
                response.status()
            )));
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::BadResponse(e.to_string()))?;
        let parsed: WireResponse = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::BadResponse(e.to_string()))?;

        Ok(ChatResponse {
            content: parsed.content.unwrap_or_default(),
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
            usage: parsed.usage.unwrap_or_default(),
            raw,
        })
    }

    async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));
        matches!(
            self.http.get(&url).send().await,
            Ok(resp) if resp.status().is_success()
        )
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
