// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete providers live behind a single factory keyed by config, per
//! the provider-abstraction design note in spec.md §9.

use std::sync::Arc;

use crate::client::LlmClient;
use crate::config::LlmConfig;
use crate::http::HttpLlmClient;

pub fn create_client(config: &LlmConfig) -> Arc<dyn LlmClient> {
    // Every configured provider currently speaks the same generic chat
    // shape; a vendor-specific client can be added here, selected on
    // `config.provider`, without touching call sites.
    Arc::new(HttpLlmClient::new(config))
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
