// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Defensive extraction of a JSON object from free LM text. Strips one
//! optional fenced code block (` ```json ... ``` ` or plain ` ``` `)
//! before handing the remainder to `serde_json`. Grounded on spec.md
//! §4.10's "parse defensively: strip a single optional fenced code
//! block, parse JSON" instruction and the original's equivalent
//! `_extract_json` helper in `agent.py`.

use serde::de::DeserializeOwned;
use std::sync::OnceLock;

fn fence_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)\n?```")
            .expect("static fenced code block pattern is valid")
    })
}

/// Strips a single leading/trailing fenced code block, if present,
/// leaving the text otherwise untouched.
pub fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match fence_pattern().captures(trimmed) {
        Some(captures) => captures.get(1).map(|m| m.as_str()).unwrap_or(trimmed).trim(),
        None => trimmed,
    }
}

/// Attempts to parse `text` as `T` after stripping an optional fence.
/// Returns the raw parse error's message on failure so callers can log
/// it before falling back to a safe default.
pub fn parse_defensive<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    let candidate = strip_fence(text);
    serde_json::from_str(candidate).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "json_extract_tests.rs"]
mod tests;
