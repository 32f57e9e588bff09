// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assembles a single bounded context string for the LM from identity,
//! task, working memory, long-term memory, and belief sources. Grounded
//! on `original_source/runtime/tooeybot/context.py`: the same priority
//! ordering, the same `ceil(chars/4)` token estimate, and the same
//! truncate-must-haves / drop-optionals policy.

use sha2::{Digest, Sha256};

/// Characters per estimated token — matches the original's
/// `CHARS_PER_TOKEN` constant exactly.
pub const CHARS_PER_TOKEN: usize = 4;

/// Whether a context item must be included (truncated to fit) or may be
/// silently dropped when the budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Always,
    High,
    Medium,
}

/// One named, ordered contribution to the assembled context.
#[derive(Debug, Clone)]
pub struct ContextItem {
    pub label: &'static str,
    pub tier: Tier,
    /// Lower sorts first within the assembled string.
    pub priority: u32,
    pub content: String,
}

impl ContextItem {
    pub fn identity(content: String) -> Self {
        ContextItem { label: "identity", tier: Tier::Always, priority: 1, content }
    }
    pub fn current_task(content: String) -> Self {
        ContextItem { label: "current_task", tier: Tier::Always, priority: 4, content }
    }
    pub fn working_memory(content: String) -> Self {
        ContextItem { label: "working_memory", tier: Tier::High, priority: 6, content }
    }
    pub fn long_term_memory(content: String) -> Self {
        ContextItem { label: "long_term_memory", tier: Tier::Medium, priority: 9, content }
    }
    pub fn beliefs(content: String) -> Self {
        ContextItem { label: "beliefs", tier: Tier::Medium, priority: 10, content }
    }
    pub fn skills(content: String) -> Self {
        ContextItem { label: "skills", tier: Tier::Medium, priority: 11, content }
    }

    fn estimated_tokens(&self) -> usize {
        self.content.len().div_ceil(CHARS_PER_TOKEN)
    }
}

/// Assembles a bounded context string from a set of items and a total
/// token budget.
pub struct ContextAssembler {
    pub token_budget: usize,
}

impl ContextAssembler {
    pub fn new(token_budget: usize) -> Self {
        ContextAssembler { token_budget }
    }

    /// Builds the final context string, joining surviving items with
    /// `"\n\n---\n\n"`. Must-have items exceeding the remaining budget are
    /// truncated with a trailing `[truncated]` marker rather than dropped;
    /// optional items that don't fit are dropped silently (logged at
    /// debug).
    pub fn assemble(&self, mut items: Vec<ContextItem>) -> String {
        items.sort_by_key(|item| item.priority);

        let mut remaining = self.token_budget;
        let mut rendered = Vec::with_capacity(items.len());

        for item in items {
            let needed = item.estimated_tokens();
            if needed <= remaining {
                remaining -= needed;
                rendered.push(item.content);
                continue;
            }

            match item.tier {
                Tier::Always => {
                    let char_budget = remaining.saturating_mul(CHARS_PER_TOKEN);
                    let truncated = truncate_chars(&item.content, char_budget);
                    remaining = 0;
                    rendered.push(format!("{truncated}\n[truncated]"));
                }
                Tier::High | Tier::Medium => {
                    tracing::debug!(label = item.label, "dropping optional context item: budget exhausted");
                }
            }
        }

        rendered.join("\n\n---\n\n")
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// SHA-256 hex digest of file content, for drift detection.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
