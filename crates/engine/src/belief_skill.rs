// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only collaborator contracts for beliefs, skills, and memory.
//! Grounded on spec.md's "opaque to the core" design note (§9): the
//! cycle engine consumes plain context snippets and must not depend on
//! these collaborators' internal schemas, so the trait surface is
//! deliberately thin.

use vigil_storage::AgentPaths;

/// A read-only source of context snippets under a byte budget.
pub trait ContextProvider: Send + Sync {
    /// Returns a snippet to fold into the assembled context, or `None`
    /// if there is nothing to contribute right now.
    fn snippet(&self, byte_budget: usize) -> Option<String>;
}

/// Reads `memory/working.md` verbatim, truncated to the byte budget.
pub struct WorkingMemoryProvider<'a> {
    paths: &'a AgentPaths,
}

impl<'a> WorkingMemoryProvider<'a> {
    pub fn new(paths: &'a AgentPaths) -> Self {
        WorkingMemoryProvider { paths }
    }
}

impl ContextProvider for WorkingMemoryProvider<'_> {
    fn snippet(&self, byte_budget: usize) -> Option<String> {
        read_truncated(&self.paths.working_md(), byte_budget)
    }
}

/// Reads `memory/long_term.md` verbatim, truncated to the byte budget.
pub struct LongTermMemoryProvider<'a> {
    paths: &'a AgentPaths,
}

impl<'a> LongTermMemoryProvider<'a> {
    pub fn new(paths: &'a AgentPaths) -> Self {
        LongTermMemoryProvider { paths }
    }
}

impl ContextProvider for LongTermMemoryProvider<'_> {
    fn snippet(&self, byte_budget: usize) -> Option<String> {
        read_truncated(&self.paths.long_term_md(), byte_budget)
    }
}

/// Reads `memory/beliefs.md` verbatim, truncated to the byte budget.
pub struct BeliefProvider<'a> {
    paths: &'a AgentPaths,
}

impl<'a> BeliefProvider<'a> {
    pub fn new(paths: &'a AgentPaths) -> Self {
        BeliefProvider { paths }
    }
}

impl ContextProvider for BeliefProvider<'_> {
    fn snippet(&self, byte_budget: usize) -> Option<String> {
        read_truncated(&self.paths.beliefs_md(), byte_budget)
    }
}

/// Reads every `.md` file under `skills/core/`, concatenated in
/// filename order, truncated to the byte budget. Candidate/learned/
/// deprecated/failed skills are promotion-pipeline state the CLI's
/// `skill-*` commands manage; only `core` skills are active enough to
/// spend context budget on.
pub struct SkillProvider<'a> {
    paths: &'a AgentPaths,
}

impl<'a> SkillProvider<'a> {
    pub fn new(paths: &'a AgentPaths) -> Self {
        SkillProvider { paths }
    }
}

impl ContextProvider for SkillProvider<'_> {
    fn snippet(&self, byte_budget: usize) -> Option<String> {
        let core_dir = self.paths.skills_dir().join("core");
        let mut entries: Vec<_> = std::fs::read_dir(&core_dir)
            .ok()?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
            .collect();
        entries.sort_by_key(|e| e.file_name());

        let combined = entries
            .iter()
            .filter_map(|e| std::fs::read_to_string(e.path()).ok())
            .collect::<Vec<_>>()
            .join("\n\n");

        if combined.trim().is_empty() {
            return None;
        }
        if combined.len() <= byte_budget {
            return Some(combined);
        }
        let mut end = byte_budget;
        while end > 0 && !combined.is_char_boundary(end) {
            end -= 1;
        }
        Some(combined[..end].to_string())
    }
}

fn read_truncated(path: &std::path::Path, byte_budget: usize) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    if content.trim().is_empty() {
        return None;
    }
    if content.len() <= byte_budget {
        return Some(content);
    }
    let mut end = byte_budget;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    Some(content[..end].to_string())
}

#[cfg(test)]
#[path = "belief_skill_tests.rs"]
mod tests;
