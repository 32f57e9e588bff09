// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Types produced by one PLAN -> ACT -> OBSERVE -> REFLECT -> DECIDE pass.

use serde::{Deserialize, Serialize};

use crate::task::{Priority, TaskId};

/// Phase a `CycleState` reached before it was committed. A cycle that
/// short-circuits on a terminal action may never reach `Reflect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Plan,
    Act,
    Observe,
    Reflect,
    Decide,
}

/// Output bound applied before an observation is persisted.
pub const OBSERVATION_OUTPUT_LIMIT: usize = 2_000;

/// Output bound applied when reading a file via the `ReadFile` action.
pub const READ_FILE_LIMIT: usize = 5_000;

/// Exactly one action is taken per cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action_type", rename_all = "snake_case")]
pub enum Action {
    ExecuteCommand { command: String },
    ReadFile { path: String },
    WriteFile { path: String, content: String },
    AskUser { question: String },
    InternalReasoning { text: String },
    CompleteTask { summary: String },
    BlockTask { summary: String },
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::ExecuteCommand { .. } => "execute_command",
            Action::ReadFile { .. } => "read_file",
            Action::WriteFile { .. } => "write_file",
            Action::AskUser { .. } => "ask_user",
            Action::InternalReasoning { .. } => "internal_reasoning",
            Action::CompleteTask { .. } => "complete_task",
            Action::BlockTask { .. } => "block_task",
        }
    }

    /// Whether this action should short-circuit the rest of the cycle
    /// (ACT/REFLECT/DECIDE are skipped).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Action::CompleteTask { .. } | Action::BlockTask { .. } | Action::AskUser { .. }
        )
    }
}

/// The LM's plan for this cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub goal: String,
    pub approach: String,
    pub next_action: Action,
    pub reasoning: String,
    pub remaining_steps: Vec<String>,
    pub confidence: f64,
}

impl Plan {
    /// The fallback plan used when the PLAN phase's LM response cannot be
    /// parsed as JSON.
    pub fn parse_failure_fallback() -> Plan {
        Plan {
            goal: "recover from a malformed planning response".into(),
            approach: "retry with a trivial, safe action".into(),
            next_action: Action::ExecuteCommand {
                command: "echo 'Parse error, continuing'".into(),
            },
            reasoning: "the planning response could not be parsed as JSON".into(),
            remaining_steps: vec![],
            confidence: 0.0,
        }
    }
}

/// What happened when the planned action was carried out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub files_modified: Vec<String>,
}

impl Observation {
    /// Truncates `output`/`error` to `OBSERVATION_OUTPUT_LIMIT` bytes, the
    /// bound applied before a cycle state is serialized.
    pub fn truncated(mut self) -> Self {
        truncate_in_place(&mut self.output, OBSERVATION_OUTPUT_LIMIT);
        if let Some(err) = &mut self.error {
            truncate_in_place(err, OBSERVATION_OUTPUT_LIMIT);
        }
        self
    }
}

fn truncate_in_place(s: &mut String, limit: usize) {
    if s.len() > limit {
        let mut end = limit;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
}

/// A proposed follow-up task, surfaced during REFLECT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuriosityProposal {
    pub description: String,
    pub justification: String,
    pub priority: Priority,
    pub estimated_value: f64,
    pub category: CuriosityCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CuriosityCategory {
    Verification,
    Documentation,
    Robustness,
    Exploration,
}

/// The LM's self-assessment of the cycle just observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflection {
    pub progress_made: bool,
    pub what_learned: String,
    pub plan_still_valid: bool,
    pub proposed_tasks: Vec<CuriosityProposal>,
    pub stuck_indicators: Vec<String>,
    pub confidence: f64,
    pub next_step_suggestion: String,
}

impl Reflection {
    /// The fallback reflection used when the REFLECT phase's LM response
    /// cannot be parsed as JSON.
    pub fn parse_failure_fallback() -> Reflection {
        Reflection {
            progress_made: false,
            what_learned: "the reflection response could not be parsed as JSON".into(),
            plan_still_valid: true,
            proposed_tasks: vec![],
            stuck_indicators: vec![],
            confidence: 0.0,
            next_step_suggestion: "retry".into(),
        }
    }
}

/// The terminal verdict for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Continue,
    Complete,
    Blocked,
    AskUser,
    BudgetExceeded,
}

impl Decision {
    /// Parses a decision from free LM text: the first matching token
    /// wins; `CONTINUE` is the default when nothing matches.
    pub fn parse_tolerant(text: &str) -> Decision {
        let upper = text.to_ascii_uppercase();
        let candidates: [(&str, Decision); 5] = [
            ("COMPLETE", Decision::Complete),
            ("BLOCKED", Decision::Blocked),
            ("ASK_USER", Decision::AskUser),
            ("BUDGET_EXCEEDED", Decision::BudgetExceeded),
            ("CONTINUE", Decision::Continue),
        ];
        let mut best: Option<(usize, Decision)> = None;
        for (token, decision) in candidates {
            if let Some(idx) = upper.find(token) {
                let better = match best {
                    Some((best_idx, _)) => idx < best_idx,
                    None => true,
                };
                if better {
                    best = Some((idx, decision));
                }
            }
        }
        best.map(|(_, decision)| decision).unwrap_or(Decision::Continue)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Continue => "continue",
            Decision::Complete => "complete",
            Decision::Blocked => "blocked",
            Decision::AskUser => "ask_user",
            Decision::BudgetExceeded => "budget_exceeded",
        }
    }
}

/// One committed pass through the cycle, as persisted to the cycle log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleState {
    pub cycle_id: u64,
    pub task_id: TaskId,
    pub phase: CyclePhase,
    pub plan: Option<Plan>,
    pub action: Option<Action>,
    pub observation: Option<Observation>,
    pub reflection: Option<Reflection>,
    pub decision: Decision,
    pub timestamp: String,
}

/// What the Cycle Engine hands back to the Agent Loop for one cycle. The
/// engine never commits this itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleResult {
    pub state: CycleState,
    pub decision: Decision,
    pub proposed_tasks: Vec<CuriosityProposal>,
    pub summary: String,
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
