// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The PLAN -> ACT -> OBSERVE -> REFLECT -> DECIDE state machine.
//! Grounded on spec.md §4.10 and the original's `agent.py::process_task`
//! sequencing. Never mutates the Task Store, Cycle Log, or Budget
//! Ledger itself — the Agent Loop commits whatever this produces.

use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};
use vigil_core::{
    Action, BudgetCounters, BudgetLimits, CyclePhase, CycleResult, CycleState, Decision, Observation, Plan,
    Reflection, Task, READ_FILE_LIMIT,
};
use vigil_llm::{LlmClient, Message};
use vigil_shell::Executor;

use crate::json_extract::parse_defensive;
use crate::prompts::{decide_prompt, plan_prompt, reflect_prompt};
use crate::reflection::StuckDetector;

/// The literal wire shape the LM is asked for in the PLAN phase —
/// `next_action` nests its fields under `payload` rather than flattening
/// them the way `vigil_core::Action`'s tagged enum does, so this is
/// parsed separately and then mapped.
#[derive(Debug, Deserialize)]
struct WirePlan {
    goal: String,
    approach: String,
    next_action: WireAction,
    #[serde(default)]
    remaining_steps: Vec<String>,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct WireAction {
    action_type: String,
    #[serde(default)]
    payload: serde_json::Value,
    #[serde(default)]
    reasoning: String,
}

fn payload_str(payload: &serde_json::Value, key: &str) -> String {
    payload.get(key).and_then(|v| v.as_str()).unwrap_or_default().to_string()
}

fn action_from_wire(wire: &WireAction) -> Action {
    match wire.action_type.as_str() {
        "execute_command" => Action::ExecuteCommand { command: payload_str(&wire.payload, "command") },
        "read_file" => Action::ReadFile { path: payload_str(&wire.payload, "path") },
        "write_file" => Action::WriteFile {
            path: payload_str(&wire.payload, "path"),
            content: payload_str(&wire.payload, "content"),
        },
        "ask_user" => Action::AskUser { question: payload_str(&wire.payload, "question") },
        "complete_task" => Action::CompleteTask { summary: payload_str(&wire.payload, "summary") },
        "block_task" => Action::BlockTask { summary: payload_str(&wire.payload, "summary") },
        _ => Action::InternalReasoning { text: payload_str(&wire.payload, "text") },
    }
}

fn plan_from_wire(wire: WirePlan) -> Plan {
    Plan {
        goal: wire.goal,
        approach: wire.approach,
        next_action: action_from_wire(&wire.next_action),
        reasoning: wire.next_action.reasoning,
        remaining_steps: wire.remaining_steps,
        confidence: wire.confidence,
    }
}

pub struct CycleEngine<'a> {
    pub llm: &'a dyn LlmClient,
    pub executor: &'a Executor,
}

impl<'a> CycleEngine<'a> {
    pub fn new(llm: &'a dyn LlmClient, executor: &'a Executor) -> Self {
        CycleEngine { llm, executor }
    }

    /// Runs one full cycle for `task`, producing a `CycleResult`. Never
    /// returns an `Err` for LM or action failures — those are captured as
    /// `Observation{success: false, ...}` and flow through REFLECT/DECIDE
    /// like any other outcome; only unrecoverable engine-internal faults
    /// (e.g. a malformed cwd) would surface as `Err`.
    pub async fn run(
        &self,
        task: &Task,
        task_context: &str,
        cycle_id: u64,
        history: &[CycleResult],
        limits: &BudgetLimits,
        counters: &BudgetCounters,
        scratch_dir: &Path,
    ) -> CycleResult {
        let plan = self.plan_phase(task_context, history, cycle_id, limits).await;

        if plan.next_action.is_terminal() {
            let decision = match &plan.next_action {
                Action::CompleteTask { .. } => Decision::Complete,
                Action::BlockTask { .. } => Decision::Blocked,
                _ => Decision::AskUser,
            };
            let summary = plan.goal.clone();
            let action_taken = plan.next_action.clone();
            let state = CycleState {
                cycle_id,
                task_id: task.task_id.clone(),
                phase: CyclePhase::Plan,
                plan: Some(plan),
                action: Some(action_taken),
                observation: None,
                reflection: None,
                decision,
                timestamp: String::new(),
            };
            return CycleResult { state, decision, proposed_tasks: vec![], summary };
        }

        let action_taken = plan.next_action.clone();
        let observation = self.act_phase(&plan.next_action, scratch_dir).await.truncated();

        let reflection = self
            .reflect_phase(task_context, &plan.next_action, &observation, history)
            .await;

        let decision = self.decide_phase(&reflection, counters, limits).await;

        let proposed_tasks = reflection.proposed_tasks.clone();
        let summary = reflection.what_learned.clone();

        let state = CycleState {
            cycle_id,
            task_id: task.task_id.clone(),
            phase: CyclePhase::Decide,
            plan: Some(plan),
            action: Some(action_taken),
            observation: Some(observation),
            reflection: Some(reflection),
            decision,
            timestamp: String::new(),
        };

        CycleResult { state, decision, proposed_tasks, summary }
    }

    async fn plan_phase(
        &self,
        task_context: &str,
        history: &[CycleResult],
        cycle_id: u64,
        limits: &BudgetLimits,
    ) -> Plan {
        let prompt = plan_prompt(task_context, history, cycle_id, limits);
        let messages = [Message::user(prompt)];
        match self.llm.chat(&messages).await {
            Ok(response) => match parse_defensive::<WirePlan>(&response.content) {
                Ok(wire) => plan_from_wire(wire),
                Err(err) => {
                    tracing::warn!(%err, "PLAN response could not be parsed, falling back");
                    Plan::parse_failure_fallback()
                }
            },
            Err(err) => {
                tracing::warn!(%err, "PLAN request failed, falling back");
                Plan::parse_failure_fallback()
            }
        }
    }

    async fn act_phase(&self, action: &Action, scratch_dir: &Path) -> Observation {
        let start = Instant::now();
        match action {
            Action::ExecuteCommand { command } => {
                let mut parts = command.split_whitespace();
                let Some(program) = parts.next() else {
                    return Observation {
                        success: false,
                        output: String::new(),
                        error: Some("empty command".into()),
                        duration_ms: elapsed_ms(start),
                        files_modified: vec![],
                    };
                };
                let args: Vec<String> = parts.map(String::from).collect();
                match self.executor.execute(program, &args, Some(scratch_dir), Duration::from_secs(60)).await {
                    Ok(result) => Observation {
                        success: result.success(),
                        output: result.stdout,
                        error: (!result.success()).then_some(result.stderr),
                        duration_ms: result.duration_ms,
                        files_modified: vec![],
                    },
                    Err(err) => Observation {
                        success: false,
                        output: String::new(),
                        error: Some(err.to_string()),
                        duration_ms: elapsed_ms(start),
                        files_modified: vec![],
                    },
                }
            }
            Action::ReadFile { path } => match std::fs::read_to_string(path) {
                Ok(mut content) => {
                    content.truncate(READ_FILE_LIMIT.min(content.len()));
                    Observation {
                        success: true,
                        output: content,
                        error: None,
                        duration_ms: elapsed_ms(start),
                        files_modified: vec![],
                    }
                }
                Err(err) => Observation {
                    success: false,
                    output: String::new(),
                    error: Some(err.to_string()),
                    duration_ms: elapsed_ms(start),
                    files_modified: vec![],
                },
            },
            Action::WriteFile { path, content } => {
                let write_result = std::path::Path::new(path)
                    .parent()
                    .map(std::fs::create_dir_all)
                    .unwrap_or(Ok(()))
                    .and_then(|_| std::fs::write(path, content));
                match write_result {
                    Ok(()) => Observation {
                        success: true,
                        output: format!("wrote {} bytes", content.len()),
                        error: None,
                        duration_ms: elapsed_ms(start),
                        files_modified: vec![path.clone()],
                    },
                    Err(err) => Observation {
                        success: false,
                        output: String::new(),
                        error: Some(err.to_string()),
                        duration_ms: elapsed_ms(start),
                        files_modified: vec![],
                    },
                }
            }
            Action::InternalReasoning { text } => Observation {
                success: true,
                output: text.clone(),
                error: None,
                duration_ms: elapsed_ms(start),
                files_modified: vec![],
            },
            Action::AskUser { .. } | Action::CompleteTask { .. } | Action::BlockTask { .. } => {
                unreachable!("terminal actions short-circuit before act_phase")
            }
        }
    }

    async fn reflect_phase(
        &self,
        task_context: &str,
        action: &Action,
        observation: &Observation,
        history: &[CycleResult],
    ) -> Reflection {
        let prompt = reflect_prompt(
            task_context,
            action.label(),
            observation.success,
            &observation.output,
            observation.error.as_deref(),
            history,
        );
        let messages = [Message::user(prompt)];
        let mut reflection = match self.llm.chat(&messages).await {
            Ok(response) => parse_defensive::<Reflection>(&response.content).unwrap_or_else(|err| {
                tracing::warn!(%err, "REFLECT response could not be parsed, falling back");
                Reflection::parse_failure_fallback()
            }),
            Err(err) => {
                tracing::warn!(%err, "REFLECT request failed, falling back");
                Reflection::parse_failure_fallback()
            }
        };
        if reflection.stuck_indicators.is_empty() {
            reflection.stuck_indicators = StuckDetector::stuck_indicators(history);
        }
        reflection
    }

    async fn decide_phase(&self, reflection: &Reflection, counters: &BudgetCounters, limits: &BudgetLimits) -> Decision {
        let prompt = decide_prompt(&reflection.next_step_suggestion, counters, limits);
        let messages = [Message::user(prompt)];
        match self.llm.chat(&messages).await {
            Ok(response) => Decision::parse_tolerant(&response.content),
            Err(err) => {
                tracing::warn!(%err, "DECIDE request failed, defaulting to CONTINUE");
                Decision::Continue
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
#[path = "cycle_engine_tests.rs"]
mod tests;
