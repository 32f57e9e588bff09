// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt templates for the PLAN, REFLECT, and DECIDE phases. Reworded
//! from `original_source/runtime/tooeybot/prompts.py`'s structure — the
//! same required fields, phrased in this codebase's own voice rather
//! than translated.

use vigil_core::{BudgetCounters, BudgetLimits, CycleResult};

/// A compact, redacted rendering of one past cycle for inclusion in the
/// recent-cycle summary. Truncates output to 500 bytes per spec.md §4.10.
fn summarize_cycle(result: &CycleResult) -> String {
    let action_label = result.state.action.as_ref().map(|a| a.label()).unwrap_or("none");
    let (success, output, error) = match &result.state.observation {
        Some(obs) => {
            let mut output = obs.output.clone();
            if output.len() > 500 {
                output.truncate(500);
                output.push_str("...");
            }
            (obs.success, output, obs.error.clone().unwrap_or_default())
        }
        None => (false, String::new(), String::new()),
    };
    let what_learned = result.state.reflection.as_ref().map(|r| r.what_learned.as_str()).unwrap_or("");
    format!(
        "- action={action_label} success={success} output={output:?} error={error:?} learned={what_learned:?}"
    )
}

fn recent_cycle_summary(history: &[CycleResult]) -> String {
    if history.is_empty() {
        return "(no prior cycles)".to_string();
    }
    history.iter().rev().take(5).collect::<Vec<_>>().into_iter().rev().map(summarize_cycle).collect::<Vec<_>>().join("\n")
}

/// Builds the PLAN-phase prompt.
pub fn plan_prompt(task_context: &str, history: &[CycleResult], cycle_id: u64, limits: &BudgetLimits) -> String {
    format!(
        "You are driving a single task through its next step.\n\n\
         ## Task context\n{task_context}\n\n\
         ## Recent cycles\n{recent}\n\n\
         This is cycle {cycle_id} of at most {max_iterations}.\n\n\
         Respond with a single JSON object:\n\
         {{\"goal\": string, \"approach\": string, \
         \"next_action\": {{\"action_type\": string, \"payload\": object, \"reasoning\": string}}, \
         \"remaining_steps\": [string], \"confidence\": number}}\n\
         `action_type` must be one of: execute_command, read_file, write_file, ask_user, \
         internal_reasoning, complete_task, block_task.",
        recent = recent_cycle_summary(history),
        max_iterations = limits.max_iterations_per_task,
    )
}

/// Builds the REFLECT-phase prompt.
pub fn reflect_prompt(task_context: &str, action_label: &str, success: bool, output: &str, error: Option<&str>, history: &[CycleResult]) -> String {
    format!(
        "You just took an action on this task; assess what happened.\n\n\
         ## Task context\n{task_context}\n\n\
         ## Action taken\n{action_label}\n\n\
         ## Result\nsuccess={success}\noutput={output:?}\nerror={error:?}\n\n\
         ## Recent cycles\n{recent}\n\n\
         Respond with a single JSON object:\n\
         {{\"progress_made\": bool, \"what_learned\": string, \"plan_still_valid\": bool, \
         \"stuck_indicators\": [string], \"confidence\": number, \"next_step_suggestion\": string, \
         \"proposed_tasks\": [{{\"description\": string, \"justification\": string, \"priority\": string, \
         \"estimated_value\": number, \"category\": string}}]}}",
        recent = recent_cycle_summary(history),
        error = error.unwrap_or(""),
    )
}

/// Builds the DECIDE-phase prompt.
pub fn decide_prompt(reflection_summary: &str, counters: &BudgetCounters, limits: &BudgetLimits) -> String {
    format!(
        "Given this reflection and the current budget, choose exactly one token: \
         CONTINUE, COMPLETE, BLOCKED, or ASK_USER.\n\n\
         ## Reflection\n{reflection_summary}\n\n\
         ## Budget\niterations={iterations}/{max_iterations} \
         consecutive_failures={failures}/{max_failures} \
         actions_without_progress={stalled}/{max_stalled}\n\n\
         Respond with only the token.",
        iterations = counters.iterations,
        max_iterations = limits.max_iterations_per_task,
        failures = counters.consecutive_failures,
        max_failures = limits.max_consecutive_failures,
        stalled = counters.actions_without_progress,
        max_stalled = limits.max_actions_without_progress,
    )
}

#[cfg(test)]
#[path = "prompts_tests.rs"]
mod tests;
