// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The outer loop: select one task, drive it through one cycle at a
//! time, commit each cycle's results, and act on what it decides.
//! Grounded on spec.md §4.11 and the original's `agent.py::run`/
//! `process_task` split. `tick()` runs exactly one cycle (or a
//! pre-cycle budget/stuck pause) and returns — it's the single-pass
//! unit the CLI's `tick` subcommand drives directly; `run()` is what
//! repeats it for an active task and paces CONTINUE cycles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use vigil_core::{
    BudgetCounters, BudgetEnforcer, Clock, CommandRun, CycleResult, Decision, Event, EventContext, Execution,
    Level, Metadata, Outcomes, Task,
};
use vigil_engine::{ContextItem, CuriosityAdmitter, CuriosityFilter, CycleEngine, StuckDetector};
use vigil_storage::{BudgetStore, CycleLog, EventLog, TaskStore};

use crate::services::Services;

/// Outcome of one `tick()` call, returned to callers (the CLI's `tick`
/// command, and `run`'s own loop) so they can decide whether to re-tick
/// immediately or sleep.
#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    pub success: bool,
    pub task_processed: Option<String>,
    pub message: String,
    pub cycles_run: u32,
    pub decision: Option<Decision>,
    pub curiosity_tasks_created: u32,
}

impl TickResult {
    fn idle(message: impl Into<String>) -> Self {
        TickResult {
            success: true,
            task_processed: None,
            message: message.into(),
            cycles_run: 0,
            decision: None,
            curiosity_tasks_created: 0,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        TickResult {
            success: false,
            task_processed: None,
            message: message.into(),
            cycles_run: 0,
            decision: None,
            curiosity_tasks_created: 0,
        }
    }
}

/// Runs a single select-work-and-drive-it pass. Never blocks beyond the
/// LM/executor calls it makes; sleeping between ticks is `run`'s job.
pub async fn tick(services: &Services) -> TickResult {
    let task_store = TaskStore::new(&services.paths);
    let budget_store = BudgetStore::new(&services.paths);
    let cycle_log = CycleLog::new(&services.paths);
    let event_log = EventLog::new(&services.paths);
    let curiosity_admitter = CuriosityAdmitter::new(&services.paths);

    let (task, freshly_activated) = match task_store.active_task() {
        Ok(Some(task)) => (task, false),
        Ok(None) => match select_next_pending(&task_store) {
            Ok(Some(task)) => (task, true),
            Ok(None) => return TickResult::idle("no pending or active task"),
            Err(err) => return TickResult::failed(format!("failed to read inbox: {err}")),
        },
        Err(err) => return TickResult::failed(format!("failed to read active task: {err}")),
    };

    let mut counters = budget_store.load(services.clock.as_ref());
    if freshly_activated {
        counters.reset_for_task(services.clock.now_ms());
    }

    let (can_continue, pause_reason) =
        BudgetEnforcer::can_continue(&services.limits, &counters, services.clock.now_ms());
    if !can_continue {
        let reason = pause_reason.unwrap_or_else(|| "budget exhausted".into());
        return pause_and_finish(&task_store, &task, &reason, &event_log, services);
    }

    let history = match cycle_log.load(task.task_id.as_str()) {
        Ok(history) => history,
        Err(err) => return TickResult::failed(format!("failed to load cycle history: {err}")),
    };

    if let Some(reason) = StuckDetector::default().check(&history) {
        return pause_and_finish(&task_store, &task, &reason.message(), &event_log, services);
    }

    let task_context = build_task_context(services, &task);
    let cycle_engine = CycleEngine::new(services.llm.as_ref(), &services.executor);
    let cycle_id = history.len() as u64 + 1;

    let mut result = cycle_engine
        .run(
            &task,
            &task_context,
            cycle_id,
            &history,
            &services.limits,
            &counters,
            &services.paths.scratch_dir(),
        )
        .await;
    result.state.timestamp = services.clock.now_iso8601();

    if let Err(err) = cycle_log.append(task.task_id.as_str(), &result) {
        tracing::error!(%err, task_id = %task.task_id, "failed to append cycle log, aborting tick");
        return TickResult::failed(format!("failed to append cycle log: {err}"));
    }

    let had_failure = result.state.observation.as_ref().is_some_and(|o| !o.success);
    let made_progress = result.state.reflection.as_ref().is_some_and(|r| r.progress_made);
    counters.record(made_progress, had_failure);
    if let Err(err) = budget_store.save(&counters) {
        tracing::error!(%err, task_id = %task.task_id, "failed to persist budget counters, aborting tick");
        return TickResult::failed(format!("failed to persist budget counters: {err}"));
    }

    event_log.append(&cycle_complete_event(&task, &result, services.clock.as_ref()), services.clock.as_ref());

    let curiosity_tasks_created =
        admit_curiosity(services, &task_store, &curiosity_admitter, &task, &result, &mut counters);

    match result.decision {
        Decision::Continue => {}
        Decision::Complete => {
            let summary = result.summary.clone();
            if let Err(err) = task_store.complete(&task, &summary, "", &[], None, services.clock.as_ref()) {
                return TickResult::failed(format!("failed to record completion: {err}"));
            }
        }
        Decision::Blocked => {
            if let Err(err) = task_store.block(&task, &result.summary, services.clock.as_ref()) {
                return TickResult::failed(format!("failed to record block: {err}"));
            }
        }
        Decision::AskUser | Decision::BudgetExceeded => {
            let reason = if result.decision == Decision::AskUser {
                format!("waiting on user: {}", result.summary)
            } else {
                "budget exceeded".to_string()
            };
            if let Err(err) = task_store.pause(&task.task_id, &reason) {
                return TickResult::failed(format!("failed to record pause: {err}"));
            }
        }
    }

    TickResult {
        success: true,
        task_processed: Some(task.task_id.to_string()),
        message: "tick complete".into(),
        cycles_run: 1,
        decision: Some(result.decision),
        curiosity_tasks_created,
    }
}

fn pause_and_finish(
    task_store: &TaskStore<'_>,
    task: &Task,
    reason: &str,
    event_log: &EventLog<'_>,
    services: &Services,
) -> TickResult {
    if let Err(err) = task_store.pause(&task.task_id, reason) {
        return TickResult::failed(format!("failed to pause task after budget check: {err}"));
    }
    event_log.append(
        &Event::new(services.clock.now_iso8601(), "tick.paused")
            .with_level(Level::Warning)
            .with_context(EventContext {
                task_id: Some(task.task_id.to_string()),
                triggering_skill: None,
                intent: None,
            }),
        services.clock.as_ref(),
    );
    TickResult {
        success: true,
        task_processed: Some(task.task_id.to_string()),
        message: reason.to_string(),
        cycles_run: 0,
        decision: Some(Decision::BudgetExceeded),
        curiosity_tasks_created: 0,
    }
}

fn select_next_pending(task_store: &TaskStore<'_>) -> Result<Option<Task>, vigil_storage::StorageError> {
    let pending = task_store.pending_tasks()?;
    let Some(next) = pending.into_iter().next() else {
        return Ok(None);
    };
    task_store.activate(&next.task_id).map(Some)
}

fn build_task_context(services: &Services, task: &Task) -> String {
    let assembler = services.context_assembler();
    let mut items = vec![ContextItem::current_task(render_task(task))];

    let working = vigil_engine::WorkingMemoryProvider::new(&services.paths);
    let long_term = vigil_engine::LongTermMemoryProvider::new(&services.paths);
    let beliefs = vigil_engine::BeliefProvider::new(&services.paths);
    let skills = vigil_engine::SkillProvider::new(&services.paths);
    let byte_budget = services.context_token_budget * vigil_engine::context::CHARS_PER_TOKEN;

    if let Some(snippet) = vigil_engine::ContextProvider::snippet(&working, byte_budget) {
        items.push(ContextItem::working_memory(snippet));
    }
    if let Some(snippet) = vigil_engine::ContextProvider::snippet(&long_term, byte_budget) {
        items.push(ContextItem::long_term_memory(snippet));
    }
    if let Some(snippet) = vigil_engine::ContextProvider::snippet(&beliefs, byte_budget) {
        items.push(ContextItem::beliefs(snippet));
    }
    if let Some(snippet) = vigil_engine::ContextProvider::snippet(&skills, byte_budget) {
        items.push(ContextItem::skills(snippet));
    }

    assembler.assemble(items)
}

fn render_task(task: &Task) -> String {
    let criteria = if task.success_criteria.is_empty() {
        String::new()
    } else {
        format!("\nSuccess criteria:\n{}", task.success_criteria.iter().map(|c| format!("- {c}")).collect::<Vec<_>>().join("\n"))
    };
    format!(
        "Task {id}: {description}{criteria}",
        id = task.task_id,
        description = task.description,
    )
}

fn cycle_complete_event(task: &Task, result: &CycleResult, clock: &dyn Clock) -> Event {
    let execution = result.state.action.as_ref().map(|action| Execution {
        commands: vec![CommandRun { cmd: action.label().into(), args: vec![], cwd: String::new() }],
        exit_codes: vec![],
        duration_ms: result.state.observation.as_ref().map(|o| o.duration_ms).unwrap_or(0),
    });
    let outcomes = result.state.observation.as_ref().map(|o| Outcomes {
        files_modified: o.files_modified.clone(),
        artifacts_created: vec![],
        observations: o.output.clone(),
    });
    let metadata = Metadata {
        llm_model: None,
        context_tokens: None,
        confidence: result.state.reflection.as_ref().map(|r| r.confidence),
        curiosity_spend: Some(result.proposed_tasks.len() as u32),
    };

    let mut event = Event::new(clock.now_iso8601(), "cycle_complete")
        .with_context(EventContext {
            task_id: Some(task.task_id.to_string()),
            triggering_skill: None,
            intent: Some(result.decision.as_str().to_string()),
        })
        .with_metadata(metadata);
    if let Some(execution) = execution {
        event = event.with_execution(execution);
    }
    if let Some(outcomes) = outcomes {
        event = event.with_outcomes(outcomes);
    }
    event
}

/// Runs the Reflection Analyzer's curiosity filter over this cycle's
/// proposals, logs every rejection with its specific reason, then admits
/// the survivors against the Budget Ledger. Returns the number admitted.
fn admit_curiosity(
    services: &Services,
    task_store: &TaskStore<'_>,
    admitter: &CuriosityAdmitter<'_>,
    task: &Task,
    result: &CycleResult,
    counters: &mut BudgetCounters,
) -> u32 {
    if result.proposed_tasks.is_empty() {
        return 0;
    }

    let pending_descriptions: Vec<String> = task_store
        .pending_tasks()
        .map(|tasks| tasks.into_iter().map(|t| t.description).collect())
        .unwrap_or_default();

    let filter = CuriosityFilter {
        min_value_threshold: services.limits.min_curiosity_value_threshold,
        max_proposals_per_cycle: services.curiosity_policy.max_proposals_per_cycle,
        allowed_categories: services.curiosity_policy.allowed_categories.clone(),
    };

    for rejected in proposals_rejected_by_filter(&filter, &result.proposed_tasks, &pending_descriptions) {
        admitter.log_rejection(&task.task_id, &rejected.0, &rejected.1, services.clock.as_ref());
    }

    let survivors = filter.filter(result.proposed_tasks.clone(), &pending_descriptions);
    if survivors.is_empty() {
        return 0;
    }

    let pending_n = pending_descriptions.len() as u32;
    match admitter.admit(
        survivors,
        &task.task_id,
        task.curiosity_depth,
        pending_n,
        &services.limits,
        counters,
        services.clock.as_ref(),
    ) {
        Ok(admitted) => admitted.len() as u32,
        Err(err) => {
            tracing::warn!(%err, task_id = %task.task_id, "failed to admit curiosity proposals");
            0
        }
    }
}

/// Classifies each proposal the filter would reject with the specific
/// predicate it failed, so `logs/curiosity.jsonl` records a meaningful
/// reason even for proposals the Budget Ledger never sees.
fn proposals_rejected_by_filter(
    filter: &CuriosityFilter,
    proposals: &[vigil_core::CuriosityProposal],
    pending_descriptions: &[String],
) -> Vec<(String, String)> {
    proposals
        .iter()
        .filter_map(|p| {
            let reason = if p.estimated_value < filter.min_value_threshold {
                Some("low_value")
            } else if !filter.allowed_categories.contains(&p.category) {
                Some("disallowed_category")
            } else if p.justification.len() < 10 || p.description.len() < 20 {
                Some("malformed")
            } else if overlaps_existing(&p.description, pending_descriptions) {
                Some("duplicate")
            } else {
                None
            };
            reason.map(|reason| (p.description.clone(), reason.to_string()))
        })
        .collect()
}

fn overlaps_existing(description: &str, pending_descriptions: &[String]) -> bool {
    let tokens: std::collections::HashSet<String> =
        description.split_whitespace().map(|w| w.to_ascii_lowercase()).collect();
    if tokens.is_empty() {
        return false;
    }
    pending_descriptions.iter().any(|existing| {
        let existing_tokens: std::collections::HashSet<String> =
            existing.split_whitespace().map(|w| w.to_ascii_lowercase()).collect();
        let overlap = tokens.iter().filter(|t| existing_tokens.contains(*t)).count();
        overlap as f64 / tokens.len() as f64 >= 0.7
    })
}

/// A CONTINUE decision re-ticks the same task almost immediately, but
/// pauses this long first so the loop doesn't hammer the LM back to
/// back — spec.md §4.11 step 8's "sleep ~500ms and loop".
const CONTINUE_PAUSE: Duration = Duration::from_millis(500);

/// Runs `tick()` in a loop: pauses briefly and re-ticks when a cycle
/// says CONTINUE, re-ticks immediately on a terminal decision (so the
/// next pending task is picked up without delay), sleeps `interval`
/// when idle, and stops cleanly when `shutdown` is set — checked only
/// at cycle boundaries, never mid-cycle, so a task is never left
/// half-committed.
pub async fn run(services: &Services, interval: Duration, shutdown: &AtomicBool) {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        let result = tick(services).await;
        if let Some(task_id) = &result.task_processed {
            tracing::info!(task_id, cycles = result.cycles_run, message = %result.message, "tick processed a task");
        }

        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        if result.task_processed.is_none() {
            tokio::time::sleep(interval).await;
        } else if result.decision == Some(Decision::Continue) {
            tokio::time::sleep(CONTINUE_PAUSE).await;
        }
    }

    let event_log = EventLog::new(&services.paths);
    event_log.append(
        &Event::new(services.clock.now_iso8601(), "shutdown").with_level(Level::Info),
        services.clock.as_ref(),
    );
}

/// Installs SIGINT/SIGTERM handlers that flip a shared flag `run` polls
/// at cycle boundaries, per spec.md §4.11's "signals are never handled
/// mid-cycle" requirement.
#[cfg(unix)]
pub fn install_shutdown_handler() -> std::sync::Arc<AtomicBool> {
    let flag = std::sync::Arc::new(AtomicBool::new(false));
    let sigterm_flag = flag.clone();
    tokio::spawn(async move {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(sig) => sig,
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                return;
            }
        };
        let mut sigint = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()) {
            Ok(sig) => sig,
            Err(err) => {
                tracing::error!(%err, "failed to install SIGINT handler");
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down at next cycle boundary"),
            _ = sigint.recv() => tracing::info!("received SIGINT, shutting down at next cycle boundary"),
        }
        sigterm_flag.store(true, Ordering::SeqCst);
    });
    flag
}

#[cfg(test)]
#[path = "agent_loop_tests.rs"]
mod tests;
