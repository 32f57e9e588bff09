// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bundles every collaborator the Agent Loop drives, constructed once at
//! startup per spec.md §9's "Global mutable state" design note: "pass a
//! `Services` record through the Agent Loop; construct once at startup."

use std::sync::Arc;

use vigil_core::{BudgetLimits, Clock, CuriosityCategory, SystemClock};
use vigil_engine::ContextAssembler;
use vigil_llm::{create_client, LlmClient, LlmConfig};
use vigil_shell::Executor;
use vigil_storage::AgentPaths;

use crate::config::Config;
use crate::maintenance::{Maintenance, NoopMaintenance};

/// Curiosity knobs that live outside `BudgetLimits` (the admitter's
/// per-cycle proposal cap and category allow-list), read straight off the
/// config's `curiosity` section.
#[derive(Debug, Clone)]
pub struct CuriosityPolicy {
    pub max_proposals_per_cycle: usize,
    pub allowed_categories: Vec<CuriosityCategory>,
}

impl Default for CuriosityPolicy {
    fn default() -> Self {
        CuriosityPolicy {
            max_proposals_per_cycle: 2,
            allowed_categories: vec![
                CuriosityCategory::Verification,
                CuriosityCategory::Documentation,
                CuriosityCategory::Robustness,
                CuriosityCategory::Exploration,
            ],
        }
    }
}

pub struct Services {
    pub paths: AgentPaths,
    pub clock: Arc<dyn Clock>,
    pub llm: Arc<dyn LlmClient>,
    pub executor: Executor,
    pub maintenance: Arc<dyn Maintenance>,
    pub limits: BudgetLimits,
    pub curiosity_policy: CuriosityPolicy,
    pub context_token_budget: usize,
    pub command_timeout_secs: u64,
}

impl Services {
    /// Builds the full collaborator set from a loaded `Config`. The LM
    /// client is selected through `vigil_llm::create_client`, per spec.md
    /// §9's provider-abstraction design note; `maintenance` defaults to
    /// `NoopMaintenance` since no VCS-backed implementation is part of
    /// this core (spec.md §1).
    pub fn from_config(config: &Config) -> Services {
        let paths = AgentPaths::new(config.agent_home.clone());
        let llm_config: LlmConfig = config.llm.clone();
        Services {
            llm: create_client(&llm_config),
            executor: Executor::new(paths.scratch_dir()),
            maintenance: Arc::new(NoopMaintenance),
            limits: config.budget_limits(),
            curiosity_policy: CuriosityPolicy {
                max_proposals_per_cycle: config.curiosity.max_proposals_per_cycle,
                ..CuriosityPolicy::default()
            },
            context_token_budget: config.context.max_tokens.saturating_sub(config.context.response_reserve),
            command_timeout_secs: config.execution.command_timeout,
            clock: Arc::new(SystemClock),
            paths,
        }
    }

    pub fn context_assembler(&self) -> ContextAssembler {
        ContextAssembler::new(self.context_token_budget)
    }
}

#[cfg(test)]
#[path = "services_tests.rs"]
mod tests;
