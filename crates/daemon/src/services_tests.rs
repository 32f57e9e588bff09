// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::Config;

#[test]
fn from_config_derives_context_budget_from_max_tokens_minus_reserve() {
    let mut config = Config::default();
    config.context.max_tokens = 1_000;
    config.context.response_reserve = 200;
    let services = Services::from_config(&config);
    assert_eq!(services.context_token_budget, 800);
}

#[test]
fn from_config_carries_budgets_section_into_limits() {
    let mut config = Config::default();
    config.budgets.max_iterations_per_task = 42;
    let services = Services::from_config(&config);
    assert_eq!(services.limits.max_iterations_per_task, 42);
}

#[test]
fn from_config_uses_curiosity_max_proposals_per_cycle() {
    let mut config = Config::default();
    config.curiosity.max_proposals_per_cycle = 9;
    let services = Services::from_config(&config);
    assert_eq!(services.curiosity_policy.max_proposals_per_cycle, 9);
}
