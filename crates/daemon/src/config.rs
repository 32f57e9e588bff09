// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YAML configuration file loading, per spec.md §6. Grounded on
//! `original_source/runtime/tooeybot/config.py`'s section layout
//! (`agent_home`, `llm`, `context`, `execution`, `budgets`, `curiosity`,
//! `logging`) and its `${VAR}` environment-variable expansion.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vigil_core::BudgetLimits;
use vigil_llm::LlmConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read { path: String, source: std::io::Error },

    #[error("failed to parse config file at {path}: {source}")]
    Parse { path: String, source: serde_yaml::Error },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_response_reserve")]
    pub response_reserve: usize,
}

fn default_max_tokens() -> usize {
    8_000
}
fn default_response_reserve() -> usize {
    2_000
}

impl Default for ContextConfig {
    fn default() -> Self {
        ContextConfig {
            max_tokens: default_max_tokens(),
            response_reserve: default_response_reserve(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_command_timeout")]
    pub command_timeout: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_command_timeout() -> u64 {
    300
}
fn default_max_retries() -> u32 {
    3
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            command_timeout: default_command_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

/// The subset of `BudgetLimits` the `budgets` config section carries; the
/// curiosity-specific limits live in `CuriosityConfig` instead, matching
/// the original's split between `BudgetConfig` and `CuriosityConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetsConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations_per_task: u32,
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
    #[serde(default = "default_max_actions_without_progress")]
    pub max_actions_without_progress: u32,
    #[serde(default = "default_max_active_tasks")]
    pub max_active_tasks: u32,
    #[serde(default = "default_max_pending_tasks")]
    pub max_pending_tasks: u32,
    #[serde(default = "default_max_task_duration_minutes")]
    pub max_task_duration_minutes: u32,
}

fn default_max_iterations() -> u32 {
    20
}
fn default_max_consecutive_failures() -> u32 {
    3
}
fn default_max_actions_without_progress() -> u32 {
    5
}
fn default_max_active_tasks() -> u32 {
    1
}
fn default_max_pending_tasks() -> u32 {
    100
}
fn default_max_task_duration_minutes() -> u32 {
    60
}

impl Default for BudgetsConfig {
    fn default() -> Self {
        BudgetsConfig {
            max_iterations_per_task: default_max_iterations(),
            max_consecutive_failures: default_max_consecutive_failures(),
            max_actions_without_progress: default_max_actions_without_progress(),
            max_active_tasks: default_max_active_tasks(),
            max_pending_tasks: default_max_pending_tasks(),
            max_task_duration_minutes: default_max_task_duration_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuriosityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_proposals_per_cycle")]
    pub max_proposals_per_cycle: usize,
    #[serde(default = "default_min_value_threshold")]
    pub min_value_threshold: f64,
    #[serde(default = "default_max_tasks_per_day")]
    pub max_tasks_per_day: u32,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_true() -> bool {
    true
}
fn default_max_proposals_per_cycle() -> usize {
    2
}
fn default_min_value_threshold() -> f64 {
    0.6
}
fn default_max_tasks_per_day() -> u32 {
    5
}
fn default_max_depth() -> u32 {
    2
}

impl Default for CuriosityConfig {
    fn default() -> Self {
        CuriosityConfig {
            enabled: default_true(),
            max_proposals_per_cycle: default_max_proposals_per_cycle(),
            min_value_threshold: default_min_value_threshold(),
            max_tasks_per_day: default_max_tasks_per_day(),
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub console: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig { level: default_log_level(), console: default_true() }
    }
}

fn default_agent_home() -> PathBuf {
    PathBuf::from("/agent")
}

/// The full daemon configuration, loaded from a YAML file per spec.md §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_agent_home")]
    pub agent_home: PathBuf,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub budgets: BudgetsConfig,
    #[serde(default)]
    pub curiosity: CuriosityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            agent_home: default_agent_home(),
            llm: LlmConfig::default(),
            context: ContextConfig::default(),
            execution: ExecutionConfig::default(),
            budgets: BudgetsConfig::default(),
            curiosity: CuriosityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Loads and parses `path`, expanding `${VAR}` references against the
    /// host environment first (missing variables substitute to `""`).
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let expanded = expand_env_vars(&raw);
        serde_yaml::from_str(&expanded).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Merges `budgets` and the budget-relevant fields of `curiosity` into
    /// the single `BudgetLimits` struct the engine and storage crates use.
    pub fn budget_limits(&self) -> BudgetLimits {
        BudgetLimits {
            max_iterations_per_task: self.budgets.max_iterations_per_task,
            max_consecutive_failures: self.budgets.max_consecutive_failures,
            max_actions_without_progress: self.budgets.max_actions_without_progress,
            max_active_tasks: self.budgets.max_active_tasks,
            max_pending_tasks: self.budgets.max_pending_tasks,
            max_task_duration_minutes: self.budgets.max_task_duration_minutes,
            max_curiosity_tasks_per_day: self.curiosity.max_tasks_per_day,
            max_curiosity_depth: self.curiosity.max_depth,
            min_curiosity_value_threshold: self.curiosity.min_value_threshold,
            curiosity_enabled: self.curiosity.enabled,
        }
    }
}

fn var_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"\$\{([^}]+)\}").expect("static env-var pattern is valid"))
}

/// Replaces every `${VAR}` occurrence with the host environment's value
/// for `VAR`, or an empty string if it is unset.
fn expand_env_vars(raw: &str) -> String {
    var_pattern()
        .replace_all(raw, |caps: &regex::Captures| std::env::var(&caps[1]).unwrap_or_default())
        .into_owned()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
