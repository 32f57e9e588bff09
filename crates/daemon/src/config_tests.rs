// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, content).expect("write config");
    path
}

#[test]
fn loads_minimal_config_with_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "agent_home: /tmp/agent\n");
    let config = Config::load(&path).expect("config loads");
    assert_eq!(config.agent_home, PathBuf::from("/tmp/agent"));
    assert_eq!(config.budgets.max_iterations_per_task, 20);
    assert_eq!(config.curiosity.max_tasks_per_day, 5);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn expands_env_vars_before_parsing() {
    std::env::set_var("VIGIL_TEST_API_KEY", "sekret");
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        "agent_home: /tmp/agent\nllm:\n  provider: generic\n  model: m\n  api_key: \"${VIGIL_TEST_API_KEY}\"\n",
    );
    let config = Config::load(&path).expect("config loads");
    assert_eq!(config.llm.api_key.as_deref(), Some("sekret"));
    std::env::remove_var("VIGIL_TEST_API_KEY");
}

#[test]
fn missing_env_var_substitutes_empty_string() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        "agent_home: /tmp/agent\nllm:\n  provider: generic\n  model: m\n  api_key: \"${VIGIL_TEST_UNSET_VAR}\"\n",
    );
    let config = Config::load(&path).expect("config loads");
    assert_eq!(config.llm.api_key.as_deref(), Some(""));
}

#[test]
fn missing_file_surfaces_read_error() {
    let dir = TempDir::new().expect("tempdir");
    let result = Config::load(&dir.path().join("missing.yaml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn malformed_yaml_surfaces_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "agent_home: [this is not a valid mapping\n");
    let result = Config::load(&path);
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn budget_limits_merges_budgets_and_curiosity_sections() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        "agent_home: /tmp/agent\nbudgets:\n  max_iterations_per_task: 7\ncuriosity:\n  max_depth: 4\n  enabled: false\n",
    );
    let config = Config::load(&path).expect("config loads");
    let limits = config.budget_limits();
    assert_eq!(limits.max_iterations_per_task, 7);
    assert_eq!(limits.max_curiosity_depth, 4);
    assert!(!limits.curiosity_enabled);
}
