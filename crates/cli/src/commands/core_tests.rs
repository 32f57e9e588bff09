// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tempfile::TempDir;

use super::*;

fn write_config(dir: &TempDir, agent_home: &std::path::Path) -> std::path::PathBuf {
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        format!(
            "agent_home: {}\nllm:\n  provider: generic\n  model: test\n  base_url: http://127.0.0.1:1\n",
            agent_home.display()
        ),
    )
    .expect("write config");
    config_path
}

#[test]
fn init_creates_the_full_skeleton_and_sentinel_files() {
    let dir = TempDir::new().expect("tempdir");
    let home = dir.path().join("agent-home");
    let config_path = write_config(&dir, &home);

    init(&config_path).expect("init");

    assert!(home.join("tasks").join("inbox.md").exists());
    assert!(home.join("tasks").join("completed").is_dir());
    assert!(home.join("logs").join("events").is_dir());
    assert!(home.join("runtime").is_dir());

    let active = std::fs::read_to_string(home.join("tasks").join("active.md")).unwrap();
    assert!(active.contains("No active task"));
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().expect("tempdir");
    let home = dir.path().join("agent-home");
    let config_path = write_config(&dir, &home);

    init(&config_path).expect("first init");
    std::fs::write(home.join("tasks").join("inbox.md"), "existing content").unwrap();
    init(&config_path).expect("second init");

    let inbox = std::fs::read_to_string(home.join("tasks").join("inbox.md")).unwrap();
    assert_eq!(inbox, "existing content");
}

#[tokio::test]
async fn tick_on_an_empty_inbox_is_a_no_op() {
    let dir = TempDir::new().expect("tempdir");
    let home = dir.path().join("agent-home");
    let config_path = write_config(&dir, &home);

    init(&config_path).expect("init");

    let result = tick(&config_path).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn health_reports_failure_against_an_unreachable_provider() {
    let dir = TempDir::new().expect("tempdir");
    let home = dir.path().join("agent-home");
    let config_path = write_config(&dir, &home);

    init(&config_path).expect("init");

    let result = health(&config_path).await;
    assert!(result.is_err());
}
