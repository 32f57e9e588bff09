// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four subcommands wired straight into `vigil-daemon`: `tick`,
//! `run`, `health`, and `init`.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use vigil_daemon::{agent_loop, Config, Services};
use vigil_storage::AgentPaths;

const ACTIVE_TASK_SENTINEL: &str = "# Active Task\n\n*No active task*\n";

fn load_config(config_path: &Path) -> Result<Config> {
    Config::load(config_path).with_context(|| format!("loading config at {}", config_path.display()))
}

pub async fn tick(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let _log_guard = vigil_daemon::logging::init(&config.logging, &config.agent_home.join("logs"))
        .context("initializing logging")?;

    let services = Services::from_config(&config);
    let result = agent_loop::tick(&services).await;

    println!("{}", serde_json::to_string_pretty(&result).context("serializing tick result")?);

    if !result.success {
        bail!(result.message);
    }
    Ok(())
}

pub async fn run(config_path: &Path, interval: Duration) -> Result<()> {
    let config = load_config(config_path)?;
    let _log_guard = vigil_daemon::logging::init(&config.logging, &config.agent_home.join("logs"))
        .context("initializing logging")?;

    let services = Services::from_config(&config);
    let shutdown = agent_loop::install_shutdown_handler();

    println!("vigil: ticking every {}s, Ctrl-C to stop", interval.as_secs());
    agent_loop::run(&services, interval, &shutdown).await;
    Ok(())
}

pub async fn health(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let services = Services::from_config(&config);

    let llm_ok = services.llm.health().await;
    let home_ok = services.paths.root.is_dir();

    println!("llm:  {}", if llm_ok { "ok" } else { "unreachable" });
    println!(
        "home: {}",
        if home_ok { format!("ok ({})", services.paths.root.display()) } else { "missing".to_string() }
    );

    if !llm_ok || !home_ok {
        bail!("one or more health checks failed");
    }
    Ok(())
}

pub fn init(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let paths = AgentPaths::new(config.agent_home.clone());

    for dir in paths.skeleton() {
        std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    if !paths.inbox_md().exists() {
        std::fs::write(paths.inbox_md(), "").context("writing inbox.md")?;
    }
    if !paths.active_md().exists() {
        std::fs::write(paths.active_md(), ACTIVE_TASK_SENTINEL).context("writing active.md")?;
    }
    if !paths.curiosity_log().exists() {
        std::fs::write(paths.curiosity_log(), "").context("writing curiosity.jsonl")?;
    }

    println!("initialized agent home at {}", paths.root.display());
    Ok(())
}

#[cfg(test)]
#[path = "core_tests.rs"]
mod tests;
