// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `summarize`, `snapshot`, `restore`, and `maintain` call straight
//! through to the configured `Maintenance` collaborator (`NoopMaintenance`
//! by default, per spec.md §6 — snapshot/restore/summary generation use
//! an external VCS whose identity is out of scope for this core).

use std::path::Path;

use anyhow::{bail, Context, Result};
use vigil_daemon::{Config, Services};

fn load_services(config_path: &Path) -> Result<Services> {
    let config = Config::load(config_path).with_context(|| format!("loading config at {}", config_path.display()))?;
    Ok(Services::from_config(&config))
}

pub async fn summarize(config_path: &Path, date: Option<&str>) -> Result<()> {
    let services = load_services(config_path)?;
    match services.maintenance.write_daily_summary(date).await {
        Some(path) => {
            println!("wrote summary to {}", path.display());
            Ok(())
        }
        None => bail!("no maintenance collaborator configured"),
    }
}

pub async fn snapshot(config_path: &Path, reason: Option<&str>) -> Result<()> {
    let services = load_services(config_path)?;
    let result = services.maintenance.create_snapshot(reason.unwrap_or("manual")).await;
    if result.success {
        println!("snapshot created: commit={:?} tag={:?}", result.commit, result.tag);
        Ok(())
    } else {
        bail!(result.error.unwrap_or_else(|| "snapshot failed".into()))
    }
}

pub async fn restore(config_path: &Path, reference: &str) -> Result<()> {
    let services = load_services(config_path)?;
    let result = services.maintenance.restore_snapshot(reference).await;
    if result.success {
        println!("restored to {reference}");
        Ok(())
    } else {
        bail!(result.error.unwrap_or_else(|| "restore failed".into()))
    }
}

pub async fn maintain(config_path: &Path) -> Result<()> {
    let services = load_services(config_path)?;
    let result = services.maintenance.run_daily_maintenance().await;

    match &result.summary_path {
        Some(path) => println!("summary: {}", path.display()),
        None => println!("summary: (none)"),
    }
    println!("snapshot: success={}", result.snapshot.success);
    println!("promoted: {:?}", result.promote.promoted);

    if !result.snapshot.success {
        bail!(result.snapshot.error.unwrap_or_else(|| "daily maintenance failed".into()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod tests;
