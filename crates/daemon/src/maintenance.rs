// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Maintenance collaborator contract, spec.md §6: daily-summary
//! generation, snapshot/restore via an external VCS, and memory
//! promotion are maintenance jobs the core invokes but does not
//! implement (spec.md §1's explicit out-of-scope list). `NoopMaintenance`
//! is the default wired into `Services` — a concrete VCS-backed
//! implementation is a deployment-specific collaborator, not part of
//! this core.

use std::path::PathBuf;

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct SnapshotResult {
    pub success: bool,
    pub commit: Option<String>,
    pub tag: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PromoteResult {
    pub promoted: Vec<String>,
    pub working_cleared: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PreflightReport {
    pub checks: Vec<(String, bool)>,
}

impl PreflightReport {
    pub fn all_ok(&self) -> bool {
        self.checks.iter().all(|(_, ok)| *ok)
    }
}

#[derive(Debug, Clone)]
pub struct DailyMaintenanceResult {
    pub summary_path: Option<PathBuf>,
    pub snapshot: SnapshotResult,
    pub promote: PromoteResult,
}

#[async_trait]
pub trait Maintenance: Send + Sync {
    async fn write_daily_summary(&self, date: Option<&str>) -> Option<PathBuf>;
    async fn create_snapshot(&self, reason: &str) -> SnapshotResult;
    async fn restore_snapshot(&self, reference: &str) -> RestoreResult;
    async fn promote_memory(&self) -> PromoteResult;
    async fn preflight(&self) -> PreflightReport;
    async fn run_daily_maintenance(&self) -> DailyMaintenanceResult;
}

/// The default `Maintenance` implementation: every operation reports
/// itself as unimplemented rather than silently succeeding, so a caller
/// can distinguish "nothing to do" from "no collaborator wired up".
pub struct NoopMaintenance;

#[async_trait]
impl Maintenance for NoopMaintenance {
    async fn write_daily_summary(&self, _date: Option<&str>) -> Option<PathBuf> {
        None
    }

    async fn create_snapshot(&self, _reason: &str) -> SnapshotResult {
        SnapshotResult {
            success: false,
            commit: None,
            tag: None,
            error: Some("no maintenance collaborator configured".into()),
        }
    }

    async fn restore_snapshot(&self, _reference: &str) -> RestoreResult {
        RestoreResult { success: false, error: Some("no maintenance collaborator configured".into()) }
    }

    async fn promote_memory(&self) -> PromoteResult {
        PromoteResult::default()
    }

    async fn preflight(&self) -> PreflightReport {
        PreflightReport::default()
    }

    async fn run_daily_maintenance(&self) -> DailyMaintenanceResult {
        DailyMaintenanceResult {
            summary_path: None,
            snapshot: self.create_snapshot("daily").await,
            promote: PromoteResult::default(),
        }
    }
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod tests;
