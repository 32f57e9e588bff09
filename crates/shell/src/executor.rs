// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs a single shell command with a wall-clock timeout and captured
//! output. No shell grammar is interpreted here — the caller supplies the
//! command and its argv directly; `bash -c "<script>"` is a valid call
//! shape but the script's contents are opaque to this crate.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::error::ExecutorError;
use crate::result::ExecutionResult;

/// Runs commands with a bounded timeout, capturing stdout/stderr.
pub struct Executor {
    scratch_dir: PathBuf,
}

impl Executor {
    /// `scratch_dir` is the default `cwd` for commands that don't specify
    /// one; it is created lazily on first use, not at construction.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Executor {
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Runs `command` with `args` in `cwd` (or the scratch directory if
    /// `None`), killing it if it runs past `timeout`.
    ///
    /// A missing executable resolves to `{exit_code: 127, stderr: "Command
    /// not found"}` rather than an `Err` — per the executor contract, only
    /// environment failures (e.g. the scratch directory can't be created)
    /// are reported as errors.
    pub async fn execute(
        &self,
        command: &str,
        args: &[String],
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<ExecutionResult, ExecutorError> {
        let cwd = match cwd {
            Some(p) => p.to_path_buf(),
            None => {
                tokio::fs::create_dir_all(&self.scratch_dir)
                    .await
                    .map_err(|source| ExecutorError::ScratchDirUnavailable {
                        path: self.scratch_dir.display().to_string(),
                        source,
                    })?;
                self.scratch_dir.clone()
            }
        };

        let span = tracing::info_span!("execute", command, cwd = %cwd.display());
        let _entered = span.enter();

        let mut cmd = Command::new(command);
        cmd.args(args)
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // `unsafe_code` is forbidden in this workspace, which rules out a
        // raw `kill(-pgid, SIGKILL)` on timeout; a direct `child.kill()`
        // (safe, tokio-provided) is used instead. A grandchild spawned by
        // the command itself can outlive the timeout as a result.
        let started = Instant::now();
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(command, "executable not found");
                return Ok(ExecutionResult {
                    exit_code: 127,
                    stdout: String::new(),
                    stderr: "Command not found".into(),
                    duration_ms: started.elapsed().as_millis() as u64,
                    timed_out: false,
                });
            }
            Err(source) => {
                return Err(ExecutorError::SpawnFailed {
                    command: command.to_string(),
                    source,
                })
            }
        };

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                tracing::info!(exit_code = output.status.code(), duration_ms, "command finished");
                Ok(ExecutionResult {
                    exit_code: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    duration_ms,
                    timed_out: false,
                })
            }
            Ok(Err(source)) => Err(ExecutorError::SpawnFailed {
                command: command.to_string(),
                source,
            }),
            Err(_elapsed) => {
                tracing::warn!(command, timeout_ms = timeout.as_millis() as u64, "command timed out");
                Ok(ExecutionResult {
                    exit_code: -1,
                    stdout: String::new(),
                    stderr: format!("timed out after {}ms", timeout.as_millis()),
                    duration_ms: started.elapsed().as_millis() as u64,
                    timed_out: true,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
