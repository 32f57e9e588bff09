// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing-subscriber setup for the daemon: a non-blocking file appender
//! plus `EnvFilter`, extended with the `logging{level, console}` config
//! section from spec.md §6. The file appender rotates daily so
//! `daemon.log` (the ambient debug/trace stream) never grows unbounded —
//! distinct from the structured, append-only Event Log in
//! `vigil-storage::event_log`, which spec.md §4.1 requires to stay whole
//! per calendar day.

use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Guard that must be held for the lifetime of the process; dropping it
/// flushes the non-blocking writer's remaining buffered lines.
pub struct LoggingGuard {
    _file_guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Initializes the global tracing subscriber: a file layer under
/// `<agent_home>/logs/daemon.log`, plus an optional stdout layer when
/// `config.console` is set.
pub fn init(config: &LoggingConfig, log_dir: &Path) -> std::io::Result<LoggingGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "daemon.log");
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false));

    if config.console {
        registry.with(fmt::layer().with_writer(std::io::stdout)).init();
    } else {
        registry.init();
    }

    Ok(LoggingGuard { _file_guard: file_guard })
}
