// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only, day-partitioned event log per spec.md §4.1: one JSON
//! object per line in `logs/events/<YYYY-MM-DD>.jsonl`. A write failure
//! is never silent — the event is also printed to stderr as a `CRITICAL`
//! notice. Append-on-write, never buffered past a single line.

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use vigil_core::{Clock, Event};

use crate::paths::AgentPaths;

/// Appends events to the day-partitioned log. Holds a mutex so
/// concurrent appenders on non-POSIX filesystems still serialize writes;
/// on POSIX, `O_APPEND` already makes single-line writes atomic.
pub struct EventLog<'a> {
    paths: &'a AgentPaths,
    write_lock: Mutex<()>,
}

impl<'a> EventLog<'a> {
    pub fn new(paths: &'a AgentPaths) -> Self {
        EventLog { paths, write_lock: Mutex::new(()) }
    }

    /// Appends one event to today's log file, per `clock`. Never returns
    /// an error: a write failure is reported to stderr instead, since the
    /// event log itself must not become a source of tick failures.
    pub fn append(&self, event: &Event, clock: &dyn Clock) {
        let _guard = self.write_lock.lock();
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(err) => {
                eprintln!("CRITICAL: failed to serialize event: {err}; event={event:?}");
                return;
            }
        };

        let dir = self.paths.events_dir();
        if let Err(err) = std::fs::create_dir_all(&dir) {
            eprintln!("CRITICAL: failed to create event log directory {}: {err}; event={line}", dir.display());
            return;
        }

        let path = dir.join(format!("{}.jsonl", clock.today()));
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| writeln!(file, "{line}"));

        if let Err(err) = result {
            eprintln!("CRITICAL: failed to append event to {}: {err}; event={line}", path.display());
        }
    }

    /// Loads every event recorded on a given day, skipping malformed
    /// lines with a warning.
    pub fn load_day(&self, day: &str) -> Vec<Event> {
        let path = self.paths.events_dir().join(format!("{day}.jsonl"));
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Vec::new();
        };
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<Event>(line) {
                Ok(event) => Some(event),
                Err(err) => {
                    tracing::warn!(day, %err, "skipping malformed event log line");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "event_log_tests.rs"]
mod tests;
