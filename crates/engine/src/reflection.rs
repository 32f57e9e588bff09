// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stuck detection, progress analysis, and curiosity filtering over
//! recent cycle history. Grounded on
//! `original_source/runtime/tooeybot/reflection.py`'s window-based
//! heuristics, translated to operate on `vigil_core::CycleResult`.

use std::sync::OnceLock;
use vigil_core::{Action, CuriosityCategory, CuriosityProposal, CycleResult};

/// Default window size for the stuck checks below.
pub const DEFAULT_WINDOW: usize = 5;

/// A detected stuck pattern, carrying the data its human-readable message
/// needs. Grounded on `reflection.py::StuckDetector.is_stuck`'s own
/// `(bool, reason_string)` return shape — the payload here is what lets
/// `message()` reproduce those exact strings instead of Debug-printing the
/// variant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StuckReason {
    RepeatedAction(String),
    RepeatedErrorSignature(String),
    NoProgressForWindow(usize),
    TwoCycleOscillation,
}

impl StuckReason {
    /// The exact human-readable string `reflection.py` produces for each
    /// pattern, used as the task's pause reason (spec.md §8 scenario 3
    /// requires a reason beginning `"Same error repeating:"`).
    pub fn message(&self) -> String {
        match self {
            StuckReason::RepeatedAction(label) => format!("Repeating same action: {label}"),
            StuckReason::RepeatedErrorSignature(error) => format!("Same error repeating: {error}"),
            StuckReason::NoProgressForWindow(n) => format!("No progress for {n} consecutive cycles"),
            StuckReason::TwoCycleOscillation => "Oscillating between two actions".to_string(),
        }
    }
}

pub struct StuckDetector {
    pub window: usize,
}

impl Default for StuckDetector {
    fn default() -> Self {
        StuckDetector { window: DEFAULT_WINDOW }
    }
}

impl StuckDetector {
    /// Evaluates the last `window` cycles against the spec.md §4.8 stuck
    /// checks, in the order they're listed there.
    pub fn check(&self, history: &[CycleResult]) -> Option<StuckReason> {
        let recent: Vec<&CycleResult> =
            history.iter().rev().take(self.window).collect::<Vec<_>>().into_iter().rev().collect();

        if let Some(label) = last_n_actions_identical(&recent, 3) {
            return Some(StuckReason::RepeatedAction(label));
        }
        if let Some(error) = last_n_error_signatures_identical(&recent, 3) {
            return Some(StuckReason::RepeatedErrorSignature(error));
        }
        if let Some(n) = no_progress_for_window(&recent, self.window) {
            return Some(StuckReason::NoProgressForWindow(n));
        }
        if oscillates_two_cycles(&recent) {
            return Some(StuckReason::TwoCycleOscillation);
        }
        None
    }

    /// A cross-check list of stuck indicators independent of the
    /// stop/continue verdict above — recent-failure count, no-progress
    /// count, and a low-confidence streak. Grounded on
    /// `reflection.py::StuckDetector.get_stuck_indicators`, which always
    /// looks at the last 5 cycles regardless of `window`. Used to fill
    /// `Reflection.stuck_indicators` when the LM's own reflection omits it,
    /// not to replace the LM's self-report.
    pub fn stuck_indicators(history: &[CycleResult]) -> Vec<String> {
        if history.len() < 2 {
            return Vec::new();
        }
        let recent: Vec<&CycleResult> = history.iter().rev().take(5).collect::<Vec<_>>().into_iter().rev().collect();
        let mut indicators = Vec::new();

        let failures = recent.iter().filter(|r| r.state.observation.as_ref().is_some_and(|o| !o.success)).count();
        if failures >= 2 {
            indicators.push(format!("{failures} recent failures"));
        }

        let no_progress =
            recent.iter().filter(|r| r.state.reflection.as_ref().is_some_and(|refl| !refl.progress_made)).count();
        if no_progress >= 2 {
            indicators.push(format!("{no_progress} cycles without progress"));
        }

        let confidences: Vec<f64> =
            recent.iter().filter_map(|r| r.state.reflection.as_ref().map(|refl| refl.confidence)).collect();
        if confidences.len() >= 3 {
            let last_three = &confidences[confidences.len() - 3..];
            if last_three.iter().all(|&c| c < 0.4) {
                indicators.push("Low confidence for multiple cycles".to_string());
            }
        }

        indicators
    }
}

fn last_n_actions_identical(recent: &[&CycleResult], n: usize) -> Option<String> {
    if recent.len() < n {
        return None;
    }
    let tail = &recent[recent.len() - n..];
    let first = &tail[0].state.action;
    if first.is_some() && tail.iter().all(|r| &r.state.action == first) {
        first.as_ref().map(Action::label).map(String::from)
    } else {
        None
    }
}

fn normalize_error(error: &str) -> String {
    let digits_replaced = digit_pattern().replace_all(error, "N");
    let paths_replaced = path_pattern().replace_all(&digits_replaced, "/PATH");
    let lowered = paths_replaced.to_ascii_lowercase();
    lowered.chars().take(100).collect()
}

fn digit_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"\d+").expect("static digit pattern is valid"))
}

fn path_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"(?:/[\w.\-]+){2,}").expect("static path pattern is valid"))
}

/// Returns the raw (un-normalized), 100-char-capped text of the last
/// error if the last `n` cycles' errors all normalize to the same
/// signature — normalization is only used for the comparison, matching
/// `reflection.py::_errors_similar`/`is_stuck`'s `last_errors[-1][:100]`.
fn last_n_error_signatures_identical(recent: &[&CycleResult], n: usize) -> Option<String> {
    if recent.len() < n {
        return None;
    }
    let tail = &recent[recent.len() - n..];
    let errors: Vec<&str> = tail.iter().filter_map(|r| r.state.observation.as_ref().and_then(|o| o.error.as_deref())).collect();
    if errors.len() < n {
        return None;
    }
    let signatures: Vec<String> = errors.iter().map(|err| normalize_error(err)).collect();
    let first = &signatures[0];
    if signatures.iter().all(|s| s == first) {
        let last_raw = errors[errors.len() - 1];
        Some(last_raw.chars().take(100).collect())
    } else {
        None
    }
}

fn no_progress_for_window(recent: &[&CycleResult], window: usize) -> Option<usize> {
    if recent.len() < window {
        return None;
    }
    let no_progress_count = recent
        .iter()
        .filter(|r| r.state.reflection.as_ref().is_some_and(|refl| !refl.progress_made))
        .count();
    (no_progress_count >= window - 1).then_some(no_progress_count)
}

fn oscillates_two_cycles(recent: &[&CycleResult]) -> bool {
    if recent.len() < 4 {
        return false;
    }
    let tail = &recent[recent.len() - 4..];
    let a = &tail[0].state.action;
    let b = &tail[1].state.action;
    a.is_some() && b.is_some() && a != b && &tail[2].state.action == a && &tail[3].state.action == b
}

/// Qualitative trend derived from how many of the last 3 cycles made
/// progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Stagnating,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressStats {
    pub cycles: usize,
    pub success_rate: f64,
    pub progress_rate: f64,
    pub avg_confidence: f64,
    pub trend: Trend,
}

pub struct ProgressAnalyzer;

impl ProgressAnalyzer {
    pub fn analyze(history: &[CycleResult]) -> ProgressStats {
        let cycles = history.len();
        if cycles == 0 {
            return ProgressStats {
                cycles: 0,
                success_rate: 0.0,
                progress_rate: 0.0,
                avg_confidence: 0.0,
                trend: Trend::Stagnating,
            };
        }

        let successes =
            history.iter().filter(|r| r.state.observation.as_ref().is_some_and(|o| o.success)).count();
        let progressed =
            history.iter().filter(|r| r.state.reflection.as_ref().is_some_and(|refl| refl.progress_made)).count();
        let confidences: Vec<f64> =
            history.iter().filter_map(|r| r.state.reflection.as_ref()).map(|refl| refl.confidence).collect();
        let avg_confidence = if confidences.is_empty() {
            0.0
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };

        let trend = trend_from_recent_progress(history, progressed);

        ProgressStats {
            cycles,
            success_rate: successes as f64 / cycles as f64,
            progress_rate: progressed as f64 / cycles as f64,
            avg_confidence,
            trend,
        }
    }
}

/// Grounded on `reflection.py::ProgressAnalyzer.analyze_progress`: counts
/// `progress_made` cycles over the last 3 (or, with fewer than 3 cycles
/// total, over the whole history — `progressed` is that count already).
/// `>= 2` is improving, `== 1` is stagnating, `0` is declining.
fn trend_from_recent_progress(history: &[CycleResult], progressed: usize) -> Trend {
    let recent_progress = if history.len() >= 3 {
        history
            .iter()
            .rev()
            .take(3)
            .filter(|r| r.state.reflection.as_ref().is_some_and(|refl| refl.progress_made))
            .count()
    } else {
        progressed
    };
    if recent_progress >= 2 {
        Trend::Improving
    } else if recent_progress == 1 {
        Trend::Stagnating
    } else {
        Trend::Declining
    }
}

/// Rejects low-value, malformed, or near-duplicate curiosity proposals.
pub struct CuriosityFilter {
    pub min_value_threshold: f64,
    pub max_proposals_per_cycle: usize,
    pub allowed_categories: Vec<CuriosityCategory>,
}

impl CuriosityFilter {
    /// Filters and ranks proposals, rejecting any whose description
    /// overlaps >= 70% (by token) with an existing pending task
    /// description.
    pub fn filter(
        &self,
        proposals: Vec<CuriosityProposal>,
        pending_descriptions: &[String],
    ) -> Vec<CuriosityProposal> {
        let mut survivors: Vec<CuriosityProposal> = proposals
            .into_iter()
            .filter(|p| p.estimated_value >= self.min_value_threshold)
            .filter(|p| self.allowed_categories.contains(&p.category))
            .filter(|p| p.justification.len() >= 10)
            .filter(|p| p.description.len() >= 20)
            .filter(|p| !overlaps_existing(&p.description, pending_descriptions))
            .collect();

        survivors.sort_by(|a, b| b.estimated_value.partial_cmp(&a.estimated_value).unwrap_or(std::cmp::Ordering::Equal));
        survivors.truncate(self.max_proposals_per_cycle);
        survivors
    }
}

fn overlaps_existing(description: &str, pending_descriptions: &[String]) -> bool {
    let tokens: Vec<String> = tokenize(description);
    if tokens.is_empty() {
        return false;
    }
    pending_descriptions.iter().any(|existing| {
        let existing_tokens: std::collections::HashSet<String> = tokenize(existing).into_iter().collect();
        let overlap = tokens.iter().filter(|t| existing_tokens.contains(*t)).count();
        overlap as f64 / tokens.len() as f64 >= 0.7
    })
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_ascii_lowercase()).collect()
}

#[cfg(test)]
#[path = "reflection_tests.rs"]
mod tests;
