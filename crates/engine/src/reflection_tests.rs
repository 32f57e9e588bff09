// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vigil_core::{CyclePhase, CycleState, Decision, Observation, Plan, Reflection, TaskId};

fn cycle(
    cycle_id: u64,
    action: Option<Action>,
    observation: Option<Observation>,
    reflection: Option<Reflection>,
) -> CycleResult {
    CycleResult {
        state: CycleState {
            cycle_id,
            task_id: TaskId::new("T-1"),
            phase: CyclePhase::Decide,
            plan: None,
            action,
            observation,
            reflection,
            decision: Decision::Continue,
            timestamp: "2026-07-28T00:00:00Z".into(),
        },
        decision: Decision::Continue,
        proposed_tasks: vec![],
        summary: String::new(),
    }
}

fn reflection_with_progress(progress_made: bool, confidence: f64) -> Reflection {
    Reflection {
        progress_made,
        what_learned: String::new(),
        plan_still_valid: true,
        proposed_tasks: vec![],
        stuck_indicators: vec![],
        confidence,
        next_step_suggestion: String::new(),
    }
}

fn obs(success: bool, error: Option<&str>) -> Observation {
    Observation {
        success,
        output: String::new(),
        error: error.map(String::from),
        duration_ms: 10,
        files_modified: vec![],
    }
}

fn read_action(path: &str) -> Action {
    Action::ReadFile { path: path.into() }
}

#[test]
fn detects_repeated_identical_action() {
    let history: Vec<CycleResult> = (1..=3)
        .map(|i| cycle(i, Some(read_action("x.txt")), Some(obs(true, None)), Some(reflection_with_progress(true, 0.8))))
        .collect();
    let detector = StuckDetector::default();
    assert_eq!(detector.check(&history), Some(StuckReason::RepeatedAction("read_file".into())));
}

#[test]
fn stuck_reason_messages_match_the_original() {
    assert_eq!(
        StuckReason::RepeatedAction("execute_command".into()).message(),
        "Repeating same action: execute_command"
    );
    assert_eq!(
        StuckReason::RepeatedErrorSignature("cannot open /tmp/xyz: No such file or directory".into()).message(),
        "Same error repeating: cannot open /tmp/xyz: No such file or directory"
    );
    assert_eq!(StuckReason::NoProgressForWindow(4).message(), "No progress for 4 consecutive cycles");
    assert_eq!(StuckReason::TwoCycleOscillation.message(), "Oscillating between two actions");
}

#[test]
fn distinct_actions_are_not_flagged_as_repeated() {
    let history = vec![
        cycle(1, Some(read_action("a.txt")), Some(obs(true, None)), Some(reflection_with_progress(true, 0.8))),
        cycle(2, Some(read_action("b.txt")), Some(obs(true, None)), Some(reflection_with_progress(true, 0.8))),
        cycle(3, Some(read_action("c.txt")), Some(obs(true, None)), Some(reflection_with_progress(true, 0.8))),
    ];
    let detector = StuckDetector::default();
    assert_eq!(detector.check(&history), None);
}

#[test]
fn detects_repeated_normalized_error_signature() {
    let history = vec![
        cycle(1, Some(read_action("x")), Some(obs(false, Some("failed at line 42 in /home/user/a.txt"))), Some(reflection_with_progress(false, 0.1))),
        cycle(2, Some(read_action("y")), Some(obs(false, Some("failed at line 99 in /home/user/b.txt"))), Some(reflection_with_progress(false, 0.1))),
        cycle(3, Some(read_action("z")), Some(obs(false, Some("failed at line 7 in /home/user/c.txt"))), Some(reflection_with_progress(false, 0.1))),
    ];
    let detector = StuckDetector::default();
    assert_eq!(
        detector.check(&history),
        Some(StuckReason::RepeatedErrorSignature("failed at line 7 in /home/user/c.txt".into()))
    );
}

#[test]
fn detects_no_progress_across_window() {
    let history: Vec<CycleResult> = (1..=5)
        .map(|i| cycle(i, Some(read_action("x")), Some(obs(true, None)), Some(reflection_with_progress(false, 0.5))))
        .collect();
    let detector = StuckDetector { window: 5 };
    assert_eq!(detector.check(&history), Some(StuckReason::NoProgressForWindow(5)));
}

#[test]
fn stuck_indicators_reports_failures_no_progress_and_low_confidence() {
    let history = vec![
        cycle(1, Some(read_action("a")), Some(obs(false, Some("err"))), Some(reflection_with_progress(false, 0.2))),
        cycle(2, Some(read_action("b")), Some(obs(false, Some("err"))), Some(reflection_with_progress(false, 0.3))),
        cycle(3, Some(read_action("c")), Some(obs(true, None)), Some(reflection_with_progress(false, 0.1))),
    ];
    let indicators = StuckDetector::stuck_indicators(&history);
    assert!(indicators.contains(&"2 recent failures".to_string()));
    assert!(indicators.contains(&"3 cycles without progress".to_string()));
    assert!(indicators.contains(&"Low confidence for multiple cycles".to_string()));
}

#[test]
fn stuck_indicators_empty_below_thresholds() {
    let history = vec![
        cycle(1, Some(read_action("a")), Some(obs(true, None)), Some(reflection_with_progress(true, 0.9))),
        cycle(2, Some(read_action("b")), Some(obs(true, None)), Some(reflection_with_progress(true, 0.9))),
    ];
    assert!(StuckDetector::stuck_indicators(&history).is_empty());
}

#[test]
fn detects_two_cycle_oscillation() {
    let a = read_action("a");
    let b = read_action("b");
    let history = vec![
        cycle(1, Some(a.clone()), Some(obs(true, None)), Some(reflection_with_progress(true, 0.5))),
        cycle(2, Some(b.clone()), Some(obs(true, None)), Some(reflection_with_progress(true, 0.5))),
        cycle(3, Some(a.clone()), Some(obs(true, None)), Some(reflection_with_progress(true, 0.5))),
        cycle(4, Some(b), Some(obs(true, None)), Some(reflection_with_progress(true, 0.5))),
    ];
    let detector = StuckDetector::default();
    assert_eq!(detector.check(&history), Some(StuckReason::TwoCycleOscillation));
}

#[test]
fn short_history_is_never_stuck() {
    let history = vec![cycle(1, Some(read_action("x")), Some(obs(true, None)), Some(reflection_with_progress(true, 0.5)))];
    let detector = StuckDetector::default();
    assert_eq!(detector.check(&history), None);
}

#[test]
fn progress_analyzer_computes_rates() {
    let history = vec![
        cycle(1, Some(read_action("a")), Some(obs(true, None)), Some(reflection_with_progress(true, 0.5))),
        cycle(2, Some(read_action("b")), Some(obs(false, Some("err"))), Some(reflection_with_progress(false, 0.6))),
    ];
    let stats = ProgressAnalyzer::analyze(&history);
    assert_eq!(stats.cycles, 2);
    assert_eq!(stats.success_rate, 0.5);
    assert_eq!(stats.progress_rate, 0.5);
}

#[test]
fn progress_analyzer_on_empty_history() {
    let stats = ProgressAnalyzer::analyze(&[]);
    assert_eq!(stats.cycles, 0);
    assert_eq!(stats.trend, Trend::Stagnating);
}

#[test]
fn trend_improving_when_at_least_two_of_last_three_cycles_progress() {
    let history = vec![
        cycle(1, None, None, Some(reflection_with_progress(false, 0.2))),
        cycle(2, None, None, Some(reflection_with_progress(true, 0.5))),
        cycle(3, None, None, Some(reflection_with_progress(true, 0.8))),
    ];
    let stats = ProgressAnalyzer::analyze(&history);
    assert_eq!(stats.trend, Trend::Improving);
}

#[test]
fn trend_declining_when_none_of_last_three_cycles_progress() {
    let history = vec![
        cycle(1, None, None, Some(reflection_with_progress(true, 0.9))),
        cycle(2, None, None, Some(reflection_with_progress(false, 0.5))),
        cycle(3, None, None, Some(reflection_with_progress(false, 0.2))),
    ];
    let stats = ProgressAnalyzer::analyze(&history);
    assert_eq!(stats.trend, Trend::Declining);
}

#[test]
fn trend_stagnating_when_exactly_one_of_last_three_cycles_progresses() {
    let history = vec![
        cycle(1, None, None, Some(reflection_with_progress(false, 0.9))),
        cycle(2, None, None, Some(reflection_with_progress(true, 0.5))),
        cycle(3, None, None, Some(reflection_with_progress(false, 0.2))),
    ];
    let stats = ProgressAnalyzer::analyze(&history);
    assert_eq!(stats.trend, Trend::Stagnating);
}

fn proposal(description: &str, value: f64, category: CuriosityCategory) -> CuriosityProposal {
    CuriosityProposal {
        description: description.into(),
        justification: "because it matters a lot".into(),
        priority: vigil_core::Priority::Medium,
        estimated_value: value,
        category,
    }
}

fn filter() -> CuriosityFilter {
    CuriosityFilter {
        min_value_threshold: 0.5,
        max_proposals_per_cycle: 3,
        allowed_categories: vec![CuriosityCategory::Verification, CuriosityCategory::Robustness],
    }
}

#[test]
fn rejects_low_value_proposals() {
    let proposals = vec![proposal("a brand new investigation idea here", 0.3, CuriosityCategory::Verification)];
    let result = filter().filter(proposals, &[]);
    assert!(result.is_empty());
}

#[test]
fn rejects_disallowed_category() {
    let proposals = vec![proposal("a brand new investigation idea here", 0.9, CuriosityCategory::Exploration)];
    let result = filter().filter(proposals, &[]);
    assert!(result.is_empty());
}

#[test]
fn rejects_short_justification_or_description() {
    let mut p = proposal("a brand new investigation idea here", 0.9, CuriosityCategory::Verification);
    p.justification = "short".into();
    let result = filter().filter(vec![p], &[]);
    assert!(result.is_empty());
}

#[test]
fn rejects_near_duplicate_of_pending_task() {
    let pending = vec!["investigate the flaky retry test failure in CI".to_string()];
    let proposals =
        vec![proposal("investigate the flaky retry test failure in CI", 0.9, CuriosityCategory::Verification)];
    let result = filter().filter(proposals, &pending);
    assert!(result.is_empty());
}

#[test]
fn sorts_survivors_by_value_descending_and_caps_count() {
    let proposals = vec![
        proposal("low value proposal about something minor", 0.55, CuriosityCategory::Verification),
        proposal("high value proposal about something major", 0.95, CuriosityCategory::Robustness),
        proposal("mid value proposal about something medium", 0.75, CuriosityCategory::Verification),
    ];
    let result = filter().filter(proposals, &[]);
    assert_eq!(result.len(), 3);
    assert!(result[0].estimated_value >= result[1].estimated_value);
    assert!(result[1].estimated_value >= result[2].estimated_value);
}

#[test]
fn caps_at_max_proposals_per_cycle() {
    let mut f = filter();
    f.max_proposals_per_cycle = 1;
    let proposals = vec![
        proposal("first proposal about something worth exploring", 0.6, CuriosityCategory::Verification),
        proposal("second proposal about something else entirely", 0.9, CuriosityCategory::Robustness),
    ];
    let result = f.filter(proposals, &[]);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].estimated_value, 0.9);
}
