// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

const SAMPLE_INBOX: &str = "\
---
task_id: T-001
priority: high
deadline: 2026-08-01
---
# Fix the flaky retry test

The retry test intermittently fails on CI.

## Success criteria
- Test passes 20 times in a row
- Root cause documented in working memory

---
task_id: T-002
priority: medium
origin: curiosity
parent_task: T-001
curiosity_depth: 1
---
Investigate why retries are flaky in the first place.
";

#[test]
fn parses_all_records_in_order() {
    let records = parse_records(SAMPLE_INBOX);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].task_id, "T-001");
    assert_eq!(records[1].task_id, "T-002");
}

#[test]
fn extracts_priority_and_deadline() {
    let records = parse_records(SAMPLE_INBOX);
    assert_eq!(records[0].priority, "high");
    assert_eq!(records[0].deadline.as_deref(), Some("2026-08-01"));
}

#[test]
fn strips_markdown_title_from_description() {
    let records = parse_records(SAMPLE_INBOX);
    assert!(!records[0].description.contains("# Fix the flaky retry test"));
    assert!(records[0].description.contains("intermittently fails"));
}

#[test]
fn extracts_success_criteria_bullets() {
    let records = parse_records(SAMPLE_INBOX);
    assert_eq!(
        records[0].success_criteria,
        vec![
            "Test passes 20 times in a row".to_string(),
            "Root cause documented in working memory".to_string(),
        ]
    );
}

#[test]
fn second_record_has_no_success_criteria() {
    let records = parse_records(SAMPLE_INBOX);
    assert!(records[1].success_criteria.is_empty());
}

#[test]
fn extracts_curiosity_provenance_fields() {
    let records = parse_records(SAMPLE_INBOX);
    assert_eq!(records[1].origin.as_deref(), Some("curiosity"));
    assert_eq!(records[1].parent_task.as_deref(), Some("T-001"));
    assert_eq!(records[1].curiosity_depth, Some(1));
}

#[test]
fn record_without_task_id_is_skipped() {
    let content = "\
---
priority: high
---
No task id here.
";
    assert!(parse_records(content).is_empty());
}

#[test]
fn missing_priority_defaults_to_unknown() {
    let content = "\
---
task_id: T-100
---
Body text.
";
    let records = parse_records(content);
    assert_eq!(records[0].priority, "unknown");
}

#[test]
fn unknown_header_fields_are_ignored() {
    let content = "\
---
task_id: T-200
priority: low
mystery_field: whatever
---
Body text.
";
    let records = parse_records(content);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].task_id, "T-200");
}

#[test]
fn literal_block_context_field_is_joined() {
    let content = "\
---
task_id: T-300
priority: low
context: |
  line one
  line two
---
Body text.
";
    let records = parse_records(content);
    assert_eq!(records[0].context.as_deref(), Some("line one\nline two"));
}

#[test]
fn literal_block_pause_reason_field_is_joined() {
    let content = "\
---
task_id: T-301
priority: low
pause_reason: |
  waiting on external input
---
Body text.
";
    let records = parse_records(content);
    assert_eq!(records[0].pause_reason.as_deref(), Some("waiting on external input"));
}

#[test]
fn raw_captures_the_whole_fenced_block() {
    let records = parse_records(SAMPLE_INBOX);
    assert!(records[0].raw.starts_with("---\ntask_id: T-001"));
    assert!(records[0].raw.contains("Success criteria"));
}

#[test]
fn empty_content_yields_no_records() {
    assert!(parse_records("").is_empty());
}

#[parameterized(
    lowercase = {"priority: high", "high"},
    uppercase = {"priority: HIGH", "high"},
    mixed_case = {"priority: High", "high"},
)]
fn priority_is_normalized_to_lowercase(header_line: &str, expected: &str) {
    let content = format!("---\ntask_id: T-1\n{header_line}\n---\nbody\n");
    let records = parse_records(&content);
    assert_eq!(records[0].priority, expected);
}
