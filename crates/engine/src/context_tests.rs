// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn orders_items_by_priority_regardless_of_input_order() {
    let assembler = ContextAssembler::new(1_000);
    let result = assembler.assemble(vec![
        ContextItem::beliefs("beliefs-content".into()),
        ContextItem::identity("identity-content".into()),
        ContextItem::current_task("task-content".into()),
    ]);
    let identity_pos = result.find("identity-content").expect("identity present");
    let task_pos = result.find("task-content").expect("task present");
    let beliefs_pos = result.find("beliefs-content").expect("beliefs present");
    assert!(identity_pos < task_pos);
    assert!(task_pos < beliefs_pos);
}

#[test]
fn must_have_items_are_truncated_with_marker_when_over_budget() {
    let assembler = ContextAssembler::new(2);
    let result = assembler.assemble(vec![ContextItem::identity("x".repeat(100))]);
    assert!(result.contains("[truncated]"));
}

#[test]
fn optional_items_are_dropped_silently_when_budget_exhausted() {
    let assembler = ContextAssembler::new(1);
    let result = assembler.assemble(vec![
        ContextItem::identity("i".into()),
        ContextItem::long_term_memory("this should not fit and gets dropped entirely".into()),
    ]);
    assert!(!result.contains("should not fit"));
}

#[test]
fn items_that_fit_are_joined_with_separator() {
    let assembler = ContextAssembler::new(1_000);
    let result = assembler.assemble(vec![
        ContextItem::identity("first".into()),
        ContextItem::current_task("second".into()),
    ]);
    assert_eq!(result, "first\n\n---\n\nsecond");
}

#[test]
fn empty_items_yields_empty_string() {
    let assembler = ContextAssembler::new(1_000);
    assert_eq!(assembler.assemble(vec![]), "");
}

#[test]
fn hash_content_is_stable_and_sensitive_to_change() {
    let a = hash_content("hello");
    let b = hash_content("hello");
    let c = hash_content("hello!");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
}
