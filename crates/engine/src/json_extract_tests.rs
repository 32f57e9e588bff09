// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    a: u32,
    b: String,
}

#[test]
fn parses_bare_json() {
    let sample: Sample = parse_defensive(r#"{"a": 1, "b": "x"}"#).expect("parses");
    assert_eq!(sample, Sample { a: 1, b: "x".into() });
}

#[test]
fn strips_json_fenced_block() {
    let text = "```json\n{\"a\": 2, \"b\": \"y\"}\n```";
    let sample: Sample = parse_defensive(text).expect("parses");
    assert_eq!(sample, Sample { a: 2, b: "y".into() });
}

#[test]
fn strips_plain_fenced_block() {
    let text = "```\n{\"a\": 3, \"b\": \"z\"}\n```";
    let sample: Sample = parse_defensive(text).expect("parses");
    assert_eq!(sample, Sample { a: 3, b: "z".into() });
}

#[test]
fn tolerates_surrounding_prose_outside_the_fence() {
    let text = "Here is my answer:\n```json\n{\"a\": 4, \"b\": \"w\"}\n```\nLet me know if helpful.";
    let sample: Sample = parse_defensive(text).expect("parses");
    assert_eq!(sample, Sample { a: 4, b: "w".into() });
}

#[test]
fn malformed_json_yields_an_error_message() {
    let result: Result<Sample, String> = parse_defensive("not json at all");
    assert!(result.is_err());
}

#[test]
fn strip_fence_passes_through_unfenced_text_unchanged() {
    assert_eq!(strip_fence("  {\"a\":1}  "), "{\"a\":1}");
}
