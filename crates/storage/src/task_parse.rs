// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parses the `---`-fenced task record grammar described in spec.md §4.4,
//! a superset of the original `tasks.py::TaskParser.TASK_PATTERN` that
//! additionally recognizes `origin`, `parent_task`, and `curiosity_depth`
//! header fields. Unknown header fields are ignored; a record that has
//! no `task_id` is skipped with a warning rather than failing the parse.

use regex::Regex;
use std::sync::OnceLock;

/// One task record as parsed off the inbox/active file, before it is
/// turned into a `vigil_core::Task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTaskRecord {
    pub task_id: String,
    pub priority: String,
    pub deadline: Option<String>,
    pub origin: Option<String>,
    pub parent_task: Option<String>,
    pub curiosity_depth: Option<u32>,
    pub context: Option<String>,
    pub pause_reason: Option<String>,
    pub description: String,
    pub success_criteria: Vec<String>,
    /// The exact bytes of this record, `---`-fences included — used to
    /// locate and remove the block from the inbox on activation.
    pub raw: String,
}

fn record_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)---[ \t]*\r?\n(.*?)\r?\n---[ \t]*\r?\n(.*?)(?=\n---|\z)")
            .expect("static task record pattern is valid")
    })
}

fn success_criteria_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)##\s*success\s+criteria\s*\n((?:[-*]\s+[^\n]+\n?)+)")
            .expect("static success criteria pattern is valid")
    })
}

fn markdown_title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#\s+[^\n]*\n?").expect("static title pattern is valid"))
}

/// Parses every task record out of an inbox-style file's content.
/// Malformed records (missing `task_id`) are skipped with a `tracing`
/// warning rather than aborting the whole parse.
pub fn parse_records(content: &str) -> Vec<ParsedTaskRecord> {
    let mut records = Vec::new();
    for captures in record_pattern().captures_iter(content) {
        let header = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default().trim();
        let raw = captures.get(0).map(|m| m.as_str()).unwrap_or_default();

        let fields = parse_header_fields(header);
        let Some(task_id) = fields.get("task_id").cloned() else {
            tracing::warn!("skipping malformed task record: missing task_id");
            continue;
        };
        let priority = fields
            .get("priority")
            .cloned()
            .unwrap_or_else(|| "unknown".into())
            .to_ascii_lowercase();

        let (description, success_criteria) = split_body(body);

        records.push(ParsedTaskRecord {
            task_id,
            priority,
            deadline: fields.get("deadline").cloned(),
            origin: fields.get("origin").cloned(),
            parent_task: fields.get("parent_task").cloned(),
            curiosity_depth: fields.get("curiosity_depth").and_then(|s| s.parse().ok()),
            context: fields.get("context").cloned(),
            pause_reason: fields.get("pause_reason").cloned(),
            description,
            success_criteria,
            raw: raw.to_string(),
        });
    }
    records
}

/// Parses a `key: value` header block, tolerating a `key: |` literal
/// block whose continuation lines are indented by at least two spaces.
fn parse_header_fields(header: &str) -> std::collections::HashMap<String, String> {
    let mut fields = std::collections::HashMap::new();
    let mut lines = header.lines().peekable();
    while let Some(line) = lines.next() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let rest = rest.trim();
        if rest == "|" {
            let mut block = Vec::new();
            while let Some(next) = lines.peek() {
                if next.starts_with("  ") {
                    block.push(lines.next().unwrap_or_default().trim_start_matches("  "));
                } else {
                    break;
                }
            }
            fields.insert(key, block.join("\n"));
        } else if !rest.is_empty() {
            fields.insert(key, rest.to_string());
        }
    }
    fields
}

/// Splits a record body into its description and success-criteria list,
/// stripping a leading markdown title line from the description.
fn split_body(body: &str) -> (String, Vec<String>) {
    let criteria_re = success_criteria_pattern();
    if let Some(captures) = criteria_re.captures(body) {
        let whole = captures.get(0).expect("capture 0 always present");
        let criteria_text = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let criteria = criteria_text
            .lines()
            .map(|line| line.trim().trim_start_matches(['-', '*']).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        let description = strip_title(body[..whole.start()].trim());
        (description, criteria)
    } else {
        (strip_title(body.trim()), Vec::new())
    }
}

fn strip_title(body: &str) -> String {
    markdown_title_pattern().replace(body, "").trim().to_string()
}

#[cfg(test)]
#[path = "task_parse_tests.rs"]
mod tests;
