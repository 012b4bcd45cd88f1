// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

//! Severity classification of raw run log text.
//!
//! One line is one log entry: a line counts only when it starts with a
//! fixed-width `YYYY-MM-DDThh:mm:ss.sssZ` timestamp, a single space, and one
//! of the literal tokens `INFO`, `WARN`, or `ERROR`. Everything else
//! (stack-trace continuation lines, blank lines) is dropped without being
//! counted. Multi-line messages therefore contribute only their first line,
//! and only if that line carries the prefix. This is a deliberate
//! simplification carried over from the original tool.

use regex::Regex;
use std::sync::OnceLock;

static INFO_LINE: OnceLock<Regex> = OnceLock::new();
static WARN_LINE: OnceLock<Regex> = OnceLock::new();
static ERROR_LINE: OnceLock<Regex> = OnceLock::new();

const TIMESTAMP: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z ";

#[allow(clippy::expect_used)]
fn level_pattern(cell: &'static OnceLock<Regex>, level: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(&format!("{TIMESTAMP}{level}")).expect("invalid log line pattern")
    })
}

/// Per-log classification counts and captured lines.
///
/// `warn_messages.len() == warns` and `error_messages.len() == errors`
/// always hold; captured lines are verbatim and in log order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogStats {
    pub infos: u64,
    pub warns: u64,
    pub errors: u64,
    pub warn_messages: Vec<String>,
    pub error_messages: Vec<String>,
}

/// Classifies every line of `log_text` by severity prefix.
///
/// Pure single pass in line order, no lookback. The three patterns are
/// mutually exclusive by construction, so the INFO → WARN → ERROR check
/// order never changes the outcome.
pub fn classify(log_text: &str) -> LogStats {
    let info = level_pattern(&INFO_LINE, "INFO");
    let warn = level_pattern(&WARN_LINE, "WARN");
    let error = level_pattern(&ERROR_LINE, "ERROR");

    let mut stats = LogStats::default();
    for line in log_text.split('\n') {
        if info.is_match(line) {
            stats.infos += 1;
        } else if warn.is_match(line) {
            stats.warns += 1;
            stats.warn_messages.push(line.to_string());
        } else if error.is_match(line) {
            stats.errors += 1;
            stats.error_messages.push(line.to_string());
        }
    }
    stats
}
