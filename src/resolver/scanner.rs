//! Reference discovery inside variable values.
//!
//! An expression is any `{{ ... }}` span in a string. Inside an expression a
//! reference token is `@` followed by an identifier made of letters, digits,
//! hyphens and underscores, e.g. `{{ @accent|norm_hex }}` references `accent`.
//! Text outside expressions is never inspected.

use regex::{Match, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::Value;

/// Marker character that introduces a reference inside an expression.
pub const REFERENCE_MARKER: char = '@';

static EXPRESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").expect("expression pattern is valid"));

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_-]+)").expect("reference pattern is valid"));

/// Iterate over every `{{ ... }}` span of `text`, delimiters included.
pub(crate) fn expressions(text: &str) -> impl Iterator<Item = Match<'_>> {
    EXPRESSION_RE.find_iter(text)
}

/// Rewrite every reference token in `expression` with `replace(key)`.
pub(crate) fn replace_references(
    expression: &str,
    mut replace: impl FnMut(&str) -> String,
) -> String {
    REFERENCE_RE
        .replace_all(expression, |caps: &regex::Captures<'_>| replace(&caps[1]))
        .into_owned()
}

/// Reference keys found in a single string, in order of first appearance.
pub fn scan_str(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    collect_str(text, &mut seen, &mut keys);
    keys
}

/// Every variable key referenced anywhere inside `value`.
///
/// Sequences and mappings are walked recursively; mapping keys are never
/// scanned. The result is de-duplicated and ordered by first appearance, which
/// is the order dependencies are later evaluated in. Malformed expressions
/// (e.g. an unclosed `{{`) simply produce no matches.
pub fn scan(value: &Value) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    collect(value, &mut seen, &mut keys);
    keys
}

fn collect(value: &Value, seen: &mut HashSet<String>, keys: &mut Vec<String>) {
    match value {
        Value::String(s) => collect_str(s, seen, keys),
        Value::Sequence(items) => {
            for item in items {
                collect(item, seen, keys);
            }
        }
        Value::Mapping(map) => {
            for item in map.values() {
                collect(item, seen, keys);
            }
        }
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Integer(_)
        | Value::Float(_) => {}
    }
}

fn collect_str(text: &str, seen: &mut HashSet<String>, keys: &mut Vec<String>) {
    for expression in expressions(text) {
        for caps in REFERENCE_RE.captures_iter(expression.as_str()) {
            let key = &caps[1];
            if seen.insert(key.to_string()) {
                keys.push(key.to_string());
            }
        }
    }
}
