use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("valid regex"));

/// Where a rendered value lands. Determines the encoding applied on
/// substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionContext {
    Url,
    Query,
    Header,
    Body,
}

/// Expand `{{name}}` placeholders in `template` against `variables`.
///
/// Unbound placeholders are left byte-for-byte intact so partially bound
/// templates stay renderable for preview. Bound values are stringified
/// (strings bare, everything else as compact JSON) and then encoded for the
/// target context: percent-encoding for url/query, CR/LF stripping for
/// headers, verbatim for bodies.
pub fn substitute(
    template: &str,
    variables: &BTreeMap<String, Value>,
    context: SubstitutionContext,
) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            match variables.get(&caps[1]) {
                Some(value) => encode(&stringify(value), context),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Identifiers referenced by `template`, de-duplicated, in order of first
/// appearance.
pub fn extract_references(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Referenced identifiers that `scope` does not provide.
pub fn validate_references(template: &str, scope: &[String]) -> Vec<String> {
    extract_references(template)
        .into_iter()
        .filter(|name| !scope.iter().any(|s| s == name))
        .collect()
}

fn stringify(value: &Value) -> String {
    match value {
        // Bare, not JSON-quoted.
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn encode(value: &str, context: SubstitutionContext) -> String {
    match context {
        SubstitutionContext::Url | SubstitutionContext::Query => {
            urlencoding::encode(value).into_owned()
        }
        // Header values are not URL-structured; only strip CR/LF to block
        // header-splitting.
        SubstitutionContext::Header => value.replace(['\r', '\n'], ""),
        SubstitutionContext::Body => value.to_string(),
    }
}
