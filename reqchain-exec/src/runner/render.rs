use std::collections::BTreeMap;

use serde_json::Value;

use reqchain_core::template::{substitute, SubstitutionContext};
use reqchain_core::types::{WorkflowDocument, WorkflowStep};

use crate::runner::http::ApiRequest;

/// Render a step's request template against the current variable scope.
///
/// Base URL and auth fall back from the step override to the document-wide
/// setting. Rendering never fails; unresolved placeholders pass through.
pub fn render_request(
    doc: &WorkflowDocument,
    step: &WorkflowStep,
    scope: &BTreeMap<String, Value>,
) -> ApiRequest {
    let base = step
        .request
        .server_url
        .as_deref()
        .unwrap_or(&doc.server_url);

    let path = substitute(&step.request.path, scope, SubstitutionContext::Url);
    let mut url = join_target(base, &path);

    for (key, value) in &step.request.query {
        let rendered = substitute(value, scope, SubstitutionContext::Query);
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(key);
        url.push('=');
        url.push_str(&rendered);
    }

    let mut headers = BTreeMap::new();
    for (key, value) in &step.request.headers {
        headers.insert(
            key.clone(),
            substitute(value, scope, SubstitutionContext::Header),
        );
    }

    let body = step
        .request
        .body
        .as_ref()
        .map(|b| substitute(b, scope, SubstitutionContext::Body));

    let auth = step.request.auth.clone().or_else(|| doc.shared_auth.clone());

    ApiRequest {
        method: step.request.method.clone(),
        url,
        headers,
        body,
        auth,
    }
}

// An absolute path replaces the base entirely.
fn join_target(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{}", path.trim_start_matches('/'))
}
