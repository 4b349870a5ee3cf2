use crate::pathquery;
use crate::template;
use crate::types::WorkflowStep;
use crate::validate::validator::{Validator, ALLOWED_METHODS, VAR_NAME_RE};

pub(crate) fn validate_step(v: &mut Validator, s: &WorkflowStep, path: &str, scope: &[String]) {
    if s.name.trim().is_empty() {
        v.push(format!("{path}.name"), "must not be empty");
    }

    if !ALLOWED_METHODS.contains(&s.request.method.to_uppercase().as_str()) {
        v.push(
            format!("{path}.request.method"),
            format!("'{}' is not an allowed HTTP method", s.request.method),
        );
    }

    for (i, ex) in s.extractions.iter().enumerate() {
        let epath = format!("{path}.extractions[{i}]");
        if ex.name.trim().is_empty() {
            v.push(format!("{epath}.name"), "must not be empty");
        } else if !VAR_NAME_RE.is_match(&ex.name) {
            v.push(
                format!("{epath}.name"),
                "must match regex [a-zA-Z0-9\\.\\-_]+ so templates can reference it",
            );
        }
        if let Err(e) = pathquery::validate_path(&ex.json_path) {
            v.push(format!("{epath}.jsonPath"), e.to_string());
        }
    }

    check_references(v, &format!("{path}.request.path"), &s.request.path, scope);
    for (key, value) in &s.request.query {
        check_references(v, &format!("{path}.request.query.{key}"), value, scope);
    }
    for (key, value) in &s.request.headers {
        check_references(v, &format!("{path}.request.headers.{key}"), value, scope);
    }
    if let Some(body) = &s.request.body {
        check_references(v, &format!("{path}.request.body"), body, scope);
    }
}

fn check_references(v: &mut Validator, path: &str, template: &str, scope: &[String]) {
    for name in template::validate_references(template, scope) {
        v.push(
            path,
            format!("references variable '{name}' that no earlier step extracts"),
        );
    }
}
