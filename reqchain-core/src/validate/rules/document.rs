use std::collections::HashSet;

use crate::types::{WorkflowDocument, WorkflowStep};
use crate::validate::rules::step;
use crate::validate::validator::{Validator, ID_RE};

pub(crate) fn validate_document(v: &mut Validator, doc: &WorkflowDocument) {
    if doc.id.trim().is_empty() {
        v.push("id", "must not be empty");
    }
    if doc.name.trim().is_empty() {
        v.push("name", "must not be empty");
    }
    if doc.server_url.trim().is_empty() && doc.steps.iter().any(|s| s.request.server_url.is_none())
    {
        v.push("serverUrl", "must not be empty unless every step overrides it");
    }

    // Walk in execution order so reference checks only see what earlier
    // steps bound. Violation paths keep document positions.
    let mut indexed: Vec<(usize, &WorkflowStep)> = doc.steps.iter().enumerate().collect();
    indexed.sort_by_key(|(_, s)| s.order);

    let mut step_ids = HashSet::<&str>::new();
    let mut orders = HashSet::<i64>::new();
    let mut scope: Vec<String> = Vec::new();

    for (idx, s) in indexed {
        let spath = format!("steps[{idx}]");

        if !ID_RE.is_match(&s.id) {
            v.push(format!("{spath}.id"), "must match regex [A-Za-z0-9_\\-]+");
        }
        if !step_ids.insert(s.id.as_str()) {
            v.push(format!("{spath}.id"), "must be unique within the document");
        }
        if !orders.insert(s.order) {
            v.push(
                format!("{spath}.order"),
                "duplicate order value; execution order is ambiguous",
            );
        }

        step::validate_step(v, s, &spath, &scope);

        for ex in &s.extractions {
            scope.push(ex.name.clone());
        }
    }
}
