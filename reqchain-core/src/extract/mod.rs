use std::collections::BTreeMap;

use serde_json::Value;

use crate::pathquery::{self, PathError};
use crate::types::VariableExtraction;

/// Outcome of running a step's extraction list against a response body.
///
/// Extraction never fails as a whole; per-extraction problems are collected
/// as human-readable strings and the rest of the list still runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionOutcome {
    pub extracted: BTreeMap<String, Value>,
    pub errors: Vec<String>,
}

pub fn extract_variables(body: &Value, extractions: &[VariableExtraction]) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();
    if extractions.is_empty() {
        return outcome;
    }

    // Extraction never partially succeeds against a non-structured root.
    if !matches!(body, Value::Object(_) | Value::Array(_)) {
        for ex in extractions {
            outcome.errors.push(format!(
                "Cannot extract \"{}\": response body is not a JSON object",
                ex.name
            ));
        }
        return outcome;
    }

    for ex in extractions {
        match pathquery::evaluate(&ex.json_path, body) {
            Ok(Some(value)) => {
                // Later extractions with the same name overwrite.
                outcome.extracted.insert(ex.name.clone(), value);
            }
            Ok(None) => {
                outcome.errors.push(format!(
                    "No value found for \"{}\" at path: {}",
                    ex.name, ex.json_path
                ));
            }
            Err(e) => {
                outcome
                    .errors
                    .push(format!("Failed to extract \"{}\": {e}", ex.name));
            }
        }
    }
    outcome
}

/// Path validation plus evaluation in one call, for interactive tooling.
/// Not on the run-time critical path.
pub fn preview_extraction(body: &Value, path: &str) -> Result<Option<Value>, PathError> {
    pathquery::validate_path(path)?;
    pathquery::evaluate(path, body)
}
