use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crate::runner::http::ApiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Aborted,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Aborted => "aborted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Success,
    Failure,
    Skipped,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Success => "success",
            StepStatus::Failure => "failure",
            StepStatus::Skipped => "skipped",
        }
    }
}

/// Trace entry for one step. Reports carry one entry per document step,
/// including steps that never ran.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepExecutionResult {
    #[serde(rename = "stepId")]
    pub step_id: String,

    pub status: StepStatus,

    /// Present where a network response was actually obtained, on failure
    /// as well as success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ApiResponse>,

    /// Short collaborator error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// What this specific step contributed to the scope, independent of
    /// the cumulative map.
    #[serde(default, rename = "extractedVariables")]
    pub extracted_variables: BTreeMap<String, Value>,

    /// Extraction problems are metadata; they never change `status`.
    #[serde(default, rename = "extractionErrors", skip_serializing_if = "Vec::is_empty")]
    pub extraction_errors: Vec<String>,
}

impl StepExecutionResult {
    pub(crate) fn pending(step_id: &str) -> Self {
        Self {
            step_id: step_id.to_string(),
            status: StepStatus::Pending,
            response: None,
            error: None,
            extracted_variables: BTreeMap::new(),
            extraction_errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunReport {
    #[serde(rename = "runId")]
    pub run_id: Uuid,

    pub status: RunStatus,

    pub results: Vec<StepExecutionResult>,

    /// Final accumulated variable scope.
    pub variables: BTreeMap<String, Value>,

    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}
