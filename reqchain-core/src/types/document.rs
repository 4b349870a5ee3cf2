use crate::types::{AuthScheme, WorkflowStep};

/// An executable automation unit: an ordered chain of HTTP steps.
///
/// Documents are produced by external editing surfaces and are never mutated
/// by the runtime.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkflowDocument {
    pub id: String,

    pub name: String,

    /// Default base URL, prefixed to every step path unless the step
    /// overrides it.
    #[serde(rename = "serverUrl")]
    pub server_url: String,

    /// Applied to any step that declares no auth of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sharedAuth")]
    pub shared_auth: Option<AuthScheme>,

    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowDocument {
    /// Steps in execution order: ascending `order`, ties keep document order.
    pub fn ordered_steps(&self) -> Vec<&WorkflowStep> {
        let mut steps: Vec<&WorkflowStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        steps
    }
}
