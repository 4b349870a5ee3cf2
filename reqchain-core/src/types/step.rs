use std::collections::BTreeMap;

use crate::types::{AuthScheme, VariableExtraction};

/// One HTTP call in the chain.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkflowStep {
    pub id: String,

    pub name: String,

    /// Execution position, ascending. Storage order is irrelevant.
    #[serde(default)]
    pub order: i64,

    pub request: RequestTemplate,

    /// Run against this step's response body, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extractions: Vec<VariableExtraction>,
}

/// A request before placeholder substitution. Every string field except
/// `method` may contain `{{name}}` placeholders.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RequestTemplate {
    pub method: String,

    /// Relative to the effective base URL.
    pub path: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "serverUrl")]
    pub server_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthScheme>,
}
