/// Binds the value at `json_path` in a successful response body to `name`
/// in the run's variable scope.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VariableExtraction {
    pub id: String,

    pub name: String,

    #[serde(rename = "jsonPath")]
    pub json_path: String,
}
