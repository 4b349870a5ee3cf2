#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyPlacement {
    Header,
    Query,
}

impl Default for ApiKeyPlacement {
    fn default() -> Self {
        Self::Header
    }
}

/// Authentication descriptor, either document-wide (`sharedAuth`) or
/// per-step. The runtime applies it when building the outbound request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuthScheme {
    Bearer {
        token: String,
    },
    Basic {
        username: String,
        password: String,
    },
    ApiKey {
        name: String,
        value: String,
        #[serde(default)]
        r#in: ApiKeyPlacement,
    },
}
