use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use reqchain_core::types::{ApiKeyPlacement, AuthScheme};
use reqchain_core::ALLOWED_METHODS;

use crate::guard::{validate_url, GuardError, UrlGuardConfig};

/// A fully rendered request, ready for dispatch. `url` is the complete
/// effective target.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub auth: Option<AuthScheme>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ApiResponse {
    pub status: u16,

    #[serde(rename = "statusText")]
    pub status_text: String,

    pub headers: BTreeMap<String, String>,

    /// Content-type decoded: JSON responses parse to structured values,
    /// everything else is a string value.
    pub body: Value,

    #[serde(rename = "durationMs")]
    pub duration_ms: u64,

    #[serde(rename = "sizeBytes")]
    pub size_bytes: usize,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("timeout")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error(transparent)]
    Denied(#[from] GuardError),
    #[error("method '{0}' is not allowed")]
    MethodNotAllowed(String),
    #[error("invalid header name: '{0}'")]
    InvalidHeaderName(String),
    #[error("invalid header value for '{0}'")]
    InvalidHeaderValue(String),
    #[error("response too large (>{max_bytes} bytes)")]
    ResponseTooLarge { max_bytes: usize },
    /// A response was obtained but the executor's policy treats its status
    /// as failure.
    #[error("HTTP {status} {text}", status = .response.status, text = .response.status_text)]
    Status { response: Box<ApiResponse> },
    #[error("http error: {0}")]
    Other(String),
}

impl HttpError {
    /// The network response behind this failure, where one was obtained.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            HttpError::Status { response } => Some(response),
            _ => None,
        }
    }
}

#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, req: ApiRequest) -> Result<ApiResponse, HttpError>;
}

#[derive(Debug, Clone)]
pub struct HttpExecutorConfig {
    pub timeout: Duration,
    pub max_response_bytes: usize,
    pub max_redirects: usize,
    /// Treat non-2xx responses as failures. What counts as a failure is this
    /// executor's policy; the runner never inspects status codes.
    pub fail_on_error_status: bool,
    pub guard: UrlGuardConfig,
}

impl Default for HttpExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_response_bytes: 10 * 1024 * 1024,
            max_redirects: 5,
            fail_on_error_status: true,
            guard: UrlGuardConfig::default(),
        }
    }
}

pub struct ReqwestExecutor {
    client: reqwest::Client,
    config: HttpExecutorConfig,
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        Self::new(HttpExecutorConfig::default())
    }
}

impl ReqwestExecutor {
    pub fn new(config: HttpExecutorConfig) -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .user_agent(concat!("reqchain-exec/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                panic!("failed to create reqwest HTTP client: {e}. This is a bug - please report it.");
            });
        Self { client, config }
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, req: ApiRequest) -> Result<ApiResponse, HttpError> {
        let method_upper = req.method.to_uppercase();
        if !ALLOWED_METHODS.contains(&method_upper.as_str()) {
            return Err(HttpError::MethodNotAllowed(req.method));
        }
        let method = reqwest::Method::from_bytes(method_upper.as_bytes())
            .map_err(|e| HttpError::Other(e.to_string()))?;

        let mut url = validate_url(&req.url, &self.config.guard)?;

        let mut header_map = HeaderMap::new();
        for (key, value) in &req.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| HttpError::InvalidHeaderName(key.clone()))?;
            let val = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeaderValue(key.clone()))?;
            header_map.insert(name, val);
        }

        // Query-placed api keys go on the URL before the request is built.
        if let Some(AuthScheme::ApiKey {
            name,
            value,
            r#in: ApiKeyPlacement::Query,
        }) = &req.auth
        {
            url.query_pairs_mut().append_pair(name, value);
        }

        let mut rb = self
            .client
            .request(method, url)
            .headers(header_map)
            .timeout(self.config.timeout);

        match &req.auth {
            Some(AuthScheme::Bearer { token }) => {
                rb = rb.bearer_auth(token);
            }
            Some(AuthScheme::Basic { username, password }) => {
                rb = rb.basic_auth(username, Some(password));
            }
            Some(AuthScheme::ApiKey {
                name,
                value,
                r#in: ApiKeyPlacement::Header,
            }) => {
                let header = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| HttpError::InvalidHeaderName(name.clone()))?;
                let val = HeaderValue::from_str(value)
                    .map_err(|_| HttpError::InvalidHeaderValue(name.clone()))?;
                rb = rb.header(header, val);
            }
            Some(AuthScheme::ApiKey {
                r#in: ApiKeyPlacement::Query,
                ..
            })
            | None => {}
        }

        if let Some(body) = req.body {
            rb = rb.body(body);
        }

        let start = Instant::now();
        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let status = resp.status();
        let mut headers = BTreeMap::new();
        for (k, v) in resp.headers().iter() {
            if let Ok(s) = v.to_str() {
                headers.insert(k.to_string(), s.to_string());
            }
        }
        let content_type = headers.get("content-type").cloned().unwrap_or_default();

        // Read the body with the size cap.
        let bytes = resp.bytes().await.map_err(map_reqwest_error)?;
        if bytes.len() > self.config.max_response_bytes {
            return Err(HttpError::ResponseTooLarge {
                max_bytes: self.config.max_response_bytes,
            });
        }

        let response = ApiResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            headers,
            body: decode_body(&content_type, &bytes),
            duration_ms,
            size_bytes: bytes.len(),
        };

        if self.config.fail_on_error_status && !status.is_success() {
            return Err(HttpError::Status {
                response: Box::new(response),
            });
        }

        Ok(response)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        return HttpError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        return HttpError::Network(e.to_string());
    }
    HttpError::Other(e.to_string())
}

fn decode_body(content_type: &str, bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);
    if content_type.contains("json") {
        if let Ok(v) = serde_json::from_str(&text) {
            return v;
        }
    }
    Value::String(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_content_type_decodes_to_structured_body() {
        let body = decode_body("application/json; charset=utf-8", br#"{"a": 1}"#);
        assert_eq!(body, json!({"a": 1}));
    }

    #[test]
    fn non_json_content_type_stays_a_string() {
        let body = decode_body("text/plain", b"{\"a\": 1}");
        assert_eq!(body, json!("{\"a\": 1}"));
    }

    #[test]
    fn invalid_json_payload_falls_back_to_string() {
        let body = decode_body("application/json", b"not json");
        assert_eq!(body, json!("not json"));
    }

    #[test]
    fn status_error_displays_code_and_reason() {
        let err = HttpError::Status {
            response: Box::new(ApiResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                headers: BTreeMap::new(),
                body: Value::String(String::new()),
                duration_ms: 3,
                size_bytes: 0,
            }),
        };
        assert_eq!(err.to_string(), "HTTP 404 Not Found");
        assert_eq!(err.response().map(|r| r.status), Some(404));
    }

    #[tokio::test]
    async fn unknown_method_is_rejected_before_dispatch() {
        let exec = ReqwestExecutor::default();
        let err = exec
            .execute(ApiRequest {
                method: "FETCH".to_string(),
                url: "https://api.example.com/x".to_string(),
                headers: BTreeMap::new(),
                body: None,
                auth: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::MethodNotAllowed(_)));
    }

    #[tokio::test]
    async fn guarded_url_is_rejected_before_dispatch() {
        let exec = ReqwestExecutor::default();
        let err = exec
            .execute(ApiRequest {
                method: "GET".to_string(),
                url: "http://127.0.0.1:9/x".to_string(),
                headers: BTreeMap::new(),
                body: None,
                auth: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Denied(_)));
    }
}
