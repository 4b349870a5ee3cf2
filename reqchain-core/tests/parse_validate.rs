use std::collections::BTreeMap;

use reqchain_core::parser::{parse_document_str, DocumentFormat};
use reqchain_core::types::{
    ApiKeyPlacement, AuthScheme, RequestTemplate, VariableExtraction, WorkflowDocument,
    WorkflowStep,
};
use reqchain_core::validate::{validate_document, Validate};

const DOC_JSON: &str = r#"{
  "id": "wf-1",
  "name": "Login then fetch",
  "serverUrl": "https://api.example.com",
  "sharedAuth": {"type": "bearer", "token": "tok"},
  "steps": [
    {
      "id": "login",
      "name": "Login",
      "order": 1,
      "request": {
        "method": "POST",
        "path": "/login",
        "body": "{\"user\":\"u\"}"
      },
      "extractions": [
        {"id": "e1", "name": "token", "jsonPath": "$.access_token"}
      ]
    }
  ]
}"#;

const DOC_YAML: &str = r#"
id: wf-1
name: Login then fetch
serverUrl: https://api.example.com
steps:
  - id: login
    name: Login
    order: 1
    request:
      method: POST
      path: /login
"#;

fn make_request() -> RequestTemplate {
    RequestTemplate {
        method: "GET".to_string(),
        path: "/items".to_string(),
        headers: BTreeMap::new(),
        query: BTreeMap::new(),
        body: None,
        server_url: None,
        auth: None,
    }
}

fn make_step(id: &str, order: i64) -> WorkflowStep {
    WorkflowStep {
        id: id.to_string(),
        name: id.to_string(),
        order,
        request: make_request(),
        extractions: Vec::new(),
    }
}

fn make_doc(steps: Vec<WorkflowStep>) -> WorkflowDocument {
    WorkflowDocument {
        id: "doc-1".to_string(),
        name: "test".to_string(),
        server_url: "https://api.example.com".to_string(),
        shared_auth: None,
        steps,
    }
}

#[test]
fn parses_json_document() {
    let parsed = parse_document_str(DOC_JSON, DocumentFormat::Json).unwrap();
    assert_eq!(parsed.document.id, "wf-1");
    assert_eq!(parsed.document.steps.len(), 1);
    assert_eq!(
        parsed.document.steps[0].extractions[0].json_path,
        "$.access_token"
    );
    assert_eq!(
        parsed.document.shared_auth,
        Some(AuthScheme::Bearer {
            token: "tok".to_string()
        })
    );
}

#[test]
fn auto_detects_json_and_yaml() {
    let json = parse_document_str(DOC_JSON, DocumentFormat::Auto).unwrap();
    assert_eq!(json.format, DocumentFormat::Json);

    let yaml = parse_document_str(DOC_YAML, DocumentFormat::Auto).unwrap();
    assert_eq!(yaml.format, DocumentFormat::Yaml);
    assert_eq!(yaml.document.steps[0].request.method, "POST");
}

#[test]
fn api_key_auth_round_trips_with_placement() {
    let auth: AuthScheme =
        serde_json::from_str(r#"{"type":"apiKey","name":"X-Key","value":"v","in":"query"}"#)
            .unwrap();
    assert_eq!(
        auth,
        AuthScheme::ApiKey {
            name: "X-Key".to_string(),
            value: "v".to_string(),
            r#in: ApiKeyPlacement::Query,
        }
    );

    // Placement defaults to header when omitted.
    let auth: AuthScheme =
        serde_json::from_str(r#"{"type":"apiKey","name":"X-Key","value":"v"}"#).unwrap();
    assert!(matches!(
        auth,
        AuthScheme::ApiKey {
            r#in: ApiKeyPlacement::Header,
            ..
        }
    ));
}

#[test]
fn ordered_steps_sorts_ascending_with_stable_ties() {
    let doc = make_doc(vec![
        make_step("b", 2),
        make_step("a", 1),
        make_step("a2", 1),
    ]);
    let ids: Vec<&str> = doc.ordered_steps().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "a2", "b"]);
}

#[test]
fn valid_document_passes() {
    let doc = make_doc(vec![make_step("a", 1), make_step("b", 2)]);
    assert!(doc.validate().is_ok());
}

#[test]
fn duplicate_step_ids_are_flagged() {
    let doc = make_doc(vec![make_step("a", 1), make_step("a", 2)]);
    let err = validate_document(&doc).unwrap_err();
    assert!(err
        .violations
        .iter()
        .any(|v| v.message.contains("unique")));
}

#[test]
fn duplicate_order_values_are_flagged() {
    let doc = make_doc(vec![make_step("a", 1), make_step("b", 1)]);
    let err = validate_document(&doc).unwrap_err();
    assert!(err.violations.iter().any(|v| v.path.ends_with(".order")));
}

#[test]
fn unknown_method_is_flagged() {
    let mut doc = make_doc(vec![make_step("a", 1)]);
    doc.steps[0].request.method = "FETCH".to_string();
    let err = validate_document(&doc).unwrap_err();
    assert!(err
        .violations
        .iter()
        .any(|v| v.path.ends_with(".request.method")));
}

#[test]
fn method_check_is_case_insensitive() {
    let mut doc = make_doc(vec![make_step("a", 1)]);
    doc.steps[0].request.method = "post".to_string();
    assert!(validate_document(&doc).is_ok());
}

#[test]
fn invalid_extraction_path_is_flagged() {
    let mut doc = make_doc(vec![make_step("a", 1)]);
    doc.steps[0].extractions.push(VariableExtraction {
        id: "e1".to_string(),
        name: "x".to_string(),
        json_path: String::new(),
    });
    let err = validate_document(&doc).unwrap_err();
    assert!(err
        .violations
        .iter()
        .any(|v| v.path.ends_with(".jsonPath")));
}

#[test]
fn reference_to_later_step_extraction_is_flagged() {
    let mut first = make_step("first", 1);
    first
        .request
        .headers
        .insert("Authorization".to_string(), "Bearer {{token}}".to_string());

    let mut second = make_step("second", 2);
    second.extractions.push(VariableExtraction {
        id: "e1".to_string(),
        name: "token".to_string(),
        json_path: "$.access_token".to_string(),
    });

    let doc = make_doc(vec![first, second]);
    let err = validate_document(&doc).unwrap_err();
    assert!(err
        .violations
        .iter()
        .any(|v| v.message.contains("no earlier step extracts")));
}

#[test]
fn reference_to_earlier_step_extraction_is_allowed() {
    let mut first = make_step("first", 1);
    first.extractions.push(VariableExtraction {
        id: "e1".to_string(),
        name: "token".to_string(),
        json_path: "$.access_token".to_string(),
    });

    let mut second = make_step("second", 2);
    second
        .request
        .headers
        .insert("Authorization".to_string(), "Bearer {{token}}".to_string());

    let doc = make_doc(vec![first, second]);
    assert!(validate_document(&doc).is_ok());
}

#[test]
fn validation_error_display_names_the_count() {
    let doc = make_doc(vec![make_step("a", 1), make_step("a", 1)]);
    let err = validate_document(&doc).unwrap_err();
    assert!(err.to_string().contains("violations"));
    assert!(!err.violations.is_empty());
}
