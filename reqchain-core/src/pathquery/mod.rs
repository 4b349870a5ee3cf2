use serde_json::Value;
use serde_json_path::JsonPath;
use thiserror::Error;

/// Upper bound on extraction path length. A guard against pathological
/// expressions, not a correctness requirement.
pub const MAX_PATH_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path expression must not be empty")]
    Empty,
    #[error("path expression exceeds maximum length of {max} characters")]
    TooLong { max: usize },
    #[error("invalid path expression: {0}")]
    Syntax(String),
}

/// Evaluate a JSONPath expression against `value` and return the first
/// matched node.
///
/// `Ok(None)` means the query matched nothing, which is distinct from
/// matching an explicit JSON null. Queries over scalar roots never fail;
/// any non-trivial path over them is simply absent.
pub fn evaluate(path: &str, value: &Value) -> Result<Option<Value>, PathError> {
    let query = JsonPath::parse(path).map_err(|e| PathError::Syntax(e.to_string()))?;
    Ok(query.query(value).all().into_iter().next().cloned())
}

/// Check an extraction path without evaluating it against real data.
pub fn validate_path(expression: &str) -> Result<(), PathError> {
    if expression.trim().is_empty() {
        return Err(PathError::Empty);
    }
    if expression.chars().count() > MAX_PATH_LEN {
        return Err(PathError::TooLong { max: MAX_PATH_LEN });
    }
    JsonPath::parse(expression).map_err(|e| PathError::Syntax(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn member_access_returns_bare_value() {
        let body = json!({"access_token": "abc123"});
        let got = evaluate("$.access_token", &body).unwrap();
        assert_eq!(got, Some(json!("abc123")));
    }

    #[test]
    fn array_index_access() {
        let body = json!({"items": [{"id": 7}, {"id": 8}]});
        let got = evaluate("$.items[1].id", &body).unwrap();
        assert_eq!(got, Some(json!(8)));
    }

    #[test]
    fn recursive_descent_takes_first_match() {
        let body = json!({"a": {"id": 1}, "b": {"id": 2}});
        let got = evaluate("$..id", &body).unwrap();
        assert_eq!(got, Some(json!(1)));
    }

    #[test]
    fn missing_member_is_absent_not_error() {
        let body = json!({"a": 1});
        assert_eq!(evaluate("$.b", &body).unwrap(), None);
    }

    #[test]
    fn found_null_is_distinct_from_absent() {
        let body = json!({"a": null});
        assert_eq!(evaluate("$.a", &body).unwrap(), Some(Value::Null));
        assert_eq!(evaluate("$.b", &body).unwrap(), None);
    }

    #[test]
    fn scalar_root_never_panics() {
        assert_eq!(evaluate("$.foo", &json!("just a string")).unwrap(), None);
        assert_eq!(evaluate("$.foo", &json!(42)).unwrap(), None);
    }

    #[test]
    fn malformed_query_is_a_syntax_error() {
        let err = evaluate("$.[unclosed", &json!({})).unwrap_err();
        assert!(matches!(err, PathError::Syntax(_)));
    }

    #[test]
    fn validate_rejects_empty_and_whitespace() {
        assert_eq!(validate_path(""), Err(PathError::Empty));
        assert_eq!(validate_path("   "), Err(PathError::Empty));
    }

    #[test]
    fn validate_rejects_overlong_expression_naming_the_bound() {
        let long = format!("$.{}", "a".repeat(MAX_PATH_LEN));
        let err = validate_path(&long).unwrap_err();
        assert_eq!(err, PathError::TooLong { max: MAX_PATH_LEN });
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn validate_accepts_ordinary_paths() {
        assert!(validate_path("$.data.items[0].id").is_ok());
        assert!(validate_path("$..token").is_ok());
    }
}
