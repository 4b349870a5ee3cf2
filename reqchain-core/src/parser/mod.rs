use crate::error::ParseError;
use crate::types::WorkflowDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub document: WorkflowDocument,
    pub format: DocumentFormat,
}

pub fn parse_document_str(
    input: &str,
    format: DocumentFormat,
) -> Result<ParsedDocument, ParseError> {
    match format {
        DocumentFormat::Json => Ok(ParsedDocument {
            document: serde_json::from_str(input)?,
            format,
        }),
        DocumentFormat::Yaml => Ok(ParsedDocument {
            document: serde_yaml::from_str(input)?,
            format,
        }),
        DocumentFormat::Auto => parse_document_auto(input),
    }
}

fn parse_document_auto(input: &str) -> Result<ParsedDocument, ParseError> {
    // JSON documents start with `{` or `[` after leading whitespace. Try the
    // likely format first; report its error if both fail.
    let looks_like_json = matches!(input.trim_start().chars().next(), Some('{' | '['));
    if looks_like_json {
        match serde_json::from_str::<WorkflowDocument>(input) {
            Ok(document) => Ok(ParsedDocument {
                document,
                format: DocumentFormat::Json,
            }),
            Err(json_err) => match serde_yaml::from_str::<WorkflowDocument>(input) {
                Ok(document) => Ok(ParsedDocument {
                    document,
                    format: DocumentFormat::Yaml,
                }),
                Err(_) => Err(ParseError::Json(json_err)),
            },
        }
    } else {
        match serde_yaml::from_str::<WorkflowDocument>(input) {
            Ok(document) => Ok(ParsedDocument {
                document,
                format: DocumentFormat::Yaml,
            }),
            Err(yaml_err) => match serde_json::from_str::<WorkflowDocument>(input) {
                Ok(document) => Ok(ParsedDocument {
                    document,
                    format: DocumentFormat::Json,
                }),
                Err(_) => Err(ParseError::Yaml(yaml_err)),
            },
        }
    }
}
