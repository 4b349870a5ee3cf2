#![forbid(unsafe_code)]

pub mod error;
pub mod extract;
pub mod parser;
pub mod pathquery;
pub mod template;
pub mod types;
pub mod validate;

pub use crate::error::{DocumentError, ParseError, ValidationError, Violation};
pub use crate::extract::{extract_variables, preview_extraction, ExtractionOutcome};
pub use crate::parser::{parse_document_str, DocumentFormat, ParsedDocument};
pub use crate::pathquery::{PathError, MAX_PATH_LEN};
pub use crate::template::{
    extract_references, substitute, validate_references, SubstitutionContext,
};
pub use crate::types::WorkflowDocument;
pub use crate::validate::{validate_document, Validate, ALLOWED_METHODS};
