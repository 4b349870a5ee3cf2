mod rules;
mod validator;

use crate::error::ValidationError;
use crate::types::WorkflowDocument;
use validator::Validator;

pub use validator::ALLOWED_METHODS;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for WorkflowDocument {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_document(self)
    }
}

pub fn validate_document(doc: &WorkflowDocument) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.validate_document(doc);
    v.finish()
}
