mod auth;
mod document;
mod extraction;
mod step;

pub use auth::{ApiKeyPlacement, AuthScheme};
pub use document::WorkflowDocument;
pub use extraction::VariableExtraction;
pub use step::{RequestTemplate, WorkflowStep};
