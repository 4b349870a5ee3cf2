//! Sequential run loop and its collaborators.

mod abort;
mod engine;
pub mod events;
pub mod http;
mod render;
mod report;

pub use abort::AbortHandle;
pub use engine::{RunOptions, WorkflowRunner};
pub use events::{
    ChannelEventSink, CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink,
};
pub use http::{
    ApiRequest, ApiResponse, HttpError, HttpExecutor, HttpExecutorConfig, ReqwestExecutor,
};
pub use render::render_request;
pub use report::{RunReport, RunStatus, StepExecutionResult, StepStatus};
