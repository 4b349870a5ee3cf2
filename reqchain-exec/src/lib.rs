//! Sequential HTTP workflow runtime for reqchain.
//!
//! Document parsing and validation live in `reqchain-core`; this crate owns
//! request rendering, the HTTP collaborator, and the run loop. The default
//! [`ReqwestExecutor`] refuses requests to private networks and cloud
//! metadata endpoints; see [`guard`].

#![forbid(unsafe_code)]

pub mod guard;
pub mod runner;

pub use guard::{GuardError, UrlGuardConfig};
pub use runner::{
    AbortHandle, ApiRequest, ApiResponse, ChannelEventSink, CompositeEventSink, Event, EventSink,
    HttpError, HttpExecutor, HttpExecutorConfig, NoOpEventSink, ReqwestExecutor, RunOptions,
    RunReport, RunStatus, StdoutEventSink, StepExecutionResult, StepStatus, WorkflowRunner,
};
