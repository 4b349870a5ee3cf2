use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::runner::report::{RunStatus, StepExecutionResult};

#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        document_id: String,
    },
    StepStarted {
        run_id: Uuid,
        step_id: String,
    },
    /// Emitted exactly once per executed (non-skipped) step, in execution
    /// order, before the runner advances.
    StepCompleted {
        run_id: Uuid,
        result: StepExecutionResult,
    },
    RunFinished {
        run_id: Uuid,
        status: RunStatus,
    },
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}

/// One JSON line per event.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        let json = match event {
            Event::RunStarted {
                run_id,
                document_id,
            } => {
                json!({ "type": "run.started", "run_id": run_id.to_string(), "document_id": document_id })
            }
            Event::StepStarted { run_id, step_id } => {
                json!({ "type": "step.started", "run_id": run_id.to_string(), "step_id": step_id })
            }
            Event::StepCompleted { run_id, result } => {
                json!({
                    "type": "step.completed",
                    "run_id": run_id.to_string(),
                    "step_id": result.step_id,
                    "status": result.status.as_str(),
                })
            }
            Event::RunFinished { run_id, status } => {
                json!({ "type": "run.finished", "run_id": run_id.to_string(), "status": status.as_str() })
            }
        };
        println!("{}", serde_json::to_string(&json).unwrap_or_default());
    }
}

/// Forwards events into a channel for live progress UIs. Sending never
/// blocks; a dropped receiver is ignored.
pub struct ChannelEventSink {
    tx: tokio::sync::mpsc::UnboundedSender<Event>,
}

impl ChannelEventSink {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn emit(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}
