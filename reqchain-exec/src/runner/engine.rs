use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use uuid::Uuid;

use reqchain_core::extract::extract_variables;
use reqchain_core::types::WorkflowDocument;

use crate::runner::abort::AbortHandle;
use crate::runner::events::{Event, EventSink, NoOpEventSink};
use crate::runner::http::HttpExecutor;
use crate::runner::render::render_request;
use crate::runner::report::{RunReport, RunStatus, StepExecutionResult, StepStatus};

/// Per-run options.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Run id to report; a fresh v4 id is generated when absent.
    pub run_id: Option<Uuid>,
    /// Cancellation handle. A run given no handle can never be aborted.
    pub abort: Option<AbortHandle>,
}

/// Drives one document at a time, strictly in step order.
///
/// The runner holds no per-run state; concurrent `execute` calls share
/// nothing, and each run honors only the abort handle passed in its own
/// options.
pub struct WorkflowRunner {
    http: Arc<dyn HttpExecutor>,
    sink: Arc<dyn EventSink>,
}

impl WorkflowRunner {
    pub fn new(http: Arc<dyn HttpExecutor>) -> Self {
        Self {
            http,
            sink: Arc::new(NoOpEventSink),
        }
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run `doc` to completion, failure, or abort.
    ///
    /// The report always carries one result per document step, in execution
    /// order, including steps that never ran. Any step failure halts the
    /// run; extraction problems never do.
    pub async fn execute(&self, doc: &WorkflowDocument, options: RunOptions) -> RunReport {
        let run_id = options.run_id.unwrap_or_else(Uuid::new_v4);
        let abort = options.abort.unwrap_or_default();
        let started = Instant::now();

        let steps = doc.ordered_steps();
        let mut results: Vec<StepExecutionResult> = steps
            .iter()
            .map(|s| StepExecutionResult::pending(&s.id))
            .collect();
        let mut scope: BTreeMap<String, Value> = BTreeMap::new();
        let mut status = RunStatus::Running;

        self.sink
            .emit(Event::RunStarted {
                run_id,
                document_id: doc.id.clone(),
            })
            .await;

        for (idx, step) in steps.into_iter().enumerate() {
            // Abort is honored only at step boundaries; an in-flight request
            // is never interrupted.
            if abort.is_aborted() {
                mark_skipped(&mut results[idx..]);
                status = RunStatus::Aborted;
                break;
            }

            results[idx].status = StepStatus::Running;
            self.sink
                .emit(Event::StepStarted {
                    run_id,
                    step_id: step.id.clone(),
                })
                .await;

            let request = render_request(doc, step, &scope);
            match self.http.execute(request).await {
                Ok(response) => {
                    let outcome = extract_variables(&response.body, &step.extractions);
                    for (name, value) in &outcome.extracted {
                        scope.insert(name.clone(), value.clone());
                    }

                    let result = &mut results[idx];
                    result.status = StepStatus::Success;
                    result.response = Some(response);
                    result.extracted_variables = outcome.extracted;
                    result.extraction_errors = outcome.errors;
                }
                Err(err) => {
                    let result = &mut results[idx];
                    result.status = StepStatus::Failure;
                    result.response = err.response().cloned();
                    result.error = Some(err.to_string());
                }
            }

            self.sink
                .emit(Event::StepCompleted {
                    run_id,
                    result: results[idx].clone(),
                })
                .await;

            if results[idx].status == StepStatus::Failure {
                mark_skipped(&mut results[idx + 1..]);
                status = RunStatus::Failed;
                break;
            }

            // The step that just finished keeps its real outcome; an abort
            // requested during it stops the run here.
            if abort.is_aborted() {
                mark_skipped(&mut results[idx + 1..]);
                status = RunStatus::Aborted;
                break;
            }
        }

        if status == RunStatus::Running {
            status = RunStatus::Completed;
        }

        self.sink.emit(Event::RunFinished { run_id, status }).await;

        RunReport {
            run_id,
            status,
            results,
            variables: scope,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}

fn mark_skipped(results: &mut [StepExecutionResult]) {
    for r in results {
        r.status = StepStatus::Skipped;
    }
}
