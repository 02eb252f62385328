//! Observer seam between the orchestrator and whatever displays progress.
//!
//! The orchestrator never prints. It reports every stage transition to a
//! [`PipelineObserver`]; the CLI renders them to the console.

use std::sync::Mutex;

use crate::error::CheckError;
use crate::pipeline::{RunReport, StageOutcome};
use crate::stage::Stage;

/// Receives progress events from a pipeline run.
pub trait PipelineObserver: Send + Sync {
    /// A stage is about to run.
    fn on_stage_start(&self, stage: Stage);

    /// A stage finished without error.
    fn on_stage_passed(&self, stage: Stage, outcome: &StageOutcome);

    /// A stage failed; no further stage will run.
    fn on_stage_failed(&self, stage: Stage, error: &CheckError);

    /// The run reached its terminal state.
    fn on_finish(&self, _report: &RunReport) {}
}

/// Observer that ignores every event.
pub struct NoOpObserver;

impl PipelineObserver for NoOpObserver {
    fn on_stage_start(&self, _stage: Stage) {}
    fn on_stage_passed(&self, _stage: Stage, _outcome: &StageOutcome) {}
    fn on_stage_failed(&self, _stage: Stage, _error: &CheckError) {}
}

/// Event captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    Started(Stage),
    Passed(Stage),
    Failed(Stage, CheckError),
    Finished,
}

/// Observer that records events in order (for testing).
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Stages that were started, in order.
    pub fn started(&self) -> Vec<Stage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Started(stage) => Some(stage),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ObservedEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_stage_start(&self, stage: Stage) {
        self.push(ObservedEvent::Started(stage));
    }

    fn on_stage_passed(&self, stage: Stage, _outcome: &StageOutcome) {
        self.push(ObservedEvent::Passed(stage));
    }

    fn on_stage_failed(&self, stage: Stage, error: &CheckError) {
        self.push(ObservedEvent::Failed(stage, error.clone()));
    }

    fn on_finish(&self, _report: &RunReport) {
        self.push(ObservedEvent::Finished);
    }
}
