//! The check orchestrator.
//!
//! Runs a [`Pipeline`] stage by stage. The first failing stage ends the run;
//! an empty collection listing ends it with [`Verdict::NeedsIngestion`]
//! instead of proceeding to the query.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::checks::{
    check_health, exercise_query, inspect_collections, probe_target, validate_environment,
    CollectionListing, HealthSummary, QueryRequest, QueryResult, TargetProbe,
};
use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::ingest::Ingestor;
use crate::observer::PipelineObserver;
use crate::settings::{EnvSnapshot, Settings};
use crate::stage::{Pipeline, Stage};
use crate::transport::HttpTransport;

/// What a passing stage produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Environment,
    Target(TargetProbe),
    Health(HealthSummary),
    Collections(CollectionListing),
    Ingested { command: String },
    Query(QueryResult),
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Every scheduled stage passed.
    Passed,
    /// The API is up but the vector database holds no collections.
    NeedsIngestion,
    /// A stage failed; later stages did not run.
    Failed { stage: Stage, error: CheckError },
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Passed)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<(Stage, StageOutcome)>,
    pub verdict: Verdict,
}

impl RunReport {
    /// Stages that passed, in run order.
    pub fn completed(&self) -> Vec<Stage> {
        self.outcomes.iter().map(|(stage, _)| *stage).collect()
    }

    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, outcome)| outcome)
    }

    pub fn query_result(&self) -> Option<&QueryResult> {
        match self.outcome(Stage::Query) {
            Some(StageOutcome::Query(result)) => Some(result),
            _ => None,
        }
    }

    /// Process exit code: 0 only when every stage passed.
    pub fn exit_code(&self) -> i32 {
        if self.verdict.is_success() {
            0
        } else {
            1
        }
    }
}

/// Runs pipelines against one RAG deployment.
pub struct Orchestrator<'a> {
    config: &'a CheckConfig,
    transport: &'a dyn HttpTransport,
    ingestor: Option<&'a dyn Ingestor>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a CheckConfig, transport: &'a dyn HttpTransport) -> Self {
        Self {
            config,
            transport,
            ingestor: None,
        }
    }

    /// Attach the ingestor used by [`Stage::Ingestion`].
    pub fn with_ingestor(mut self, ingestor: &'a dyn Ingestor) -> Self {
        self.ingestor = Some(ingestor);
        self
    }

    /// Run every stage in order, stopping at the first failure.
    pub async fn run(
        &self,
        pipeline: &Pipeline,
        snapshot: &EnvSnapshot,
        observer: &dyn PipelineObserver,
    ) -> RunReport {
        let started_at = Utc::now();
        let mut settings: Option<Settings> = None;
        let mut outcomes = Vec::new();
        let mut verdict = Verdict::Passed;

        for &stage in pipeline.stages() {
            observer.on_stage_start(stage);
            debug!(stage = %stage, "Stage starting");

            match self.run_stage(stage, snapshot, &mut settings).await {
                Ok(outcome) => {
                    observer.on_stage_passed(stage, &outcome);
                    let needs_ingestion =
                        matches!(outcome, StageOutcome::Collections(CollectionListing::Empty));
                    outcomes.push((stage, outcome));
                    if needs_ingestion {
                        info!("No collections found; content processing needed");
                        verdict = Verdict::NeedsIngestion;
                        break;
                    }
                }
                Err(error) => {
                    warn!(stage = %stage, kind = %error.kind(), error = %error, "Stage failed");
                    observer.on_stage_failed(stage, &error);
                    verdict = Verdict::Failed { stage, error };
                    break;
                }
            }
        }

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
            verdict,
        };
        info!(
            success = report.verdict.is_success(),
            completed = report.outcomes.len(),
            "Check run finished"
        );
        observer.on_finish(&report);
        report
    }

    async fn run_stage(
        &self,
        stage: Stage,
        snapshot: &EnvSnapshot,
        settings: &mut Option<Settings>,
    ) -> Result<StageOutcome, CheckError> {
        match stage {
            Stage::Environment => {
                *settings = Some(validate_environment(snapshot)?);
                Ok(StageOutcome::Environment)
            }
            Stage::TargetUrl => {
                let settings = require_settings(settings.as_ref())?;
                let probe = probe_target(
                    self.transport,
                    &settings.target_url,
                    self.config.target_timeout(),
                )
                .await?;
                Ok(StageOutcome::Target(probe))
            }
            Stage::ApiHealth => {
                let url = self.config.endpoint("health")?;
                let summary =
                    check_health(self.transport, &url, self.config.request_timeout()).await?;
                Ok(StageOutcome::Health(summary))
            }
            Stage::Collections => {
                let url = self.config.endpoint("collections")?;
                let listing =
                    inspect_collections(self.transport, &url, self.config.request_timeout())
                        .await?;
                Ok(StageOutcome::Collections(listing))
            }
            Stage::Ingestion => {
                let settings = require_settings(settings.as_ref())?;
                let ingestor = self.ingestor.ok_or_else(|| CheckError::InvalidConfig {
                    message: "no ingestor configured for the ingestion stage".into(),
                })?;
                ingestor.ingest(settings).await?;
                Ok(StageOutcome::Ingested {
                    command: ingestor.describe(),
                })
            }
            Stage::Query => {
                let url = self.config.endpoint("query")?;
                let request = QueryRequest {
                    query: self.config.sample_query.clone(),
                    top_k: self.config.top_k,
                };
                let result =
                    exercise_query(self.transport, &url, &request, self.config.query_timeout())
                        .await?;
                Ok(StageOutcome::Query(result))
            }
        }
    }
}

fn require_settings(settings: Option<&Settings>) -> Result<&Settings, CheckError> {
    settings.ok_or_else(|| CheckError::InvalidConfig {
        message: "settings are not available before the environment stage".into(),
    })
}
