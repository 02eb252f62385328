//! Stages, their declared dependencies, and the two standard pipelines.

use serde::Serialize;
use std::fmt;

use crate::error::PipelineError;

/// One discrete check in a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Environment,
    TargetUrl,
    ApiHealth,
    Collections,
    Ingestion,
    Query,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Environment => "environment",
            Stage::TargetUrl => "target_url",
            Stage::ApiHealth => "api_health",
            Stage::Collections => "collections",
            Stage::Ingestion => "ingestion",
            Stage::Query => "query",
        }
    }

    /// What the stage does, for progress output.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Environment => "Checking environment variables",
            Stage::TargetUrl => "Checking if target URL is accessible",
            Stage::ApiHealth => "Checking API connection",
            Stage::Collections => "Checking collections in vector database",
            Stage::Ingestion => "Running content processing pipeline",
            Stage::Query => "Testing sample query",
        }
    }

    /// Stages that must have passed earlier in the same run.
    pub fn depends_on(&self) -> &'static [Stage] {
        match self {
            Stage::Environment => &[],
            Stage::TargetUrl => &[Stage::Environment],
            Stage::ApiHealth => &[],
            Stage::Collections => &[Stage::ApiHealth],
            Stage::Ingestion => &[Stage::Environment],
            Stage::Query => &[Stage::ApiHealth],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered list of stages whose dependencies are all scheduled earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Validate and build a pipeline.
    pub fn new(stages: Vec<Stage>) -> Result<Self, PipelineError> {
        if stages.is_empty() {
            return Err(PipelineError::Empty);
        }
        for (idx, stage) in stages.iter().enumerate() {
            let earlier = &stages[..idx];
            if earlier.contains(stage) {
                return Err(PipelineError::DuplicateStage {
                    stage: stage.name().to_string(),
                });
            }
            if let Some(dep) = stage.depends_on().iter().find(|d| !earlier.contains(*d)) {
                return Err(PipelineError::UnmetDependency {
                    stage: stage.name().to_string(),
                    dependency: dep.name().to_string(),
                });
            }
        }
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

/// The two standard check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Read-only diagnosis; stops with "needs ingestion" on an empty database.
    Inspect,
    /// Runs the ingestion pipeline before querying. Mutates the vector database.
    Ingest,
}

impl Variant {
    pub fn stages(&self) -> &'static [Stage] {
        match self {
            Variant::Inspect => &[
                Stage::Environment,
                Stage::TargetUrl,
                Stage::ApiHealth,
                Stage::Collections,
                Stage::Query,
            ],
            Variant::Ingest => &[
                Stage::Environment,
                Stage::TargetUrl,
                Stage::ApiHealth,
                Stage::Ingestion,
                Stage::Query,
            ],
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline {
            stages: self.stages().to_vec(),
        }
    }

    /// Banner printed at the top of a run.
    pub fn banner(&self) -> &'static str {
        match self {
            Variant::Inspect => "RAG CHATBOT SYSTEM DEBUGGING",
            Variant::Ingest => "RAG CHATBOT SYSTEM TEST",
        }
    }
}
