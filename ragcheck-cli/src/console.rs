//! Console rendering of a pipeline run.
//!
//! [`ConsoleObserver`] turns orchestrator events into the human-readable
//! checklist printed on stdout.

use std::io::Write;
use std::sync::Mutex;

use ragcheck_core::remediation::{
    failure_headline, needs_ingestion_block, setup_heading, setup_steps, stage_hints,
};
use ragcheck_core::{
    CheckConfig, CheckError, CollectionListing, PipelineObserver, RunReport, Stage, StageOutcome,
    Variant, Verdict,
};

const RULE_WIDTH: usize = 60;
const PREVIEW_CHARS: usize = 200;

fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

/// Observer that prints progress for one variant.
pub struct ConsoleObserver<W: Write + Send> {
    variant: Variant,
    config: CheckConfig,
    out: Mutex<W>,
}

impl ConsoleObserver<std::io::Stdout> {
    pub fn stdout(variant: Variant, config: &CheckConfig) -> Self {
        Self::new(variant, config, std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    pub fn new(variant: Variant, config: &CheckConfig, out: W) -> Self {
        Self {
            variant,
            config: config.clone(),
            out: Mutex::new(out),
        }
    }

    /// Consume the observer and return its writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn print_banner(&self) {
        self.emit(&[
            rule('='),
            self.variant.banner().to_string(),
            rule('='),
        ]);
    }

    fn emit<S: AsRef<str>>(&self, lines: &[S]) {
        if let Ok(mut out) = self.out.lock() {
            for line in lines {
                // Stdout going away mid-run is not worth aborting the checks for.
                let _ = writeln!(out, "{}", line.as_ref());
            }
            let _ = out.flush();
        }
    }

    fn outcome_lines(&self, outcome: &StageOutcome) -> Vec<String> {
        match outcome {
            StageOutcome::Environment => {
                vec!["✅ All required environment variables are set".to_string()]
            }
            StageOutcome::Target(probe) => {
                let mut lines = vec![
                    format!("   Checking: {}", probe.url),
                    "✅ Target URL is accessible".to_string(),
                ];
                if probe.textual {
                    lines.push("✅ Target URL contains text/HTML content".to_string());
                } else {
                    lines.push(format!(
                        "⚠️  Target URL content type is {}, might not be text-based",
                        probe.content_type.as_deref().unwrap_or("unknown")
                    ));
                }
                lines
            }
            StageOutcome::Health(summary) => vec![
                "✅ API server is running".to_string(),
                format!("   Status: {}", summary.status),
                format!("   Collections: {:?}", summary.collections),
            ],
            StageOutcome::Collections(CollectionListing::Populated(names)) => {
                vec![format!("✅ Collections found: {:?}", names)]
            }
            StageOutcome::Collections(CollectionListing::Empty) => vec![
                "✅ Collections found: []".to_string(),
                "⚠️  No collections found. You need to process your book content first."
                    .to_string(),
                format!("   Run: {}", self.config.ingest_command_line()),
            ],
            StageOutcome::Ingested { command } => vec![
                format!("   Ran: {}", command),
                "✅ Content processing completed successfully".to_string(),
            ],
            StageOutcome::Query(result) => {
                let mut lines = vec![
                    "✅ Query successful".to_string(),
                    format!("   Query: {}", result.query),
                ];
                match self.variant {
                    Variant::Inspect => {
                        lines.push(format!("   Response: {}...", result.preview(PREVIEW_CHARS)))
                    }
                    Variant::Ingest => lines.push(format!(
                        "   Response length: {} characters",
                        result.response.chars().count()
                    )),
                }
                lines.push(format!("   Sources found: {}", result.total_chunks));
                lines.push("✅ Content was found and used for response".to_string());
                if self.variant == Variant::Inspect {
                    lines.push(String::new());
                    lines.push("Full response preview:".to_string());
                    lines.push(rule('-'));
                    lines.push(result.response.clone());
                    lines.push(rule('-'));
                }
                lines
            }
        }
    }

    fn failure_lines(&self, stage: Stage, error: &CheckError) -> Vec<String> {
        let mut lines = match error {
            CheckError::NoSourceChunks { query, .. } => vec![
                "✅ Query successful".to_string(),
                format!("   Query: {}", query),
                "   Sources found: 0".to_string(),
                "⚠️  Query successful but no content was found in the database".to_string(),
            ],
            CheckError::UnexpectedStatus { body, status, .. } if stage == Stage::Query => vec![
                format!("❌ Query failed with status {}", status),
                format!("   Response: {}", body),
            ],
            other => vec![format!("❌ {}", other)],
        };
        lines.extend(
            stage_hints(stage, error, &self.config)
                .into_iter()
                .map(|hint| format!("   {}", hint)),
        );
        lines
    }

    fn summary_lines(&self, report: &RunReport) -> Vec<String> {
        let failed_stage = match &report.verdict {
            Verdict::Failed { stage, .. } => Some(*stage),
            _ => None,
        };
        let mut lines = vec![String::new(), "Stage summary:".to_string()];
        for stage in self.variant.stages() {
            let mark = if report.outcome(*stage).is_some() {
                "passed"
            } else if failed_stage == Some(*stage) {
                "FAILED"
            } else {
                "skipped"
            };
            lines.push(format!("   {:<12} {}", stage.name(), mark));
        }
        lines
    }

    fn verdict_lines(&self, report: &RunReport) -> Vec<String> {
        let mut lines = Vec::new();
        match &report.verdict {
            Verdict::Passed => {
                lines.push(String::new());
                lines.push(rule('='));
                match self.variant {
                    Variant::Inspect => {
                        lines.push("🎉 DEBUGGING COMPLETE!".to_string());
                        lines.push("✅ Your RAG system appears to be working correctly".to_string());
                        lines.push(
                            "✅ You should be able to ask questions about your book".to_string(),
                        );
                    }
                    Variant::Ingest => {
                        lines.push("🎉 ALL TESTS PASSED!".to_string());
                        lines.push("✅ Your RAG chatbot system is working correctly".to_string());
                        lines.push(
                            "✅ Content is processed and stored in the vector database"
                                .to_string(),
                        );
                        lines.push(
                            "✅ API is responding to queries with relevant information"
                                .to_string(),
                        );
                    }
                }
                lines.push(rule('='));
                lines.push(String::new());
                lines.push("🚀 Your RAG chatbot system is ready to use!".to_string());
            }
            Verdict::NeedsIngestion => {
                lines.push(String::new());
                lines.push(rule('='));
                let mut block = needs_ingestion_block(&self.config);
                if let Some(first) = block.first_mut() {
                    *first = format!("📚 {}", first);
                }
                lines.extend(block);
                lines.push(rule('='));
            }
            Verdict::Failed { .. } => {
                if let Some(headline) = failure_headline(&report.verdict, &self.config) {
                    lines.push(String::new());
                    lines.push(format!("❌ {}", headline));
                }
            }
        }

        if !report.verdict.is_success() {
            lines.push(String::new());
            lines.push(rule('='));
            lines.push(setup_heading(self.variant).to_string());
            lines.push(rule('='));
            lines.extend(setup_steps(self.variant, &self.config));
            lines.push(rule('='));
        }
        lines
    }
}

impl<W: Write + Send> PipelineObserver for ConsoleObserver<W> {
    fn on_stage_start(&self, stage: Stage) {
        self.emit(&[String::new(), format!("🔍 {}...", stage.title())]);
    }

    fn on_stage_passed(&self, _stage: Stage, outcome: &StageOutcome) {
        self.emit(&self.outcome_lines(outcome));
    }

    fn on_stage_failed(&self, stage: Stage, error: &CheckError) {
        self.emit(&self.failure_lines(stage, error));
    }

    fn on_finish(&self, report: &RunReport) {
        self.emit(&self.summary_lines(report));
        self.emit(&self.verdict_lines(report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragcheck_core::{
        EnvSnapshot, HttpResponse, MockTransport, Orchestrator, StaticIngestor,
    };

    fn env() -> EnvSnapshot {
        EnvSnapshot::from_pairs([
            ("COHERE_API_KEY", "k"),
            ("QDRANT_URL", "u"),
            ("QDRANT_API_KEY", "k"),
            ("TARGET_URL", "https://book.example/"),
        ])
    }

    fn base_transport() -> MockTransport {
        MockTransport::new()
            .on_get(
                "https://book.example/",
                HttpResponse::new(200, Some("application/pdf"), ""),
            )
            .on_get(
                "http://localhost:8000/health",
                HttpResponse::json(serde_json::json!({"status": "ok", "collections": []})),
            )
    }

    async fn render(variant: Variant, transport: MockTransport) -> String {
        let config = CheckConfig::default();
        let observer = ConsoleObserver::new(variant, &config, Vec::new());
        let ingestor = StaticIngestor::succeeding();
        observer.print_banner();
        Orchestrator::new(&config, &transport)
            .with_ingestor(&ingestor)
            .run(&variant.pipeline(), &env(), &observer)
            .await;
        String::from_utf8(observer.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn test_needs_ingestion_output() {
        let transport = base_transport().on_get(
            "http://localhost:8000/collections",
            HttpResponse::json(serde_json::json!({"collections": []})),
        );
        let out = render(Variant::Inspect, transport).await;

        assert!(out.contains("RAG CHATBOT SYSTEM DEBUGGING"));
        assert!(out.contains("might not be text-based"));
        assert!(out.contains("📚 CONTENT PROCESSING NEEDED"));
        assert!(out.contains("1. Run: python backend/process_book.py"));
        assert!(out.contains("COMPLETE SETUP STEPS"));
        assert!(out.contains("query        skipped"));
        assert!(!out.contains("Testing sample query"));
    }

    #[tokio::test]
    async fn test_zero_chunks_output() {
        let transport = base_transport().on_post(
            "http://localhost:8000/query",
            HttpResponse::json(
                serde_json::json!({"query": "Q", "response": "", "total_chunks": 0}),
            ),
        );
        let out = render(Variant::Ingest, transport).await;

        assert!(out.contains("RAG CHATBOT SYSTEM TEST"));
        assert!(out.contains("✅ Content processing completed successfully"));
        assert!(out.contains("no content was found in the database"));
        assert!(out.contains("hasn't been processed yet"));
        assert!(out.contains("query        FAILED"));
        assert!(out.contains("SETUP INSTRUCTIONS"));
    }

    #[tokio::test]
    async fn test_query_status_failure_prints_body() {
        let transport = base_transport()
            .on_get(
                "http://localhost:8000/collections",
                HttpResponse::json(serde_json::json!({"collections": ["book"]})),
            )
            .on_post(
                "http://localhost:8000/query",
                HttpResponse::new(500, Some("text/plain"), "embedding provider down"),
            );
        let out = render(Variant::Inspect, transport).await;

        assert!(out.contains("❌ Query failed with status 500"));
        assert!(out.contains("   Response: embedding provider down"));
        assert!(out.contains("❌ Query test failed."));
    }

    #[tokio::test]
    async fn test_success_output() {
        let transport = base_transport()
            .on_get(
                "http://localhost:8000/collections",
                HttpResponse::json(serde_json::json!({"collections": ["book"]})),
            )
            .on_post(
                "http://localhost:8000/query",
                HttpResponse::json(
                    serde_json::json!({"query": "Q", "response": "A book about Rust.", "total_chunks": 2}),
                ),
            );
        let out = render(Variant::Inspect, transport).await;

        assert!(out.contains("🎉 DEBUGGING COMPLETE!"));
        assert!(out.contains("Full response preview:"));
        assert!(out.contains("   Sources found: 2"));
        assert!(!out.contains("COMPLETE SETUP STEPS"));
    }

    #[tokio::test]
    async fn test_api_down_output_names_start_command() {
        let transport = MockTransport::new().on_get(
            "https://book.example/",
            HttpResponse::new(200, Some("text/html"), ""),
        );
        let out = render(Variant::Inspect, transport).await;

        assert!(out.contains("Make sure the API server is running with: python backend/start_api.py"));
        assert!(out.contains("❌ API connection failed. Please start the API server."));
    }
}
