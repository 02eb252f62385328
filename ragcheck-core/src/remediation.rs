//! Remediation text shown after a run that did not pass.

use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::pipeline::Verdict;
use crate::stage::{Stage, Variant};

/// Follow-up lines printed directly under a failed stage.
pub fn stage_hints(stage: Stage, error: &CheckError, config: &CheckConfig) -> Vec<String> {
    match (stage, error) {
        (_, CheckError::InvalidConfig { .. }) => {
            vec!["Check .ragcheck/config.toml and RAGCHECK_* variables".to_string()]
        }
        (Stage::Environment, _) => {
            vec!["Please set these variables in your .env file or environment".to_string()]
        }
        (Stage::TargetUrl, _) => {
            vec!["Make sure your book website is publicly accessible".to_string()]
        }
        (Stage::ApiHealth, CheckError::Unreachable { .. }) => vec![
            format!("Could not connect to API server at {}", config.api_base_url),
            format!(
                "Make sure the API server is running with: {}",
                config.api_start_command
            ),
        ],
        (Stage::Ingestion, _) => vec![
            "Make sure your TARGET_URL is accessible and contains text content".to_string(),
        ],
        (Stage::Query, CheckError::NoSourceChunks { .. }) => {
            vec!["This means the book content hasn't been processed yet".to_string()]
        }
        _ => Vec::new(),
    }
}

/// One-line summary of why the run stopped.
pub fn failure_headline(verdict: &Verdict, config: &CheckConfig) -> Option<String> {
    match verdict {
        Verdict::Passed | Verdict::NeedsIngestion => None,
        Verdict::Failed { stage, .. } => Some(match stage {
            Stage::Environment => {
                "Environment check failed. Please set up your environment variables.".to_string()
            }
            Stage::TargetUrl => {
                "Target URL check failed. Make sure your book website is accessible.".to_string()
            }
            Stage::ApiHealth => format!(
                "API connection failed. Please start the API server.\n   Start with: {}",
                config.api_start_command
            ),
            Stage::Collections => "Collections check failed.".to_string(),
            Stage::Ingestion => "Content processing test failed.".to_string(),
            Stage::Query => {
                "Query test failed. There might be an issue with content retrieval.".to_string()
            }
        }),
    }
}

/// Block shown when the API is up but nothing has been ingested.
pub fn needs_ingestion_block(config: &CheckConfig) -> Vec<String> {
    vec![
        "CONTENT PROCESSING NEEDED".to_string(),
        "Your API is running but no content has been processed yet.".to_string(),
        String::new(),
        "To fix this:".to_string(),
        format!("1. Run: {}", config.ingest_command_line()),
        "   This will crawl your book website and store content in the vector database"
            .to_string(),
        "2. After processing, test again with this tool".to_string(),
    ]
}

/// The fixed setup checklist printed after any unsuccessful run.
pub fn setup_steps(variant: Variant, config: &CheckConfig) -> Vec<String> {
    let mut lines = vec![
        "1. Install dependencies:".to_string(),
        "   cd backend && pip install -r requirements.txt".to_string(),
        String::new(),
        "2. Set up environment variables in a .env file:".to_string(),
        "   COHERE_API_KEY=your_cohere_api_key".to_string(),
        "   QDRANT_URL=your_qdrant_url".to_string(),
        "   QDRANT_API_KEY=your_qdrant_api_key".to_string(),
        "   TARGET_URL=https://your-book-website.com".to_string(),
        String::new(),
    ];
    match variant {
        Variant::Inspect => {
            lines.push("3. Process your book content (this is the crucial step!):".to_string());
            lines.push(format!("   {}", config.ingest_command_line()));
            lines.push(
                "   This will crawl your book website and store content in the vector database"
                    .to_string(),
            );
        }
        Variant::Ingest => {
            lines.push("3. Process your book content:".to_string());
            lines.push(format!("   {}", config.ingest_command_line()));
        }
    }
    lines.push(String::new());
    lines.push("4. Start the API server:".to_string());
    lines.push(format!("   {}", config.api_start_command));
    lines.push(String::new());
    match variant {
        Variant::Inspect => {
            lines.push("5. Test the system:".to_string());
            lines.push("   rag-debug".to_string());
        }
        Variant::Ingest => {
            lines.push("5. Add the chatbot to your website:".to_string());
            lines.push("   Include chatbot_widget.js in your HTML".to_string());
        }
    }
    lines
}

/// Heading for the setup checklist.
pub fn setup_heading(variant: Variant) -> &'static str {
    match variant {
        Variant::Inspect => "COMPLETE SETUP STEPS",
        Variant::Ingest => "SETUP INSTRUCTIONS",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_unreachable_hint_names_start_command() {
        let config = CheckConfig::default();
        let error = CheckError::Unreachable {
            url: "http://localhost:8000/health".into(),
            message: "refused".into(),
        };
        let hints = stage_hints(Stage::ApiHealth, &error, &config);
        assert_eq!(hints.len(), 2);
        assert!(hints[1].ends_with("python backend/start_api.py"));
    }

    #[test]
    fn test_api_status_error_has_no_connection_hint() {
        let config = CheckConfig::default();
        let error = CheckError::UnexpectedStatus {
            url: "http://localhost:8000/health".into(),
            status: 500,
            body: String::new(),
        };
        assert!(stage_hints(Stage::ApiHealth, &error, &config).is_empty());
    }

    #[test]
    fn test_headline_only_for_failures() {
        let config = CheckConfig::default();
        assert!(failure_headline(&Verdict::Passed, &config).is_none());
        assert!(failure_headline(&Verdict::NeedsIngestion, &config).is_none());
        let verdict = Verdict::Failed {
            stage: Stage::Environment,
            error: CheckError::MissingSettings {
                missing: vec!["TARGET_URL".into()],
            },
        };
        assert!(failure_headline(&verdict, &config)
            .unwrap()
            .starts_with("Environment check failed"));
    }

    #[test]
    fn test_setup_steps_follow_config() {
        let config = CheckConfig {
            ingest_command: vec!["make".into(), "ingest".into()],
            api_start_command: "make serve".into(),
            ..Default::default()
        };
        for variant in [Variant::Inspect, Variant::Ingest] {
            let steps = setup_steps(variant, &config);
            assert!(steps.contains(&"   make ingest".to_string()));
            assert!(steps.contains(&"   make serve".to_string()));
        }
        assert!(needs_ingestion_block(&config).contains(&"1. Run: make ingest".to_string()));
    }
}
