//! Content ingestion trigger.
//!
//! The ingestion pipeline crawls the book site and fills the vector database.
//! It lives outside this tool, so it is reached through the [`Ingestor`] seam:
//! [`CommandIngestor`] runs the configured command as a child process.

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use crate::error::CheckError;
use crate::settings::{Settings, COHERE_API_KEY, QDRANT_API_KEY, QDRANT_URL, TARGET_URL};

/// Runs the content ingestion pipeline once.
#[async_trait]
pub trait Ingestor: Send + Sync {
    /// Human-readable description of what will run.
    fn describe(&self) -> String;

    /// Run ingestion to completion. Any failure is reported as an error.
    async fn ingest(&self, settings: &Settings) -> Result<(), CheckError>;
}

/// Ingestor that spawns an external command and waits for it.
///
/// The child inherits stdout/stderr so crawl progress stays visible, and
/// receives the validated settings in its environment.
#[derive(Debug, Clone)]
pub struct CommandIngestor {
    program: String,
    args: Vec<String>,
}

impl CommandIngestor {
    /// Build from a command line split into program and arguments.
    pub fn new(command: &[String]) -> Result<Self, CheckError> {
        let (program, args) = command.split_first().ok_or_else(|| CheckError::InvalidConfig {
            message: "ingest_command is empty".into(),
        })?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl Ingestor for CommandIngestor {
    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn ingest(&self, settings: &Settings) -> Result<(), CheckError> {
        debug!(command = %self.describe(), "Starting content ingestion");

        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .env(COHERE_API_KEY, &settings.cohere_api_key)
            .env(QDRANT_URL, &settings.qdrant_url)
            .env(QDRANT_API_KEY, &settings.qdrant_api_key)
            .env(TARGET_URL, &settings.target_url)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                CheckError::ingestion(format!("Failed to run {}: {}", self.describe(), e))
            })?;

        if status.success() {
            info!(command = %self.describe(), "Content ingestion completed");
            Ok(())
        } else {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            warn!(command = %self.describe(), exit = %code, "Content ingestion failed");
            Err(CheckError::ingestion(format!(
                "{} exited with status {}",
                self.describe(),
                code
            )))
        }
    }
}

/// Ingestor with a fixed outcome that counts its invocations (for testing).
#[derive(Debug, Default)]
pub struct StaticIngestor {
    failure: Option<String>,
    runs: AtomicUsize,
}

impl StaticIngestor {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ingestor for StaticIngestor {
    fn describe(&self) -> String {
        "static ingestor".to_string()
    }

    async fn ingest(&self, _settings: &Settings) -> Result<(), CheckError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(CheckError::ingestion(message.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EnvSnapshot;

    fn settings() -> Settings {
        Settings::from_snapshot(&EnvSnapshot::from_pairs([
            (COHERE_API_KEY, "co"),
            (QDRANT_URL, "http://qdrant"),
            (QDRANT_API_KEY, "qd"),
            (TARGET_URL, "http://book"),
        ]))
        .unwrap()
    }

    fn command(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = CommandIngestor::new(&[]).unwrap_err();
        assert!(matches!(err, CheckError::InvalidConfig { .. }));
    }

    #[test]
    fn test_describe_joins_command() {
        let ingestor =
            CommandIngestor::new(&command(&["python", "backend/process_book.py"])).unwrap();
        assert_eq!(ingestor.describe(), "python backend/process_book.py");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_success() {
        let ingestor = CommandIngestor::new(&command(&["sh", "-c", "exit 0"])).unwrap();
        ingestor.ingest(&settings()).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_sees_settings() {
        let ingestor = CommandIngestor::new(&command(&[
            "sh",
            "-c",
            r#"test "$TARGET_URL" = "http://book""#,
        ]))
        .unwrap();
        ingestor.ingest(&settings()).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_nonzero_exit_fails() {
        let ingestor = CommandIngestor::new(&command(&["sh", "-c", "exit 3"])).unwrap();
        let err = ingestor.ingest(&settings()).await.unwrap_err();
        assert_eq!(
            err,
            CheckError::ingestion("sh -c exit 3 exited with status 3")
        );
    }

    #[tokio::test]
    async fn test_missing_program_fails() {
        let ingestor =
            CommandIngestor::new(&command(&["ragcheck-no-such-program-xyz"])).unwrap();
        let err = ingestor.ingest(&settings()).await.unwrap_err();
        assert!(matches!(err, CheckError::Ingestion { .. }));
    }

    #[tokio::test]
    async fn test_static_ingestor_counts_runs() {
        let ok = StaticIngestor::succeeding();
        ok.ingest(&settings()).await.unwrap();
        assert_eq!(ok.runs(), 1);

        let bad = StaticIngestor::failing("crawl failed");
        assert!(bad.ingest(&settings()).await.is_err());
        assert_eq!(bad.runs(), 1);
    }
}
