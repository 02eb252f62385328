//! Configuration for ragcheck.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment. Configuration is loaded from
//! `~/.config/ragcheck/config.toml` and/or `.ragcheck/config.toml` in the
//! working directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::CheckError;

/// How the checks reach the RAG service and what they ask it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Base URL of the RAG API server.
    pub api_base_url: String,
    /// Timeout for the health and collections requests, in seconds.
    pub request_timeout_secs: u64,
    /// Timeout for the target URL probe, in seconds.
    pub target_timeout_secs: u64,
    /// Timeout for the sample query, in seconds. Retrieval plus generation is slow.
    pub query_timeout_secs: u64,
    /// Question sent to the query endpoint.
    pub sample_query: String,
    /// Number of chunks requested from the query endpoint.
    pub top_k: u32,
    /// Command shown to the user for starting the API server.
    pub api_start_command: String,
    /// Command that runs the content ingestion pipeline.
    pub ingest_command: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 10,
            target_timeout_secs: 10,
            query_timeout_secs: 30,
            sample_query: "What is this book about?".to_string(),
            top_k: 3,
            api_start_command: "python backend/start_api.py".to_string(),
            ingest_command: vec!["python".to_string(), "backend/process_book.py".to_string()],
        }
    }
}

impl CheckConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn target_timeout(&self) -> Duration {
        Duration::from_secs(self.target_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// The ingestion command as a single display string.
    pub fn ingest_command_line(&self) -> String {
        self.ingest_command.join(" ")
    }

    /// Resolve an API path (e.g. `health`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<String, CheckError> {
        let mut base = Url::parse(&self.api_base_url).map_err(|e| CheckError::InvalidConfig {
            message: format!("api_base_url '{}' is not a valid URL: {}", self.api_base_url, e),
        })?;
        // Keep any path prefix on the base URL when joining.
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .map(|u| u.to_string())
            .map_err(|e| CheckError::InvalidConfig {
                message: format!("cannot join '{}' onto '{}': {}", path, base, e),
            })
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `RAGCHECK_`)
/// 2. Workspace-local config (`.ragcheck/config.toml`)
/// 3. User config (`~/.config/ragcheck/config.toml`)
/// 4. Built-in defaults
pub fn load_config(workspace: Option<&Path>) -> Result<CheckConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(CheckConfig::default()));

    if let Some(config_dir) = directories::ProjectDirs::from("dev", "ragcheck", "ragcheck") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".ragcheck").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // RAGCHECK_API_BASE_URL, RAGCHECK_QUERY_TIMEOUT_SECS, etc.
    figment = figment.merge(Env::prefixed("RAGCHECK_").ignore(&["LOG"]));

    figment.extract().map_err(Box::new)
}
