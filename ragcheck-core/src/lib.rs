//! # ragcheck core
//!
//! Outside-in diagnostics for a retrieval-augmented-generation chatbot
//! service. A run validates the required settings, probes the book site the
//! crawler reads, checks the API's health and collections, optionally runs
//! content ingestion, and finally sends a sample query.
//!
//! ## Architecture
//!
//! ```text
//! EnvSnapshot -> Orchestrator -> checks::* -> HttpTransport (reqwest / mock)
//!                     |                    \-> Ingestor (command / static)
//!                     +-> PipelineObserver (console / recording)
//! ```

pub mod checks;
pub mod config;
pub mod error;
pub mod ingest;
pub mod observer;
pub mod pipeline;
pub mod remediation;
pub mod settings;
pub mod stage;
pub mod transport;

pub use checks::{CollectionListing, HealthSummary, QueryResult, TargetProbe};
pub use config::{load_config, CheckConfig};
pub use error::{CheckError, ErrorKind, PipelineError, TransportError};
pub use ingest::{CommandIngestor, Ingestor, StaticIngestor};
pub use observer::{NoOpObserver, PipelineObserver, RecordingObserver};
pub use pipeline::{Orchestrator, RunReport, StageOutcome, Verdict};
pub use settings::{EnvSnapshot, Settings, REQUIRED_SETTINGS};
pub use stage::{Pipeline, Stage, Variant};
pub use transport::{HttpResponse, HttpTransport, MockTransport, ReqwestTransport};
