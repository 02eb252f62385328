//! Shared entry point for both binaries.

use tracing::warn;

use crate::console::ConsoleObserver;
use crate::logging;
use ragcheck_core::{
    load_config, CommandIngestor, EnvSnapshot, Orchestrator, ReqwestTransport, Variant,
};

/// Run one variant end to end and return the process exit code.
///
/// Logging is flushed before this returns, so the caller may exit directly.
pub async fn run_variant(variant: Variant) -> anyhow::Result<i32> {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    let _log_guard = logging::init();

    let workspace = std::env::current_dir()?;
    let config = load_config(Some(&workspace))
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    let snapshot = EnvSnapshot::capture();
    let transport = ReqwestTransport::new()?;

    let ingestor = match variant {
        Variant::Ingest => match CommandIngestor::new(&config.ingest_command) {
            Ok(ingestor) => Some(ingestor),
            Err(e) => {
                // The ingestion stage reports the missing ingestor itself.
                warn!(error = %e, "Ingestion command unusable");
                None
            }
        },
        Variant::Inspect => None,
    };

    let mut orchestrator = Orchestrator::new(&config, &transport);
    if let Some(ingestor) = &ingestor {
        orchestrator = orchestrator.with_ingestor(ingestor);
    }

    let observer = ConsoleObserver::stdout(variant, &config);
    observer.print_banner();
    let report = orchestrator
        .run(&variant.pipeline(), &snapshot, &observer)
        .await;

    Ok(report.exit_code())
}
