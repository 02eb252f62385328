//! API health check against `GET /health`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use super::{decode, require_ok, unreachable};
use crate::error::CheckError;
use crate::transport::HttpTransport;

/// Body of a successful `/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub status: String,
    pub collections: Vec<String>,
}

/// GET the health endpoint once.
pub async fn check_health(
    transport: &dyn HttpTransport,
    url: &str,
    timeout: Duration,
) -> Result<HealthSummary, CheckError> {
    let response = transport
        .get(url, timeout)
        .await
        .map_err(|e| unreachable(url, e))?;
    require_ok(url, &response)?;
    let summary: HealthSummary = decode(url, &response)?;
    info!(status = %summary.status, collections = ?summary.collections, "API server is running");
    Ok(summary)
}
