//! The individual checks run by the pipeline.
//!
//! Each check makes at most one request and returns a typed outcome. No check
//! retries, panics or prints; reporting is left to the pipeline observer.

pub mod collections;
pub mod environment;
pub mod health;
pub mod query;
pub mod reachability;

use serde::de::DeserializeOwned;

use crate::error::{CheckError, TransportError};
use crate::transport::HttpResponse;

pub use collections::{inspect_collections, CollectionListing};
pub use environment::validate_environment;
pub use health::{check_health, HealthSummary};
pub use query::{exercise_query, QueryRequest, QueryResult};
pub use reachability::{probe_target, TargetProbe};

/// A timeout and a refused connection are the same failure to the caller.
pub(crate) fn unreachable(url: &str, err: TransportError) -> CheckError {
    match err {
        TransportError::Connect { message } | TransportError::Request { message } => {
            CheckError::Unreachable {
                url: url.to_string(),
                message,
            }
        }
        TransportError::Timeout { timeout_secs } => CheckError::Unreachable {
            url: url.to_string(),
            message: format!("request timed out after {}s", timeout_secs),
        },
    }
}

/// Require a 200 response.
pub(crate) fn require_ok(url: &str, response: &HttpResponse) -> Result<(), CheckError> {
    if response.is_ok() {
        Ok(())
    } else {
        Err(CheckError::UnexpectedStatus {
            url: url.to_string(),
            status: response.status,
            body: response.body.clone(),
        })
    }
}

/// Decode a JSON body, reporting malformed payloads as unexpected errors.
pub(crate) fn decode<T: DeserializeOwned>(
    url: &str,
    response: &HttpResponse,
) -> Result<T, CheckError> {
    serde_json::from_str(&response.body).map_err(|e| {
        CheckError::unexpected(format!("Malformed response from {}: {}", url, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_reads_as_unreachable() {
        let err = unreachable(
            "http://localhost:8000/health",
            TransportError::Timeout { timeout_secs: 10 },
        );
        assert_eq!(
            err,
            CheckError::Unreachable {
                url: "http://localhost:8000/health".into(),
                message: "request timed out after 10s".into(),
            }
        );
    }

    #[test]
    fn test_require_ok_keeps_body() {
        let resp = HttpResponse::new(503, Some("text/plain"), "warming up");
        let err = require_ok("http://x/query", &resp).unwrap_err();
        assert_eq!(
            err,
            CheckError::UnexpectedStatus {
                url: "http://x/query".into(),
                status: 503,
                body: "warming up".into(),
            }
        );
    }

    #[test]
    fn test_decode_malformed_is_unexpected() {
        let resp = HttpResponse::new(200, Some("application/json"), "<html>");
        let err = decode::<HealthSummary>("http://x/health", &resp).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Unexpected);
    }
}
