//! Sample query against `POST /query`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use super::{decode, require_ok, unreachable};
use crate::error::CheckError;
use crate::transport::HttpTransport;

/// Body sent to the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub top_k: u32,
}

/// Body of a successful query response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub response: String,
    pub total_chunks: u64,
}

impl QueryResult {
    /// The first `max_chars` characters of the response.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.response.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.response[..idx],
            None => &self.response,
        }
    }
}

/// POST the sample query once.
///
/// A 200 with zero supporting chunks fails with [`CheckError::NoSourceChunks`],
/// which is distinct from a transport or status failure.
pub async fn exercise_query(
    transport: &dyn HttpTransport,
    url: &str,
    request: &QueryRequest,
    timeout: Duration,
) -> Result<QueryResult, CheckError> {
    let body = serde_json::to_value(request)
        .map_err(|e| CheckError::unexpected(format!("Failed to encode query: {}", e)))?;
    let response = transport
        .post_json(url, &body, timeout)
        .await
        .map_err(|e| unreachable(url, e))?;
    require_ok(url, &response)?;
    let result: QueryResult = decode(url, &response)?;

    if result.total_chunks == 0 {
        warn!(query = %result.query, "Query returned no source chunks");
        return Err(CheckError::NoSourceChunks {
            query: result.query,
            response: result.response,
        });
    }

    info!(
        query = %result.query,
        total_chunks = result.total_chunks,
        response_chars = result.response.chars().count(),
        "Query successful"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, TransportError};
    use crate::transport::{HttpResponse, MockTransport};
    use serde_json::json;

    const URL: &str = "http://localhost:8000/query";
    const TIMEOUT: Duration = Duration::from_secs(30);

    fn request() -> QueryRequest {
        QueryRequest {
            query: "What is this book about?".into(),
            top_k: 3,
        }
    }

    #[tokio::test]
    async fn test_success_with_chunks() {
        let transport = MockTransport::new().on_post(
            URL,
            HttpResponse::json(json!({"query": "Q", "response": "A", "total_chunks": 2})),
        );
        let result = exercise_query(&transport, URL, &request(), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(result.total_chunks, 2);

        let calls = transport.calls();
        assert_eq!(
            calls[0].body,
            Some(json!({"query": "What is this book about?", "top_k": 3}))
        );
        assert_eq!(calls[0].timeout, TIMEOUT);
    }

    #[tokio::test]
    async fn test_zero_chunks_is_soft_failure() {
        let transport = MockTransport::new().on_post(
            URL,
            HttpResponse::json(json!({"query": "Q", "response": "I don't know", "total_chunks": 0})),
        );
        let err = exercise_query(&transport, URL, &request(), TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CheckError::NoSourceChunks {
                query: "Q".into(),
                response: "I don't know".into()
            }
        );
        assert_eq!(err.kind(), ErrorKind::Semantic);
    }

    #[tokio::test]
    async fn test_http_failure_differs_from_zero_chunks() {
        let status = MockTransport::new().on_post(URL, HttpResponse::new(500, None, "boom"));
        let timeout =
            MockTransport::new().fail_post(URL, TransportError::Timeout { timeout_secs: 30 });

        let a = exercise_query(&status, URL, &request(), TIMEOUT)
            .await
            .unwrap_err();
        let b = exercise_query(&timeout, URL, &request(), TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(a.kind(), ErrorKind::Protocol);
        assert_eq!(b.kind(), ErrorKind::Connectivity);
    }

    #[test]
    fn test_preview_is_char_safe() {
        let result = QueryResult {
            query: "q".into(),
            response: "héllo wörld".into(),
            total_chunks: 1,
        };
        assert_eq!(result.preview(4), "héll");
        assert_eq!(result.preview(200), "héllo wörld");
    }
}
