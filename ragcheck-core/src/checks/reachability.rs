//! Target URL probe.
//!
//! The ingestion crawler reads the book site at `TARGET_URL`, so the site must
//! answer 200. A non-textual content type is only a warning.

use std::time::Duration;
use tracing::{info, warn};

use super::{require_ok, unreachable};
use crate::error::CheckError;
use crate::transport::HttpTransport;

/// What the probe saw at the target URL.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetProbe {
    pub url: String,
    pub content_type: Option<String>,
    /// Whether the content type looks like text or HTML.
    pub textual: bool,
}

/// A mime type is textual when it mentions `text` or `html`.
pub fn is_textual(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.contains("text") || lower.contains("html")
}

/// GET the target URL once and classify the response.
pub async fn probe_target(
    transport: &dyn HttpTransport,
    url: &str,
    timeout: Duration,
) -> Result<TargetProbe, CheckError> {
    let response = transport
        .get(url, timeout)
        .await
        .map_err(|e| unreachable(url, e))?;
    require_ok(url, &response)?;

    let textual = response.content_type.as_deref().is_some_and(is_textual);
    if textual {
        info!(url, content_type = ?response.content_type, "Target URL is accessible");
    } else {
        warn!(url, content_type = ?response.content_type, "Target URL content might not be text-based");
    }

    Ok(TargetProbe {
        url: url.to_string(),
        content_type: response.content_type,
        textual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::{HttpResponse, MockTransport};

    const URL: &str = "https://book.example/";
    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn test_is_textual() {
        assert!(is_textual("text/html; charset=utf-8"));
        assert!(is_textual("text/plain"));
        assert!(is_textual("application/xhtml+xml"));
        assert!(is_textual("TEXT/HTML"));
        assert!(!is_textual("application/pdf"));
        assert!(!is_textual("application/json"));
    }

    #[tokio::test]
    async fn test_200_html_passes() {
        let transport =
            MockTransport::new().on_get(URL, HttpResponse::new(200, Some("text/html"), "<html/>"));
        let probe = probe_target(&transport, URL, TIMEOUT).await.unwrap();
        assert!(probe.textual);
    }

    #[tokio::test]
    async fn test_200_any_content_type_passes() {
        for content_type in [Some("application/pdf"), Some("image/png"), None] {
            let transport =
                MockTransport::new().on_get(URL, HttpResponse::new(200, content_type, ""));
            let probe = probe_target(&transport, URL, TIMEOUT).await.unwrap();
            assert!(!probe.textual);
        }
    }

    #[tokio::test]
    async fn test_non_200_fails_with_status() {
        for status in [301, 403, 404, 500] {
            let transport =
                MockTransport::new().on_get(URL, HttpResponse::new(status, Some("text/html"), ""));
            let err = probe_target(&transport, URL, TIMEOUT).await.unwrap_err();
            assert!(
                matches!(err, CheckError::UnexpectedStatus { status: s, .. } if s == status),
                "status {status}"
            );
        }
    }

    #[tokio::test]
    async fn test_timeout_matches_connection_fault() {
        let timed_out = MockTransport::new()
            .fail_get(URL, TransportError::Timeout { timeout_secs: 10 });
        let refused = MockTransport::new();

        let a = probe_target(&timed_out, URL, TIMEOUT).await.unwrap_err();
        let b = probe_target(&refused, URL, TIMEOUT).await.unwrap_err();
        assert!(matches!(a, CheckError::Unreachable { .. }));
        assert_eq!(a.kind(), b.kind());
    }
}
