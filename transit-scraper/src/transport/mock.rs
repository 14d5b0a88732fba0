//! Mock transport for testing without network access.
//!
//! Serves canned bodies keyed by URL prefix and records every URL it was
//! asked for, so tests can assert on the exact query string.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{NetworkError, Transport};
use crate::text::Encoding;

/// Mock transport that serves canned payloads.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// (URL prefix, body), checked in insertion order.
    routes: Vec<(String, String)>,
    /// URLs requested so far.
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    /// Create an empty mock; every fetch fails with 404 until routes are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for any URL starting with `prefix`.
    pub fn with_route(mut self, prefix: impl Into<String>, body: impl Into<String>) -> Self {
        self.routes.push((prefix.into(), body.into()));
        self
    }

    /// URLs requested so far, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }

    /// The most recent URL requested.
    pub async fn last_request(&self) -> Option<String> {
        self.requests.lock().await.last().cloned()
    }
}

impl Transport for MockTransport {
    async fn fetch_text(&self, url: &str, _encoding: Encoding) -> Result<String, NetworkError> {
        self.requests.lock().await.push(url.to_string());

        self.routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| NetworkError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_first_matching_prefix() {
        let mock = MockTransport::new()
            .with_route("http://a/x", "first")
            .with_route("http://a/", "second");

        let body = mock.fetch_text("http://a/x?y=1", Encoding::Utf8).await.unwrap();
        assert_eq!(body, "first");

        let body = mock.fetch_text("http://a/z", Encoding::Utf8).await.unwrap();
        assert_eq!(body, "second");
    }

    #[tokio::test]
    async fn records_requests() {
        let mock = MockTransport::new().with_route("http://a/", "ok");
        mock.fetch_text("http://a/1", Encoding::Latin1).await.unwrap();
        mock.fetch_text("http://a/2", Encoding::Latin1).await.unwrap();

        assert_eq!(mock.requests().await, vec!["http://a/1", "http://a/2"]);
        assert_eq!(mock.last_request().await.as_deref(), Some("http://a/2"));
    }

    #[tokio::test]
    async fn unknown_url_returns_error() {
        let mock = MockTransport::new();
        let result = mock.fetch_text("http://nowhere/", Encoding::Utf8).await;
        assert!(matches!(result, Err(NetworkError::Status { status: 404, .. })));
    }
}
