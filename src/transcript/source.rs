//! Where session components get their transcript from.
//!
//! The conversation controller and the transcript panel each hold an
//! `Arc<dyn TranscriptSource>` and fetch independently.  Two implementations
//! exist:
//!
//! * [`TranscriptBridge`]: in-process; never fails.
//! * [`TranscriptClient`]: HTTP client for `GET /api/transcript`; a non-2xx
//!   answer is a failure.

use async_trait::async_trait;

use crate::transcript::bridge::TranscriptBridge;
use crate::transcript::provider::TranscriptError;
use crate::transcript::segment::{Segment, TranscriptItem};

/// Async source of a filtered transcript for one video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Vec<Segment>, TranscriptError>;
}

#[async_trait]
impl TranscriptSource for TranscriptBridge {
    async fn fetch(&self, video_id: &str) -> Result<Vec<Segment>, TranscriptError> {
        Ok(self.fetch_transcript(video_id, self.default_language()).await)
    }
}

// ---------------------------------------------------------------------------
// TranscriptClient
// ---------------------------------------------------------------------------

/// Fetches from a running server's transcript endpoint.
pub struct TranscriptClient {
    client: reqwest::Client,
    base_url: String,
}

impl TranscriptClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/transcript", self.base_url)
    }
}

#[async_trait]
impl TranscriptSource for TranscriptClient {
    async fn fetch(&self, video_id: &str) -> Result<Vec<Segment>, TranscriptError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("videoId", video_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptError::Status(status.as_u16()));
        }

        let items: Vec<TranscriptItem> = response
            .json()
            .await
            .map_err(|e| TranscriptError::Parse(e.to_string()))?;

        Ok(items.into_iter().map(Segment::from).collect())
    }
}

// ---------------------------------------------------------------------------
// MockTranscriptSource  (test-only)
// ---------------------------------------------------------------------------

/// A test double that answers with a fixed result and counts fetches.
#[cfg(test)]
pub struct MockTranscriptSource {
    response: std::sync::Mutex<Result<Vec<Segment>, TranscriptError>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockTranscriptSource {
    pub fn ok(texts: &[&str]) -> Self {
        Self {
            response: std::sync::Mutex::new(Ok(texts.iter().map(|t| Segment::new(*t)).collect())),
            calls: Default::default(),
        }
    }

    pub fn err(error: TranscriptError) -> Self {
        Self {
            response: std::sync::Mutex::new(Err(error)),
            calls: Default::default(),
        }
    }

    /// Replace the answer given by later fetches.
    pub fn set_response(&self, response: Result<Vec<Segment>, TranscriptError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl TranscriptSource for MockTranscriptSource {
    async fn fetch(&self, _video_id: &str) -> Result<Vec<Segment>, TranscriptError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.response.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::provider::MockTranscriptProvider;
    use std::sync::Arc;

    #[tokio::test]
    async fn bridge_source_never_fails() {
        let bridge = TranscriptBridge::new(
            Arc::new(MockTranscriptProvider::err(TranscriptError::Timeout)),
            "en",
        );
        let source: &dyn TranscriptSource = &bridge;
        assert_eq!(source.fetch("abc").await.unwrap(), Vec::<Segment>::new());
    }

    #[tokio::test]
    async fn bridge_source_filters() {
        let bridge = TranscriptBridge::new(
            Arc::new(MockTranscriptProvider::ok(&[Some("a"), Some(" "), Some("b")])),
            "en",
        );
        let segments = TranscriptSource::fetch(&bridge, "abc").await.unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn client_endpoint_is_under_api() {
        let client = TranscriptClient::new("http://127.0.0.1:3000/");
        assert_eq!(client.endpoint(), "http://127.0.0.1:3000/api/transcript");
    }

    // ---- TranscriptClient against the real router --------------------------

    /// Serve the app on an ephemeral port; returns its origin.
    async fn serve(provider: MockTranscriptProvider) -> String {
        use crate::config::AppConfig;
        use crate::web::{build_router, AppState};

        let bridge = TranscriptBridge::new(Arc::new(provider), "en");
        let app = build_router(AppState::new(AppConfig::default(), bridge));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn client_reads_filtered_segments() {
        let origin = serve(MockTranscriptProvider::ok(&[Some("hello"), Some(""), Some("world")])).await;
        let client = TranscriptClient::new(origin);

        let segments = client.fetch("XYZ").await.unwrap();
        assert_eq!(segments, vec![Segment::new("hello"), Segment::new("world")]);
    }

    #[tokio::test]
    async fn client_encodes_video_id() {
        let origin = serve(MockTranscriptProvider::ok(&[Some("hi")])).await;
        let client = TranscriptClient::new(origin);

        assert_eq!(client.fetch("a&b c").await.unwrap(), vec![Segment::new("hi")]);
    }

    #[tokio::test]
    async fn client_reports_non_success_status() {
        let origin = serve(MockTranscriptProvider::ok(&[Some("hello")])).await;
        let client = TranscriptClient::new(origin);
        assert!(matches!(client.fetch("").await, Err(TranscriptError::Status(400))));

        let origin = serve(MockTranscriptProvider::panicking()).await;
        let client = TranscriptClient::new(origin);
        assert!(matches!(client.fetch("XYZ").await, Err(TranscriptError::Status(500))));
    }

    #[tokio::test]
    async fn client_reports_unreachable_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TranscriptClient::new(format!("http://{addr}"));
        assert!(matches!(client.fetch("XYZ").await, Err(TranscriptError::Request(_))));
    }
}
