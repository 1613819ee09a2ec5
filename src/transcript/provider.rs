//! Core `TranscriptProvider` trait and `HttpTranscriptProvider`.
//!
//! The provider is the opaque external capability that turns a video id and
//! a language into raw caption segments.  `HttpTranscriptProvider` talks to a
//! transcript-extraction service over HTTP; all connection details come from
//! [`TranscriptConfig`].

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranscriptConfig;
use crate::error::ErrorKind;
use crate::transcript::segment::RawSegment;

// ---------------------------------------------------------------------------
// TranscriptError
// ---------------------------------------------------------------------------

/// Errors that can occur while fetching a transcript.
#[derive(Debug, Clone, Error)]
pub enum TranscriptError {
    /// HTTP transport or connection error.
    #[error("transcript request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("transcript request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("transcript service returned HTTP {0}")]
    Status(u16),

    /// The response body could not be parsed.
    #[error("failed to parse transcript response: {0}")]
    Parse(String),

    /// The video has no captions in the requested language.
    #[error("no captions available for video {0}")]
    Unavailable(String),
}

impl TranscriptError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::TransientProvider
    }
}

impl From<reqwest::Error> for TranscriptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscriptError::Timeout
        } else if let Some(status) = e.status() {
            TranscriptError::Status(status.as_u16())
        } else {
            TranscriptError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TranscriptProvider trait
// ---------------------------------------------------------------------------

/// External transcript-extraction capability.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn TranscriptProvider>`).  Segments are returned
/// in playback order and unfiltered.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn get_transcript(
        &self,
        video_id: &str,
        lang: &str,
    ) -> Result<Vec<RawSegment>, TranscriptError>;
}

// ---------------------------------------------------------------------------
// HttpTranscriptProvider
// ---------------------------------------------------------------------------

/// Body shapes accepted from the transcript service: a bare array, or an
/// object wrapping the array under `segments`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ProviderBody {
    Bare(Vec<RawSegment>),
    Wrapped { segments: Option<Vec<RawSegment>> },
}

/// Calls `GET {provider_url}/transcript?videoId=…&lang=…`.
pub struct HttpTranscriptProvider {
    client: reqwest::Client,
    config: TranscriptConfig,
}

impl HttpTranscriptProvider {
    /// Build a provider from application config.
    ///
    /// A timeout is set only when `config.timeout_secs` is `Some`.  A default
    /// client is used as a last resort if the builder fails.
    pub fn from_config(config: &TranscriptConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Full URL of the service's transcript route.
    pub fn endpoint(&self) -> String {
        format!("{}/transcript", self.config.provider_url.trim_end_matches('/'))
    }

    /// Parse a service response body into raw segments.
    pub fn parse_body(video_id: &str, body: &str) -> Result<Vec<RawSegment>, TranscriptError> {
        let parsed: ProviderBody =
            serde_json::from_str(body).map_err(|e| TranscriptError::Parse(e.to_string()))?;
        match parsed {
            ProviderBody::Bare(segments) => Ok(segments),
            ProviderBody::Wrapped { segments: Some(segments) } => Ok(segments),
            ProviderBody::Wrapped { segments: None } => {
                Err(TranscriptError::Unavailable(video_id.to_string()))
            }
        }
    }
}

#[async_trait]
impl TranscriptProvider for HttpTranscriptProvider {
    async fn get_transcript(
        &self,
        video_id: &str,
        lang: &str,
    ) -> Result<Vec<RawSegment>, TranscriptError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("videoId", video_id), ("lang", lang)])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Self::parse_body(video_id, &body)
    }
}

// ---------------------------------------------------------------------------
// MockTranscriptProvider  (test-only)
// ---------------------------------------------------------------------------

/// A test double returning a pre-configured response and counting calls.
#[cfg(test)]
pub struct MockTranscriptProvider {
    response: Result<Vec<RawSegment>, TranscriptError>,
    calls: std::sync::atomic::AtomicUsize,
    langs: std::sync::Mutex<Vec<String>>,
    panics: bool,
}

#[cfg(test)]
impl MockTranscriptProvider {
    /// Always returns segments with the given texts (`None` for a missing
    /// text field).
    pub fn ok(texts: &[Option<&str>]) -> Self {
        let segments = texts
            .iter()
            .enumerate()
            .map(|(i, t)| RawSegment {
                text: t.map(str::to_string),
                start_ms: Some(i as u64 * 1_000),
                end_ms: Some(i as u64 * 1_000 + 900),
            })
            .collect();
        Self {
            response: Ok(segments),
            calls: Default::default(),
            langs: Default::default(),
            panics: false,
        }
    }

    /// Always returns `Err(error)`.
    pub fn err(error: TranscriptError) -> Self {
        Self {
            response: Err(error),
            calls: Default::default(),
            langs: Default::default(),
            panics: false,
        }
    }

    /// Panics on every call, standing in for a provider that aborts.
    pub fn panicking() -> Self {
        Self {
            response: Ok(Vec::new()),
            calls: Default::default(),
            langs: Default::default(),
            panics: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Language requested by the most recent call.
    pub fn last_lang(&self) -> Option<String> {
        self.langs.lock().unwrap().last().cloned()
    }
}

#[cfg(test)]
#[async_trait]
impl TranscriptProvider for MockTranscriptProvider {
    async fn get_transcript(
        &self,
        _video_id: &str,
        lang: &str,
    ) -> Result<Vec<RawSegment>, TranscriptError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.langs.lock().unwrap().push(lang.to_string());
        if self.panics {
            panic!("transcript provider aborted");
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
