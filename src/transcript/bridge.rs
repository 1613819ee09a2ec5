//! `TranscriptBridge`: the filtering, failure-swallowing front of a
//! [`TranscriptProvider`].
//!
//! Callers cannot tell "no captions" from "fetch failed": both come back as
//! an empty sequence.  The provider's ordering is preserved and segments with
//! blank text are dropped.

use std::sync::Arc;

use crate::transcript::provider::TranscriptProvider;
use crate::transcript::segment::{RawSegment, Segment};

/// Wraps a provider so that fetching a transcript never fails.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use video_tutor::config::TranscriptConfig;
/// use video_tutor::transcript::{HttpTranscriptProvider, TranscriptBridge};
///
/// let config = TranscriptConfig::default();
/// let provider = HttpTranscriptProvider::from_config(&config);
/// let bridge = TranscriptBridge::new(Arc::new(provider), &config.language);
/// assert_eq!(bridge.default_language(), "en");
/// ```
#[derive(Clone)]
pub struct TranscriptBridge {
    provider: Arc<dyn TranscriptProvider>,
    default_language: String,
}

impl TranscriptBridge {
    pub fn new(provider: Arc<dyn TranscriptProvider>, default_language: &str) -> Self {
        Self {
            provider,
            default_language: default_language.to_string(),
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Fetch, filter and return the transcript for `video_id` in `lang`.
    ///
    /// This **never** fails; provider errors are logged and turned into an
    /// empty sequence.
    pub async fn fetch_transcript(&self, video_id: &str, lang: &str) -> Vec<Segment> {
        match self.provider.get_transcript(video_id, lang).await {
            Ok(raw) => {
                let segments = filter_segments(raw);
                log::debug!(
                    "transcript: {video_id} ({lang}) → {} segments",
                    segments.len()
                );
                segments
            }
            Err(e) => {
                log::warn!("transcript: fetch for {video_id} ({lang}) failed, returning empty: {e}");
                Vec::new()
            }
        }
    }
}

/// Drop blank segments, keeping the remaining ones in order.
pub fn filter_segments(raw: Vec<RawSegment>) -> Vec<Segment> {
    raw.into_iter().filter_map(RawSegment::into_segment).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::provider::{MockTranscriptProvider, TranscriptError};

    fn bridge(provider: MockTranscriptProvider) -> TranscriptBridge {
        TranscriptBridge::new(Arc::new(provider), "en")
    }

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[tokio::test]
    async fn drops_empty_segments() {
        let b = bridge(MockTranscriptProvider::ok(&[Some("hello"), Some(""), Some("world")]));
        let segments = b.fetch_transcript("abc123", "en").await;
        assert_eq!(texts(&segments), vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn drops_whitespace_and_missing_text_keeping_order() {
        let b = bridge(MockTranscriptProvider::ok(&[
            Some("  "),
            Some("one"),
            None,
            Some("two"),
            Some("\n\t"),
            Some("three"),
        ]));
        let segments = b.fetch_transcript("abc123", "en").await;
        assert_eq!(texts(&segments), vec!["one", "two", "three"]);
        // Timestamps travel with their segment.
        assert_eq!(segments[0].start_ms, Some(1_000));
        assert_eq!(segments[2].start_ms, Some(5_000));
    }

    #[tokio::test]
    async fn provider_failures_become_empty() {
        for error in [
            TranscriptError::Request("connection refused".into()),
            TranscriptError::Timeout,
            TranscriptError::Status(503),
            TranscriptError::Parse("bad json".into()),
            TranscriptError::Unavailable("abc123".into()),
        ] {
            let b = bridge(MockTranscriptProvider::err(error));
            assert!(b.fetch_transcript("abc123", "en").await.is_empty());
        }
    }

    #[test]
    fn filter_of_nothing_is_nothing() {
        assert!(filter_segments(Vec::new()).is_empty());
    }
}
