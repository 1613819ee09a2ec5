//! Collapsible transcript panel.
//!
//! Fetches on first expansion only, independently of the conversation
//! controller's own priming fetch.  A successful result (even an empty one)
//! is cached for the panel's lifetime; a failure is not, so the next
//! expansion retries.

use std::sync::Arc;

use crate::transcript::{Segment, TranscriptSource};

/// Panel error text after a failed fetch.
pub const LOAD_FAILED: &str = "Failed to load transcript. Please try again.";

/// Panel text when the video has no usable segments.
pub const EMPTY_TRANSCRIPT: &str = "No transcription available for this video.";

/// What the panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView<'a> {
    Collapsed,
    Loading,
    Error(&'a str),
    Empty,
    Segments(&'a [Segment]),
}

pub struct TranscriptPanel {
    video_id: String,
    source: Arc<dyn TranscriptSource>,
    expanded: bool,
    loading: bool,
    error: Option<String>,
    cached: Option<Vec<Segment>>,
}

impl TranscriptPanel {
    pub fn new(video_id: impl Into<String>, source: Arc<dyn TranscriptSource>) -> Self {
        Self {
            video_id: video_id.into(),
            source,
            expanded: false,
            loading: false,
            error: None,
            cached: None,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Flip expansion; fetch when expanding without a cached result.
    pub async fn toggle(&mut self) {
        self.expanded = !self.expanded;
        if self.expanded && self.cached.is_none() {
            self.load().await;
        }
    }

    async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        match self.source.fetch(&self.video_id).await {
            Ok(segments) => {
                log::debug!(
                    "transcript panel: {} segments for {}",
                    segments.len(),
                    self.video_id
                );
                self.cached = Some(segments);
            }
            Err(e) => {
                log::warn!("transcript panel: fetch failed for {}: {e}", self.video_id);
                self.error = Some(LOAD_FAILED.to_string());
            }
        }

        self.loading = false;
    }

    pub fn view(&self) -> PanelView<'_> {
        if !self.expanded {
            return PanelView::Collapsed;
        }
        if self.loading {
            return PanelView::Loading;
        }
        if let Some(error) = &self.error {
            return PanelView::Error(error);
        }
        match &self.cached {
            Some(segments) if segments.is_empty() => PanelView::Empty,
            Some(segments) => PanelView::Segments(segments),
            None => PanelView::Loading,
        }
    }
}
