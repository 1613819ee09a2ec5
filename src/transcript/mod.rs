//! Transcript retrieval.
//!
//! This module provides:
//! * [`TranscriptProvider`]: async trait for the external caption service.
//! * [`HttpTranscriptProvider`]: HTTP implementation of the provider.
//! * [`TranscriptBridge`]: filters blank segments and swallows failures.
//! * [`TranscriptSource`]: what session components fetch from; implemented
//!   by the bridge and by [`TranscriptClient`].
//! * [`Segment`] / [`TranscriptItem`]: transcript data and its wire shape.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use video_tutor::config::AppConfig;
//! use video_tutor::transcript::{join_text, HttpTranscriptProvider, TranscriptBridge};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let provider = HttpTranscriptProvider::from_config(&config.transcript);
//!     let bridge = TranscriptBridge::new(Arc::new(provider), &config.transcript.language);
//!
//!     let segments = bridge.fetch_transcript("e8krKpuaby8", "en").await;
//!     println!("{}", join_text(&segments));
//! }
//! ```

pub mod bridge;
pub mod provider;
pub mod segment;
pub mod source;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use bridge::{filter_segments, TranscriptBridge};
pub use provider::{HttpTranscriptProvider, TranscriptError, TranscriptProvider};
pub use segment::{join_text, RawSegment, Segment, TranscriptItem};
pub use source::{TranscriptClient, TranscriptSource};

#[cfg(test)]
pub use provider::MockTranscriptProvider;
#[cfg(test)]
pub use source::MockTranscriptSource;
