//! Transcript data types.

use serde::{Deserialize, Serialize};

/// One timed unit of caption text, in playback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ms: Option<u64>,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_ms: None,
            end_ms: None,
        }
    }

    pub fn timed(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            text: text.into(),
            start_ms: Some(start_ms),
            end_ms: Some(end_ms),
        }
    }
}

/// A segment as delivered by the external provider, before filtering.
///
/// Timestamps are accepted as numbers or numeric strings since caption
/// services disagree on the encoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_ms")]
    pub start_ms: Option<u64>,
    #[serde(default, deserialize_with = "lenient_ms")]
    pub end_ms: Option<u64>,
}

impl RawSegment {
    /// Convert into a [`Segment`], dropping blank text.
    pub fn into_segment(self) -> Option<Segment> {
        let text = self.text?;
        if text.trim().is_empty() {
            return None;
        }
        Some(Segment {
            text,
            start_ms: self.start_ms,
            end_ms: self.end_ms,
        })
    }
}

fn lenient_ms<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// The public wire shape of the transcript endpoint: text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptItem {
    pub text: String,
}

impl From<Segment> for TranscriptItem {
    fn from(segment: Segment) -> Self {
        Self { text: segment.text }
    }
}

impl From<TranscriptItem> for Segment {
    fn from(item: TranscriptItem) -> Self {
        Segment::new(item.text)
    }
}

/// Concatenate segment texts with single spaces.  This is the grounding
/// text handed to the voice session.
pub fn join_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
