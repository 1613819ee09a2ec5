//! Session identity: which video, and who is watching.
//!
//! The identity lives only in the navigation route
//! (`/video/{id}?name={encoded}`); nothing is persisted.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::error::ErrorKind;

/// Route prefix of the session page.
pub const VIDEO_ROUTE_PREFIX: &str = "/video/";

/// Query parameter carrying the display name.
pub const NAME_PARAM: &str = "name";

/// Errors from resolving a pasted link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Invalid YouTube URL")]
    InvalidLink,
}

impl LinkError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::UserInput
    }
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:https?://)?(?:www\.)?(?:youtube\.com|youtu\.be)/(?:watch\?v=|embed/|shorts/)?([^&?#/\s]+)",
        )
        .expect("link pattern is valid")
    })
}

/// Pull the video id out of a pasted YouTube link.
///
/// ```
/// use video_tutor::session::extract_video_id;
///
/// assert_eq!(extract_video_id("https://youtu.be/XYZ").unwrap(), "XYZ");
/// assert_eq!(
///     extract_video_id("https://www.youtube.com/watch?v=e8krKpuaby8&t=42").unwrap(),
///     "e8krKpuaby8"
/// );
/// assert!(extract_video_id("https://vimeo.com/123").is_err());
/// ```
pub fn extract_video_id(link: &str) -> Result<String, LinkError> {
    link_pattern()
        .captures(link.trim())
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or(LinkError::InvalidLink)
}

/// `{video id, display name}` for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub video_id: String,
    pub display_name: String,
}

impl SessionIdentity {
    pub fn new(video_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            display_name: display_name.into(),
        }
    }

    /// Identity from the landing form: parse `link`, default a blank `name`.
    pub fn from_landing(link: &str, name: &str, default_name: &str) -> Result<Self, LinkError> {
        let video_id = extract_video_id(link)?;
        Ok(Self::new(video_id, display_name_or(name, default_name)))
    }

    /// Identity from the session route: the path's video id plus the
    /// already-decoded `name` query parameter.
    pub fn from_route(video_id: &str, name: Option<&str>, default_name: &str) -> Self {
        Self::new(video_id, display_name_or(name.unwrap_or_default(), default_name))
    }

    /// The session route for this identity.
    ///
    /// ```
    /// use video_tutor::session::SessionIdentity;
    ///
    /// let identity = SessionIdentity::new("XYZ", "Ann Lee");
    /// assert_eq!(identity.route(), "/video/XYZ?name=Ann%20Lee");
    /// ```
    pub fn route(&self) -> String {
        format!(
            "{VIDEO_ROUTE_PREFIX}{}?{NAME_PARAM}={}",
            urlencoding::encode(&self.video_id),
            urlencoding::encode(&self.display_name)
        )
    }
}

fn display_name_or(name: &str, default_name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        default_name.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ids_from_common_link_shapes() {
        let cases = [
            ("https://youtu.be/XYZ", "XYZ"),
            ("youtu.be/XYZ?t=10", "XYZ"),
            ("https://www.youtube.com/watch?v=abc-_123", "abc-_123"),
            ("http://youtube.com/watch?v=abc&list=PL1", "abc"),
            ("www.youtube.com/embed/abc#t=3", "abc"),
            ("https://youtube.com/shorts/abc/", "abc"),
            ("  https://youtu.be/XYZ  ", "XYZ"),
        ];
        for (link, id) in cases {
            assert_eq!(extract_video_id(link).unwrap(), id, "{link}");
        }
    }

    #[test]
    fn rejects_foreign_or_empty_links() {
        for link in ["", "not a link", "https://vimeo.com/1", "https://youtu.be/", "youtube.com"] {
            let err = extract_video_id(link).unwrap_err();
            assert_eq!(err, LinkError::InvalidLink, "{link}");
            assert_eq!(err.kind(), ErrorKind::UserInput);
            assert_eq!(err.to_string(), "Invalid YouTube URL");
        }
    }

    #[test]
    fn landing_builds_route() {
        let identity = SessionIdentity::from_landing("https://youtu.be/XYZ", "Ann", "Guest").unwrap();
        assert_eq!(identity.route(), "/video/XYZ?name=Ann");
    }

    #[test]
    fn blank_name_defaults_to_guest() {
        let identity = SessionIdentity::from_landing("https://youtu.be/XYZ", "   ", "Guest").unwrap();
        assert_eq!(identity.display_name, "Guest");
        assert_eq!(identity.route(), "/video/XYZ?name=Guest");
    }

    #[test]
    fn route_identity_defaults_missing_name() {
        for name in [None, Some(""), Some("   ")] {
            let identity = SessionIdentity::from_route("XYZ", name, "Guest");
            assert_eq!(identity.display_name, "Guest", "{name:?}");
        }
        let identity = SessionIdentity::from_route("XYZ", Some(" Ann "), "Guest");
        assert_eq!(identity, SessionIdentity::new("XYZ", "Ann"));
    }
}
