//! YouTube embed URL construction.

/// Player parameters: autoplay, minimal branding, no related videos from
/// other channels, JS API enabled so pause/play can be driven.
const EMBED_PARAMS: &str = "autoplay=1&modestbranding=1&rel=0&enablejsapi=1";

/// Embed URL for `video_id`.  The id is percent-encoded.
///
/// ```
/// use video_tutor::player::embed_url;
///
/// assert_eq!(
///     embed_url("XYZ"),
///     "https://www.youtube.com/embed/XYZ?autoplay=1&modestbranding=1&rel=0&enablejsapi=1"
/// );
/// ```
pub fn embed_url(video_id: &str) -> String {
    format!(
        "https://www.youtube.com/embed/{}?{}",
        urlencoding::encode(video_id),
        EMBED_PARAMS
    )
}
