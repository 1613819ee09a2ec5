//! Video player capability.
//!
//! * [`VideoWidget`]: the external embed (play/pause + ready notification).
//! * [`PlayerControl`]: the pause/play capability lent to the controller.
//! * [`PlayerHandle`]: the page-owned handle implementing it.
//! * [`embed_url`]: the iframe source for a video id.

pub mod embed;
pub mod handle;

pub use embed::embed_url;
pub use handle::{PlayerControl, PlayerHandle, VideoWidget};

#[cfg(test)]
pub use handle::RecordingWidget;
