//! One viewing session: identity, page composition and transcript panel.
//!
//! * [`SessionIdentity`]: video id + display name, parsed from a pasted link
//!   or from the session route.
//! * [`SessionPage`]: owns the player handle, the conversation controller
//!   and the transcript panel.
//! * [`TranscriptPanel`]: lazily fetched, cached transcript view.

pub mod identity;
pub mod page;
pub mod panel;

pub use identity::{extract_video_id, LinkError, SessionIdentity, NAME_PARAM, VIDEO_ROUTE_PREFIX};
pub use page::{PageView, SessionPage};
pub use panel::{PanelView, TranscriptPanel, EMPTY_TRANSCRIPT, LOAD_FAILED};
