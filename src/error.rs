//! Error taxonomy shared by the module-level error enums.
//!
//! Every subsystem defines its own `thiserror` enum ([`TranscriptError`],
//! [`VoiceError`], [`LinkError`]) and classifies each variant with an
//! [`ErrorKind`].  Nothing in this crate is fatal to the process: every
//! failure is scoped to the action that produced it.
//!
//! [`TranscriptError`]: crate::transcript::TranscriptError
//! [`VoiceError`]: crate::conversation::VoiceError
//! [`LinkError`]: crate::session::LinkError

/// Message shown for any failure that has no more specific wording.
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Coarse classification of a failure, used for logging and messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed link or missing query parameter.  Reported inline, no retry.
    UserInput,
    /// Transcript fetch, voice session start/stop, or permission denial.
    /// Reported as a user-visible message; the user re-invokes the action.
    TransientProvider,
    /// Missing required session parameters (e.g. no agent identifier).
    Configuration,
}

impl ErrorKind {
    /// `true` when the user sees the same generic wording for this kind as
    /// for a provider failure.
    ///
    /// ```
    /// use video_tutor::error::ErrorKind;
    ///
    /// assert!(ErrorKind::Configuration.collapses_to_provider_message());
    /// assert!(ErrorKind::TransientProvider.collapses_to_provider_message());
    /// assert!(!ErrorKind::UserInput.collapses_to_provider_message());
    /// ```
    pub fn collapses_to_provider_message(self) -> bool {
        matches!(self, ErrorKind::TransientProvider | ErrorKind::Configuration)
    }
}
