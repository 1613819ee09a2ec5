//! Conversation state machine and shared controller state.
//!
//! [`ConversationStatus`] is the voice session's connection status.  Provider
//! notifications arrive as [`VoiceEvent`]s and are applied through the pure
//! [`apply_event`] transition function.
//!
//! [`ControllerState`] is everything the session view needs from the
//! controller: status, grounding transcript, loading flag and the single
//! error slot.  [`SharedState`] is `Arc<Mutex<ControllerState>>`.

use std::sync::{Arc, Mutex};

use crate::error::GENERIC_FAILURE;

// ---------------------------------------------------------------------------
// ConversationStatus
// ---------------------------------------------------------------------------

/// Connection status of the voice session.
///
/// ```text
/// Disconnected ──raise hand──▶ Connecting ──provider connected──▶ Connected
///                              Connecting ──failure─────────────▶ Disconnected
/// Connected ──got it / remote disconnect / error──▶ Disconnected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConversationStatus {
    /// Label shown next to "Status:" in the conversation panel.
    pub fn label(&self) -> &'static str {
        match self {
            ConversationStatus::Disconnected => "Disconnected",
            ConversationStatus::Connecting => "Connecting",
            ConversationStatus::Connected => "Connected",
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceEvent
// ---------------------------------------------------------------------------

/// Notifications from the voice provider.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEvent {
    Connected,
    Disconnected,
    /// Agent or transcript message; opaque to the controller.
    Message(serde_json::Value),
    Error(String),
}

/// What an event does to the error slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorUpdate {
    Keep,
    Clear,
    Set(String),
}

/// Pure transition: the status after `event`, and the error-slot update.
///
/// ```
/// use video_tutor::conversation::{apply_event, ConversationStatus, ErrorUpdate, VoiceEvent};
///
/// let (status, err) = apply_event(ConversationStatus::Connecting, &VoiceEvent::Connected);
/// assert_eq!(status, ConversationStatus::Connected);
/// assert_eq!(err, ErrorUpdate::Clear);
/// ```
pub fn apply_event(
    status: ConversationStatus,
    event: &VoiceEvent,
) -> (ConversationStatus, ErrorUpdate) {
    match event {
        VoiceEvent::Connected => (ConversationStatus::Connected, ErrorUpdate::Clear),
        VoiceEvent::Disconnected => (ConversationStatus::Disconnected, ErrorUpdate::Clear),
        VoiceEvent::Message(_) => (status, ErrorUpdate::Keep),
        VoiceEvent::Error(_) => (
            ConversationStatus::Disconnected,
            ErrorUpdate::Set(GENERIC_FAILURE.to_string()),
        ),
    }
}

// ---------------------------------------------------------------------------
// ControllerState
// ---------------------------------------------------------------------------

/// Shared controller state, the single source of truth for the view.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    /// Current voice-session status.
    pub status: ConversationStatus,

    /// Grounding text: all transcript segments joined by single spaces.
    /// Empty until priming completes (and if the video has no captions).
    pub transcript: String,

    /// `true` while the priming fetch is outstanding.  Starts `true` so the
    /// "raise hand" button is disabled from mount until priming settles.
    pub transcript_loading: bool,

    /// The single user-visible error slot; the latest failure replaces it.
    pub error_message: Option<String>,

    /// Bumped each time "raise hand" claims a new session.  Results that
    /// settle for an older session leave the state alone.
    pub(crate) session: u64,

    /// `true` between "got it" passing its precondition and the end call
    /// settling.
    pub(crate) ending: bool,
}

impl ControllerState {
    pub fn new() -> Self {
        Self {
            status: ConversationStatus::Disconnected,
            transcript: String::new(),
            transcript_loading: true,
            error_message: None,
            session: 0,
            ending: false,
        }
    }

    /// Whether "raise hand" is enabled.
    pub fn can_raise_hand(&self) -> bool {
        self.status == ConversationStatus::Disconnected && !self.transcript_loading
    }

    /// Whether "got it" is enabled.
    pub fn can_clear_doubt(&self) -> bool {
        self.status == ConversationStatus::Connected && !self.ending
    }

    /// Claim a new session: `Connecting`, error cleared.  Returns its
    /// generation.
    pub(crate) fn begin_session(&mut self) -> u64 {
        self.session += 1;
        self.ending = false;
        self.error_message = None;
        self.status = ConversationStatus::Connecting;
        self.session
    }

    /// Whether `session` is still the current one.
    pub(crate) fn is_current(&self, session: u64) -> bool {
        self.session == session
    }

    pub(crate) fn apply_error(&mut self, update: ErrorUpdate) {
        match update {
            ErrorUpdate::Keep => {}
            ErrorUpdate::Clear => self.error_message = None,
            ErrorUpdate::Set(message) => self.error_message = Some(message),
        }
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle to [`ControllerState`].
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedState = Arc<Mutex<ControllerState>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(ControllerState::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ConversationStatus::*;

    #[test]
    fn default_status_is_disconnected() {
        assert_eq!(ConversationStatus::default(), Disconnected);
    }

    #[test]
    fn labels() {
        assert_eq!(Disconnected.label(), "Disconnected");
        assert_eq!(Connecting.label(), "Connecting");
        assert_eq!(Connected.label(), "Connected");
    }

    #[test]
    fn connected_event_from_any_status() {
        for from in [Disconnected, Connecting, Connected] {
            assert_eq!(
                apply_event(from, &VoiceEvent::Connected),
                (Connected, ErrorUpdate::Clear)
            );
        }
    }

    #[test]
    fn disconnected_event_clears_error() {
        assert_eq!(
            apply_event(Connected, &VoiceEvent::Disconnected),
            (Disconnected, ErrorUpdate::Clear)
        );
    }

    #[test]
    fn message_changes_nothing() {
        let msg = VoiceEvent::Message(serde_json::json!({"source": "ai", "message": "hi"}));
        assert_eq!(apply_event(Connected, &msg), (Connected, ErrorUpdate::Keep));
        assert_eq!(apply_event(Connecting, &msg), (Connecting, ErrorUpdate::Keep));
    }

    #[test]
    fn error_event_disconnects_with_generic_message() {
        let (status, update) = apply_event(Connected, &VoiceEvent::Error("socket closed".into()));
        assert_eq!(status, Disconnected);
        assert_eq!(update, ErrorUpdate::Set(GENERIC_FAILURE.to_string()));
    }

    #[test]
    fn fresh_state_blocks_raise_hand_until_primed() {
        let mut st = ControllerState::new();
        assert!(!st.can_raise_hand());
        assert!(!st.can_clear_doubt());

        st.transcript_loading = false;
        assert!(st.can_raise_hand());

        st.status = Connected;
        assert!(!st.can_raise_hand());
        assert!(st.can_clear_doubt());

        st.ending = true;
        assert!(!st.can_clear_doubt());
    }

    #[test]
    fn begin_session_bumps_generation() {
        let mut st = ControllerState::new();
        st.ending = true;
        st.error_message = Some("old".into());

        let first = st.begin_session();
        assert_eq!(st.status, Connecting);
        assert!(!st.ending);
        assert!(st.error_message.is_none());

        let second = st.begin_session();
        assert!(second > first);
        assert!(st.is_current(second));
        assert!(!st.is_current(first));
    }

    #[test]
    fn error_slot_is_replaced_not_queued() {
        let mut st = ControllerState::new();
        st.apply_error(ErrorUpdate::Set("first".into()));
        st.apply_error(ErrorUpdate::Set("second".into()));
        assert_eq!(st.error_message.as_deref(), Some("second"));
        st.apply_error(ErrorUpdate::Keep);
        assert_eq!(st.error_message.as_deref(), Some("second"));
        st.apply_error(ErrorUpdate::Clear);
        assert!(st.error_message.is_none());
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }
}
