//! Conversation lifecycle controller.  Drives one voice session for one
//! (video, display name) pairing.
//!
//! # Flow
//!
//! ```text
//! prime_transcript()           fetch once, join with spaces   [loading → ready]
//!
//! raise_hand()   (Disconnected + primed only)
//!   └─▶ clear error → claim Connecting → pause video
//!         └─▶ request microphone → start session(student_name, transcription)
//!               ├─ Ok(status) → Connecting / Connected (+ heartbeat)
//!               └─ Err        → error message, play video, Disconnected
//!
//! clear_doubt()  (Connected and not already ending)
//!   └─▶ clear error → claim ending → play video → end session → Disconnected
//!                                                   └─ Err → error message, still Disconnected
//!
//! handle_event(VoiceEvent)     provider notifications via apply_event()
//! ```
//!
//! State lives in [`SharedState`]; the lock is never held across an `.await`.
//! Each "raise hand" claims a new session generation; a start or end result
//! that settles for an older generation is dropped.
//! After [`unmount`](ConversationController::unmount) every late result is
//! discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard, Weak};

use tokio::sync::mpsc;

use crate::config::VoiceConfig;
use crate::conversation::heartbeat::Heartbeat;
use crate::conversation::state::{
    apply_event, new_shared_state, ControllerState, ConversationStatus, SharedState, VoiceEvent,
};
use crate::conversation::voice::{MicrophoneAccess, SessionConfig, VoiceError, VoiceProvider};
use crate::player::PlayerControl;
use crate::session::SessionIdentity;
use crate::transcript::{join_text, TranscriptSource};

/// Error slot text after a failed priming fetch.
pub const TRANSCRIPT_FETCH_FAILED: &str = "Failed to fetch transcript. Please try again.";
/// Error slot text after a failed session start (permission, provider or
/// configuration).
pub const START_FAILED: &str = "Failed to start conversation. Please try again.";
/// Error slot text after a failed session end.
pub const STOP_FAILED: &str = "Failed to stop conversation. Please try again.";

/// External collaborators the controller talks to.
#[derive(Clone)]
pub struct ConversationDeps {
    pub transcripts: Arc<dyn TranscriptSource>,
    pub voice: Arc<dyn VoiceProvider>,
    pub microphone: Arc<dyn MicrophoneAccess>,
}

pub struct ConversationController {
    state: SharedState,
    video_id: String,
    display_name: String,
    agent_id: Option<String>,
    transcripts: Arc<dyn TranscriptSource>,
    voice: Arc<dyn VoiceProvider>,
    microphone: Arc<dyn MicrophoneAccess>,
    player: Weak<dyn PlayerControl>,
    heartbeat: Heartbeat,
    mounted: AtomicBool,
    primed: AtomicBool,
}

impl ConversationController {
    /// Create a controller for `identity`.
    ///
    /// `player` is a non-owning reference to the page's player handle; it is
    /// used only to pause and play.
    pub fn new(
        identity: &SessionIdentity,
        config: &VoiceConfig,
        deps: ConversationDeps,
        player: Weak<dyn PlayerControl>,
    ) -> Self {
        Self {
            state: new_shared_state(),
            video_id: identity.video_id.clone(),
            display_name: identity.display_name.clone(),
            agent_id: config.agent_id.clone(),
            transcripts: deps.transcripts,
            voice: deps.voice,
            microphone: deps.microphone,
            player,
            heartbeat: Heartbeat::new(config.heartbeat_period()),
            mounted: AtomicBool::new(true),
            primed: AtomicBool::new(false),
        }
    }

    /// Shared handle to the controller state (also read by the view).
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> ControllerState {
        self.lock().clone()
    }

    pub fn status(&self) -> ConversationStatus {
        self.lock().status
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn heartbeat_running(&self) -> bool {
        self.heartbeat.is_running()
    }

    // -----------------------------------------------------------------------
    // Transcript priming
    // -----------------------------------------------------------------------

    /// Fetch the transcript once and hold it as grounding context.  Later
    /// calls are no-ops.
    pub async fn prime_transcript(&self) {
        if self.primed.swap(true, Ordering::SeqCst) {
            log::debug!("conversation: transcript already primed for {}", self.video_id);
            return;
        }
        self.lock().transcript_loading = true;

        let result = self.transcripts.fetch(&self.video_id).await;

        if !self.is_mounted() {
            log::debug!("conversation: discarding stale transcript for {}", self.video_id);
            return;
        }

        let mut st = self.lock();
        match result {
            Ok(segments) => {
                st.transcript = join_text(&segments);
                log::debug!(
                    "conversation: primed {} segments ({} chars) for {}",
                    segments.len(),
                    st.transcript.len(),
                    self.video_id
                );
            }
            Err(e) => {
                log::warn!("conversation: transcript priming failed: {e}");
                st.error_message = Some(TRANSCRIPT_FETCH_FAILED.to_string());
            }
        }
        st.transcript_loading = false;
    }

    // -----------------------------------------------------------------------
    // User actions
    // -----------------------------------------------------------------------

    /// "Raise hand": start a grounded voice session.
    ///
    /// Returns `false` (with no side effect at all) unless the status is
    /// `Disconnected` and priming has completed.
    pub async fn raise_hand(&self) -> bool {
        let session = {
            let mut st = self.lock();
            if !st.can_raise_hand() {
                log::warn!(
                    "conversation: raise hand ignored (status={}, transcript_loading={})",
                    st.status.label(),
                    st.transcript_loading
                );
                return false;
            }
            st.begin_session()
        };

        self.pause_video();

        let result = self.start_session().await;

        if !self.is_mounted() {
            log::debug!("conversation: start settled after unmount, ignoring");
            return true;
        }

        match result {
            Ok(reached) => {
                let status = {
                    let mut st = self.lock();
                    // An event may already have moved us on while we waited.
                    if !st.is_current(session) || st.status != ConversationStatus::Connecting {
                        log::debug!("conversation: start of session {session} superseded");
                        return true;
                    }
                    st.status = reached;
                    reached
                };
                log::info!("conversation: session {session} started ({})", status.label());
                self.sync_heartbeat(status);
            }
            Err(e) => {
                log::warn!("conversation: failed to start session ({:?}): {e}", e.kind());
                let mut st = self.lock();
                if !st.is_current(session) {
                    return true;
                }
                st.status = ConversationStatus::Disconnected;
                st.error_message = Some(START_FAILED.to_string());
                drop(st);
                self.play_video();
            }
        }
        true
    }

    /// "Got it": resume the video and end the session.
    ///
    /// Returns `false` (with no side effect) unless the status is
    /// `Connected`.
    pub async fn clear_doubt(&self) -> bool {
        let session = {
            let mut st = self.lock();
            if !st.can_clear_doubt() {
                log::warn!(
                    "conversation: got it ignored, no active session (status={}, ending={})",
                    st.status.label(),
                    st.ending
                );
                return false;
            }
            st.error_message = None;
            st.ending = true;
            st.session
        };

        self.play_video();

        let result = self.voice.end_session().await;

        if !self.is_mounted() {
            log::debug!("conversation: end settled after unmount, ignoring");
            return true;
        }

        let mut st = self.lock();
        if !st.is_current(session) {
            log::debug!("conversation: end of session {session} settled after a new session began");
            return true;
        }
        st.ending = false;
        st.status = ConversationStatus::Disconnected;
        match result {
            Ok(()) => log::info!("conversation: session {session} ended"),
            Err(e) => {
                log::warn!("conversation: failed to end session: {e}");
                st.error_message = Some(STOP_FAILED.to_string());
            }
        }
        drop(st);
        self.heartbeat.stop();
        true
    }

    // -----------------------------------------------------------------------
    // Provider notifications
    // -----------------------------------------------------------------------

    /// Apply one provider notification.
    pub fn handle_event(&self, event: VoiceEvent) {
        if !self.is_mounted() {
            return;
        }

        match &event {
            VoiceEvent::Message(payload) => log::debug!("conversation: message {payload}"),
            VoiceEvent::Error(reason) => log::error!("conversation: provider error: {reason}"),
            other => log::debug!("conversation: {other:?}"),
        }

        let status = {
            let mut st = self.lock();
            let (status, update) = apply_event(st.status, &event);
            st.status = status;
            st.apply_error(update);
            status
        };
        self.sync_heartbeat(status);
    }

    /// Drain provider notifications until the channel closes.
    pub async fn run_events(&self, mut events: mpsc::Receiver<VoiceEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        log::debug!("conversation: event channel closed");
    }

    /// Mark the controller stale: later results are dropped and the
    /// heartbeat stops.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.heartbeat.stop();
        log::debug!("conversation: unmounted ({})", self.video_id);
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn start_session(&self) -> Result<ConversationStatus, VoiceError> {
        self.microphone.request_permission().await?;

        let transcript = self.lock().transcript.clone();
        let config =
            SessionConfig::grounded(self.agent_id.as_deref(), &self.display_name, &transcript)?;

        self.voice.start_session(config).await
    }

    fn sync_heartbeat(&self, status: ConversationStatus) {
        if status == ConversationStatus::Connected {
            self.heartbeat.start();
        } else {
            self.heartbeat.stop();
        }
    }

    fn pause_video(&self) {
        if let Some(player) = self.player.upgrade() {
            player.pause();
        }
    }

    fn play_video(&self) {
        if let Some(player) = self.player.upgrade() {
            player.play();
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for ConversationController {
    fn drop(&mut self) {
        self.heartbeat.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
