//! Voice conversation lifecycle.
//!
//! This module provides:
//! * [`ConversationStatus`] / [`VoiceEvent`] / [`apply_event`]: the session
//!   state machine.
//! * [`ControllerState`] / [`SharedState`]: what the session view renders.
//! * [`VoiceProvider`] / [`MicrophoneAccess`]: the external capabilities.
//! * [`ConversationController`]: primes the grounding transcript, starts
//!   and ends sessions, and keeps the video player in step.
//! * [`Heartbeat`]: keep-alive hook while connected.

pub mod controller;
pub mod heartbeat;
pub mod state;
pub mod voice;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::{
    ConversationController, ConversationDeps, START_FAILED, STOP_FAILED, TRANSCRIPT_FETCH_FAILED,
};
pub use heartbeat::Heartbeat;
pub use state::{
    apply_event, new_shared_state, ControllerState, ConversationStatus, ErrorUpdate, SharedState,
    VoiceEvent,
};
pub use voice::{
    MicrophoneAccess, SessionConfig, VoiceError, VoiceProvider, STUDENT_NAME_VAR,
    TRANSCRIPTION_VAR,
};

#[cfg(test)]
pub use voice::{MockMicrophone, MockVoiceProvider};
