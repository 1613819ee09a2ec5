//! Voice-provider and microphone capabilities, and the session config
//! handed over at start.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::conversation::state::ConversationStatus;
use crate::error::ErrorKind;

/// Session variable carrying the visitor's display name.
pub const STUDENT_NAME_VAR: &str = "student_name";

/// Session variable carrying the concatenated transcript.
pub const TRANSCRIPTION_VAR: &str = "transcription";

// ---------------------------------------------------------------------------
// VoiceError
// ---------------------------------------------------------------------------

/// Errors from the microphone or the voice provider.
#[derive(Debug, Clone, Error)]
pub enum VoiceError {
    /// The runtime refused microphone access.
    #[error("microphone permission denied")]
    PermissionDenied,

    /// No agent identifier is configured.
    #[error("no voice agent configured")]
    MissingAgentId,

    /// The provider could not start a session.
    #[error("failed to start voice session: {0}")]
    Start(String),

    /// The provider could not end the session.
    #[error("failed to end voice session: {0}")]
    End(String),
}

impl VoiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoiceError::MissingAgentId => ErrorKind::Configuration,
            _ => ErrorKind::TransientProvider,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Start parameters for one voice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub agent_id: String,
    /// Session-scoped variables the agent can reference.
    pub dynamic_variables: BTreeMap<String, String>,
}

impl SessionConfig {
    /// Build the config with the two grounding variables.
    ///
    /// Fails with [`VoiceError::MissingAgentId`] when `agent_id` is absent or
    /// blank.
    pub fn grounded(
        agent_id: Option<&str>,
        display_name: &str,
        transcript: &str,
    ) -> Result<Self, VoiceError> {
        let agent_id = agent_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(VoiceError::MissingAgentId)?;

        let dynamic_variables = BTreeMap::from([
            (STUDENT_NAME_VAR.to_string(), display_name.to_string()),
            (TRANSCRIPTION_VAR.to_string(), transcript.to_string()),
        ]);

        Ok(Self {
            agent_id: agent_id.to_string(),
            dynamic_variables,
        })
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Hosted conversational-voice provider.
///
/// `start_session` reports the status the provider reached: `Connecting`
/// when the connection completes later (signalled by
/// [`VoiceEvent::Connected`]), or `Connected`.
///
/// [`VoiceEvent::Connected`]: crate::conversation::VoiceEvent::Connected
#[async_trait]
pub trait VoiceProvider: Send + Sync {
    async fn start_session(&self, config: SessionConfig) -> Result<ConversationStatus, VoiceError>;
    async fn end_session(&self) -> Result<(), VoiceError>;
}

/// Runtime microphone permission prompt.
#[async_trait]
pub trait MicrophoneAccess: Send + Sync {
    async fn request_permission(&self) -> Result<(), VoiceError>;
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Records calls into a shared journal and answers with fixed results.
#[cfg(test)]
pub struct MockVoiceProvider {
    pub journal: std::sync::Arc<std::sync::Mutex<Vec<&'static str>>>,
    pub started: std::sync::Mutex<Vec<SessionConfig>>,
    start: Result<ConversationStatus, VoiceError>,
    end: Result<(), VoiceError>,
    end_yields: usize,
}

#[cfg(test)]
impl MockVoiceProvider {
    pub fn new(journal: std::sync::Arc<std::sync::Mutex<Vec<&'static str>>>) -> Self {
        Self {
            journal,
            started: Default::default(),
            start: Ok(ConversationStatus::Connected),
            end: Ok(()),
            end_yields: 0,
        }
    }

    pub fn start_result(mut self, result: Result<ConversationStatus, VoiceError>) -> Self {
        self.start = result;
        self
    }

    pub fn end_result(mut self, result: Result<(), VoiceError>) -> Self {
        self.end = result;
        self
    }

    /// Make `end_session` yield to the scheduler `n` times before settling.
    pub fn end_yields(mut self, n: usize) -> Self {
        self.end_yields = n;
        self
    }

    pub fn end_calls(&self) -> usize {
        self.journal.lock().unwrap().iter().filter(|e| **e == "end").count()
    }

    pub fn last_config(&self) -> Option<SessionConfig> {
        self.started.lock().unwrap().last().cloned()
    }
}

#[cfg(test)]
#[async_trait]
impl VoiceProvider for MockVoiceProvider {
    async fn start_session(&self, config: SessionConfig) -> Result<ConversationStatus, VoiceError> {
        self.journal.lock().unwrap().push("start");
        self.started.lock().unwrap().push(config);
        self.start.clone()
    }

    async fn end_session(&self) -> Result<(), VoiceError> {
        self.journal.lock().unwrap().push("end");
        for _ in 0..self.end_yields {
            tokio::task::yield_now().await;
        }
        self.end.clone()
    }
}

#[cfg(test)]
pub struct MockMicrophone {
    pub journal: std::sync::Arc<std::sync::Mutex<Vec<&'static str>>>,
    pub granted: bool,
}

#[cfg(test)]
#[async_trait]
impl MicrophoneAccess for MockMicrophone {
    async fn request_permission(&self) -> Result<(), VoiceError> {
        self.journal.lock().unwrap().push("mic");
        if self.granted {
            Ok(())
        } else {
            Err(VoiceError::PermissionDenied)
        }
    }
}
