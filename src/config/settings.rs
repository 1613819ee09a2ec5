//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the web surface binds to (e.g. `"127.0.0.1:3000"`).
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AccessConfig
// ---------------------------------------------------------------------------

/// Shared-secret access gate settings.
///
/// There is exactly one secret; the gate is a perimeter, not an identity
/// system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// The access code visitors must type, compared byte-for-byte.
    pub access_code: String,
    /// Name of the marker cookie set on success.
    pub cookie_name: String,
    /// Marker validity window in seconds (`Max-Age` of the cookie).
    pub max_age_secs: u64,
}

impl AccessConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            access_code: "cc@Demo2025".into(),
            cookie_name: "hasAccess".into(),
            max_age_secs: 86_400,
        }
    }
}

// ---------------------------------------------------------------------------
// TranscriptConfig
// ---------------------------------------------------------------------------

/// Settings for the external transcript-extraction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Base URL of the transcript service.  The provider calls
    /// `{provider_url}/transcript?videoId=…&lang=…`.
    pub provider_url: String,
    /// Caption language requested when the caller does not name one.
    pub language: String,
    /// Optional request timeout in seconds.  `None` leaves the transport's
    /// own behaviour in charge.
    pub timeout_secs: Option<u64>,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            provider_url: "http://localhost:8765".into(),
            language: "en".into(),
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted conversational-voice provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Agent identifier handed to the voice provider at session start.
    /// `None` makes every session start fail with a configuration error.
    pub agent_id: Option<String>,
    /// Period of the keep-alive hook while a session is connected.
    pub heartbeat_secs: u64,
}

impl VoiceConfig {
    pub fn heartbeat_period(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            agent_id: None,
            heartbeat_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// PageConfig
// ---------------------------------------------------------------------------

/// Session page presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Fixed loading transition shown before the composed session view.
    pub loading_delay_ms: u64,
    /// Display name used when the visitor leaves the name field blank.
    pub default_display_name: String,
}

impl PageConfig {
    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            loading_delay_ms: 1_500,
            default_display_name: "Guest".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use video_tutor::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Access gate settings.
    #[serde(default)]
    pub access: AccessConfig,
    /// Transcript provider settings.
    #[serde(default)]
    pub transcript: TranscriptConfig,
    /// Voice provider settings.
    #[serde(default)]
    pub voice: VoiceConfig,
    /// Session page settings.
    #[serde(default)]
    pub page: PageConfig,
}

impl AppConfig {
    /// Environment variable overriding [`VoiceConfig::agent_id`].
    pub const ENV_AGENT_ID: &'static str = "VIDEO_TUTOR_AGENT_ID";
    /// Environment variable overriding [`ServerConfig::bind_addr`].
    pub const ENV_BIND_ADDR: &'static str = "VIDEO_TUTOR_BIND_ADDR";
    /// Environment variable overriding [`AccessConfig::access_code`].
    pub const ENV_ACCESS_CODE: &'static str = "VIDEO_TUTOR_ACCESS_CODE";

    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `VIDEO_TUTOR_*` environment overrides from the process
    /// environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup.  Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(agent_id) = get(Self::ENV_AGENT_ID) {
            self.voice.agent_id = Some(agent_id);
        }
        if let Some(addr) = get(Self::ENV_BIND_ADDR) {
            self.server.bind_addr = addr;
        }
        if let Some(code) = get(Self::ENV_ACCESS_CODE) {
            self.access.access_code = code;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
