//! Configuration module for the video tutor.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform config directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AccessConfig, AppConfig, PageConfig, ServerConfig, TranscriptConfig, VoiceConfig,
};
