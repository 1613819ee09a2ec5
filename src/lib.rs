//! Video Tutor: watch a YouTube video and talk it through with a voice AI
//! tutor grounded in the video's transcript.
//!
//! ```text
//! landing form ──link──▶ /video/{id}?name=..
//!                           │
//!                  SessionPage (player + controller + panel)
//!                           │
//!        ┌──────────────────┼────────────────────┐
//!   PlayerHandle   ConversationController   TranscriptPanel
//!                     │            │               │
//!                VoiceProvider   TranscriptSource ◀┘
//!                                  │
//!                          TranscriptBridge ──▶ TranscriptProvider
//! ```
//!
//! Every page except the access gate and `/api/*` sits behind the
//! [`access`] perimeter.

pub mod access;
pub mod config;
pub mod conversation;
pub mod error;
pub mod player;
pub mod session;
pub mod transcript;
pub mod web;
