//! Core types: configuration, playback events, and session lifecycle stages.

pub mod config;
pub mod event;
pub mod state;


pub use config::{SettingsStore, SyncConfig, SyncConfigBuilder, SyncSettings};
pub use event::{MediaItem, PlaybackChange, PlaybackEvent};
pub use state::SessionStage;
