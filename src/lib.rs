//! # handysync
//!
//! Synchronizes playback of a video with a remote haptic device through the
//! handyfeeling sync relay.
//!
//! Driven by playback-progress notifications from the host media player, the
//! library uploads the media file's companion script to the relay, estimates
//! the offset between the local and relay clocks over many round trips, and
//! keeps device playback aligned with the video via play/pause commands that
//! carry clock-compensated timestamps.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use handysync::{
//!     HandyClient, PlaybackNotifier, SettingsStore, SyncConfig, SyncManager,
//! };
//!
//! # async fn example(event: handysync::PlaybackEvent) -> handysync::Result<()> {
//! let settings = Arc::new(SettingsStore::with_connection_key("my-key"));
//! let relay = Arc::new(HandyClient::new(settings));
//! let manager = Arc::new(SyncManager::new(SyncConfig::default(), relay));
//! let notifier = PlaybackNotifier::new(manager);
//!
//! // Feed each playback-progress notification from the host:
//! notifier.on_progress(&event).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`PlaybackNotifier`]: filters raw notifications and derives the
//!   playback-change signal
//! - [`SyncManager`]: the per-video session state machine
//! - [`ClockSyncEstimator`](timesync::ClockSyncEstimator): round-trip
//!   clock-offset sampling
//! - [`HandyClient`]: HTTP binding to the four relay endpoints

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod notifier;
pub mod relay;
pub mod session;
pub mod testing;
pub mod timesync;
pub mod types;

// Re-exports
pub use error::{Result, SyncError};
pub use notifier::PlaybackNotifier;
pub use relay::{HandyClient, RelayApi};
pub use session::{Session, SessionRegistry, SharedSession, SyncManager};
pub use timesync::{ClockOffset, ClockSyncEstimator, LocalClock, SystemClock};
pub use types::{
    MediaItem, PlaybackChange, PlaybackEvent, SessionStage, SettingsStore, SyncConfig,
    SyncSettings,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
