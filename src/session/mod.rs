//! Per-video synchronization sessions and their state machine.
//!
//! One [`Session`] exists per distinct media path ever played, held in the
//! [`SessionRegistry`] for the lifetime of the process. [`SyncManager`]
//! drives each session through upload → prepare → play/pause in response to
//! playback events, serializing execution per session while letting
//! different sessions proceed in parallel.

pub mod manager;
pub mod registry;


use std::path::{Path, PathBuf};

use crate::timesync::ClockOffset;
use crate::types::SessionStage;

pub use manager::SyncManager;
pub use registry::{SessionRegistry, SharedSession};

/// Synchronization context for one media file
#[derive(Debug, Clone)]
pub struct Session {
    /// Companion script path, derived once from the first observed media path
    pub(crate) script_path: PathBuf,
    /// Location of the uploaded script on the relay; empty until upload succeeds
    pub(crate) script_url: String,
    /// Current lifecycle stage
    pub(crate) stage: SessionStage,
    /// Running clock-offset estimate against the relay
    pub(crate) clock: ClockOffset,
}

impl Session {
    /// Create a fresh session for a media file.
    ///
    /// The script path replaces the media file's extension.
    #[must_use]
    pub(crate) fn for_media(media_path: &Path, script_extension: &str) -> Self {
        Self {
            script_path: media_path.with_extension(script_extension),
            script_url: String::new(),
            stage: SessionStage::NewVideo,
            clock: ClockOffset::default(),
        }
    }

    /// The derived companion script path
    #[must_use]
    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// The uploaded script's relay URL, empty before a successful upload
    #[must_use]
    pub fn script_url(&self) -> &str {
        &self.script_url
    }

    /// The current lifecycle stage
    #[must_use]
    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    /// The session's clock-offset estimate
    #[must_use]
    pub fn clock(&self) -> &ClockOffset {
        &self.clock
    }
}
