//! Session lifecycle stages

/// Lifecycle stage of a synchronization session.
///
/// Stages advance in strict forward order with one conditional branch:
/// `NewVideo → UploadingScript → UploadedScript → SyncStarting →
/// {SyncStarted | NewVideo} → Playing ⇄ Paused`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStage {
    /// No script uploaded yet for this media file
    #[default]
    NewVideo,
    /// Script upload in flight
    UploadingScript,
    /// Script uploaded, remote URL captured
    UploadedScript,
    /// Prepare request in flight
    SyncStarting,
    /// Device connected and prepared, ready for play commands
    SyncStarted,
    /// Device playback running
    Playing,
    /// Device playback paused
    Paused,
}

impl SessionStage {
    /// Check if the session has completed upload and prepare
    #[must_use]
    pub fn is_synced(self) -> bool {
        matches!(
            self,
            SessionStage::SyncStarted | SessionStage::Playing | SessionStage::Paused
        )
    }

    /// Check if a Start change may issue a play command from this stage
    #[must_use]
    pub fn can_start(self) -> bool {
        matches!(self, SessionStage::SyncStarted | SessionStage::Paused)
    }

    /// Check if device playback is currently running
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, SessionStage::Playing)
    }
}
