//! Playback notifications from the host media player

use std::path::{Path, PathBuf};

/// Host playback position ticks per millisecond (one tick = 100 ns).
const TICKS_PER_MILLISECOND: i64 = 10_000;

/// A playback-change fact derived from an incoming event.
///
/// Consumed immediately by the state machine, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackChange {
    /// Playback started or resumed
    Start,
    /// Playback paused or stopped
    Stop,
}

/// The media item a playback notification refers to
#[derive(Debug, Clone, Default)]
pub struct MediaItem {
    /// Filesystem path of the media file, if resolvable
    pub path: Option<PathBuf>,
    /// Whether the item is theme or trailer media
    pub is_theme_media: bool,
}

/// A playback-progress notification delivered by the host media player
#[derive(Debug, Clone, Default)]
pub struct PlaybackEvent {
    /// The media item being played, if any
    pub item: Option<MediaItem>,
    /// Number of users attached to the playback session
    pub user_count: usize,
    /// Whether playback is currently paused
    pub is_paused: bool,
    /// Playback position in host ticks (100 ns units)
    pub position_ticks: i64,
}

impl PlaybackEvent {
    /// The media file path carried by this event, if any
    #[must_use]
    pub fn media_path(&self) -> Option<&Path> {
        self.item.as_ref()?.path.as_deref()
    }

    /// Playback position converted to milliseconds
    #[must_use]
    pub fn position_ms(&self) -> i64 {
        self.position_ticks.max(0) / TICKS_PER_MILLISECOND
    }

    /// Derive the playback change this event signals
    #[must_use]
    pub fn change(&self) -> PlaybackChange {
        if self.is_paused {
            PlaybackChange::Stop
        } else {
            PlaybackChange::Start
        }
    }
}
