//! Testing utilities: a scripted relay double and a controllable clock.

pub mod mock_relay;

use std::path::Path;

use crate::types::{MediaItem, PlaybackEvent};

pub use mock_relay::{FakeClock, MockRelay, RelayCall};

/// Helper to build an actionable playback-progress event for testing
#[must_use]
pub fn progress_event(path: impl AsRef<Path>, position_ticks: i64, paused: bool) -> PlaybackEvent {
    PlaybackEvent {
        item: Some(MediaItem {
            path: Some(path.as_ref().to_path_buf()),
            is_theme_media: false,
        }),
        user_count: 1,
        is_paused: paused,
        position_ticks,
    }
}
