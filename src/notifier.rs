//! Adapter between the host's playback notifications and the state machine.

use std::sync::Arc;

use crate::error::Result;
use crate::session::SyncManager;
use crate::types::{PlaybackChange, PlaybackEvent};

/// Receives raw playback-progress notifications, filters the irrelevant
/// ones, derives the playback-change signal, and forwards to the manager.
///
/// The manager is injected at construction; the notifier holds no state of
/// its own. A discarded event is simply dropped; the next event retries
/// implicitly when playback continues.
#[derive(Debug)]
pub struct PlaybackNotifier {
    manager: Arc<SyncManager>,
}

impl PlaybackNotifier {
    /// Create a notifier forwarding into the given manager
    #[must_use]
    pub fn new(manager: Arc<SyncManager>) -> Self {
        Self { manager }
    }

    /// Handle one playback-progress notification.
    ///
    /// # Errors
    ///
    /// Propagates relay failures from the state machine; skip conditions are
    /// not errors.
    pub async fn on_progress(&self, event: &PlaybackEvent) -> Result<()> {
        if !Self::actionable(event) {
            return Ok(());
        }
        self.manager.handle_event(event, event.change()).await
    }

    /// Handle a playback-stopped notification.
    ///
    /// Same filtering as progress, but the change is always Stop.
    ///
    /// # Errors
    ///
    /// Propagates relay failures from the state machine.
    pub async fn on_stopped(&self, event: &PlaybackEvent) -> Result<()> {
        if !Self::actionable(event) {
            return Ok(());
        }
        self.manager.handle_event(event, PlaybackChange::Stop).await
    }

    fn actionable(event: &PlaybackEvent) -> bool {
        let Some(item) = &event.item else {
            tracing::trace!("dropping event without media item");
            return false;
        };
        if item.is_theme_media {
            // Don't report theme song or trailer playback.
            tracing::trace!("dropping theme media event");
            return false;
        }
        if event.user_count == 0 {
            tracing::trace!("dropping event with no users in session");
            return false;
        }
        if item.path.is_none() {
            tracing::trace!("dropping event without resolvable media path");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::testing::{MockRelay, progress_event};
    use crate::types::{MediaItem, SyncConfig};

    fn notifier_with(relay: &Arc<MockRelay>) -> PlaybackNotifier {
        let relay: Arc<dyn crate::relay::RelayApi> = Arc::clone(relay) as Arc<dyn crate::relay::RelayApi>;
        let manager = Arc::new(SyncManager::new(SyncConfig::default(), relay));
        PlaybackNotifier::new(manager)
    }

    async fn assert_dropped(relay: &MockRelay, notifier: &PlaybackNotifier, event: &PlaybackEvent) {
        notifier.on_progress(event).await.unwrap();
        assert!(relay.calls().is_empty());
    }

    #[tokio::test]
    async fn test_event_without_item_is_dropped() {
        let relay = Arc::new(MockRelay::new());
        let notifier = notifier_with(&relay);
        assert_dropped(&relay, &notifier, &PlaybackEvent::default()).await;
    }

    #[tokio::test]
    async fn test_theme_media_is_dropped() {
        let relay = Arc::new(MockRelay::new());
        let notifier = notifier_with(&relay);
        let mut event = progress_event("/media/theme.mp3", 0, false);
        event.item.as_mut().unwrap().is_theme_media = true;
        assert_dropped(&relay, &notifier, &event).await;
    }

    #[tokio::test]
    async fn test_event_with_no_users_is_dropped() {
        let relay = Arc::new(MockRelay::new());
        let notifier = notifier_with(&relay);
        let mut event = progress_event("/media/movie.mp4", 0, false);
        event.user_count = 0;
        assert_dropped(&relay, &notifier, &event).await;
    }

    #[tokio::test]
    async fn test_event_without_path_is_dropped() {
        let relay = Arc::new(MockRelay::new());
        let notifier = notifier_with(&relay);
        let event = PlaybackEvent {
            item: Some(MediaItem {
                path: None,
                is_theme_media: false,
            }),
            user_count: 1,
            is_paused: false,
            position_ticks: 0,
        };
        assert_dropped(&relay, &notifier, &event).await;
    }

    #[tokio::test]
    async fn test_dropped_events_create_no_session() {
        let relay = Arc::new(MockRelay::new());
        let relay_api: Arc<dyn crate::relay::RelayApi> = Arc::clone(&relay) as Arc<dyn crate::relay::RelayApi>;
        let manager = Arc::new(SyncManager::new(SyncConfig::default(), relay_api));
        let notifier = PlaybackNotifier::new(Arc::clone(&manager));

        let mut event = progress_event("/media/movie.mp4", 0, false);
        event.user_count = 0;
        notifier.on_progress(&event).await.unwrap();

        assert!(manager.registry().is_empty().await);
    }

    #[tokio::test]
    async fn test_actionable_event_is_forwarded() {
        let relay = Arc::new(MockRelay::new());
        let relay_api: Arc<dyn crate::relay::RelayApi> = Arc::clone(&relay) as Arc<dyn crate::relay::RelayApi>;
        let manager = Arc::new(SyncManager::new(SyncConfig::default(), relay_api));
        let notifier = PlaybackNotifier::new(Arc::clone(&manager));

        // Script file does not exist, so no relay traffic, but the session
        // is created for the path.
        let path = PathBuf::from("/media/that/does/not/exist.mp4");
        notifier
            .on_progress(&progress_event(&path, 0, false))
            .await
            .unwrap();

        assert_eq!(manager.registry().len().await, 1);
        assert!(manager.registry().get(&path).await.is_some());
    }

    #[tokio::test]
    async fn test_on_stopped_forces_stop_change() {
        let dir = tempfile::TempDir::new().unwrap();
        let media = dir.path().join("movie.mp4");
        std::fs::write(media.with_extension("funscript"), b"{}").unwrap();

        let relay = Arc::new(MockRelay::new());
        let relay_api: Arc<dyn crate::relay::RelayApi> = Arc::clone(&relay) as Arc<dyn crate::relay::RelayApi>;
        let config = SyncConfig::builder().sync_rounds(1).build();
        let manager = Arc::new(SyncManager::new(config, relay_api));
        let notifier = PlaybackNotifier::new(Arc::clone(&manager));

        // Progress event with is_paused=false drives the session to Playing.
        notifier
            .on_progress(&progress_event(&media, 0, false))
            .await
            .unwrap();

        // The stop notification is not paused-flagged but must still stop.
        notifier
            .on_stopped(&progress_event(&media, 0, false))
            .await
            .unwrap();

        let shared = manager.registry().get(&media).await.unwrap();
        let session = shared.lock().await;
        assert_eq!(session.stage(), crate::types::SessionStage::Paused);
    }
}
