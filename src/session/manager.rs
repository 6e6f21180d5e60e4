//! Event-driven session state machine

use std::sync::Arc;

use crate::error::Result;
use crate::relay::RelayApi;
use crate::timesync::{ClockSyncEstimator, LocalClock, SystemClock};
use crate::types::{PlaybackChange, PlaybackEvent, SessionStage, SyncConfig};

use super::Session;
use super::registry::SessionRegistry;

/// The per-video session state machine.
///
/// Each incoming `(event, change)` pair is evaluated against the fixed
/// transition order of the session lifecycle; multiple transitions may chain
/// within one event when their preconditions hold. A relay failure inside a
/// transition reverts the session to its pre-transition stage and propagates,
/// so the next event re-attempts from there; there is no built-in retry.
pub struct SyncManager {
    config: SyncConfig,
    relay: Arc<dyn RelayApi>,
    registry: SessionRegistry,
    estimator: ClockSyncEstimator,
    clock: Arc<dyn LocalClock>,
}

impl SyncManager {
    /// Create a manager driving the given relay
    #[must_use]
    pub fn new(config: SyncConfig, relay: Arc<dyn RelayApi>) -> Self {
        let registry = SessionRegistry::new(config.script_extension.clone());
        let estimator = ClockSyncEstimator::new(config.sync_rounds);
        Self {
            config,
            relay,
            registry,
            estimator,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall-clock source (used by tests)
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn LocalClock>) -> Self {
        self.clock = clock;
        self
    }

    /// The session registry backing this manager
    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Process one playback event against its media file's session.
    ///
    /// Looks up or creates the session, then holds its lock for the whole
    /// chain of transitions, including the clock-sync rounds after an upload.
    /// Events for other media files are not blocked.
    ///
    /// # Errors
    ///
    /// Propagates any relay failure; the session is left at its last
    /// successfully reached stage.
    pub async fn handle_event(&self, event: &PlaybackEvent, change: PlaybackChange) -> Result<()> {
        let Some(media_path) = event.media_path() else {
            return Ok(());
        };

        let shared = self.registry.get_or_create(media_path).await;
        let mut session = shared.lock().await;

        tracing::debug!(
            script = %session.script_path.display(),
            stage = ?session.stage,
            ?change,
            "handling playback event"
        );

        if session.stage == SessionStage::NewVideo {
            self.upload_script(&mut session).await?;
        }
        if session.stage == SessionStage::UploadedScript {
            self.prepare_sync(&mut session).await?;
        }
        if session.stage.is_synced() {
            self.apply_change(&mut session, event, change).await?;
        }
        Ok(())
    }

    /// `NewVideo → UploadingScript → UploadedScript`, then a full clock-sync
    /// run. A missing script file leaves the session in `NewVideo` for the
    /// next event to retry.
    async fn upload_script(&self, session: &mut Session) -> Result<()> {
        match tokio::fs::try_exists(&session.script_path).await {
            Ok(true) => {}
            _ => {
                tracing::trace!(
                    script = %session.script_path.display(),
                    "no companion script on disk"
                );
                return Ok(());
            }
        }

        session.stage = SessionStage::UploadingScript;
        tracing::info!(script = %session.script_path.display(), "script upload starting");

        match self.relay.upload_script(&session.script_path).await {
            Ok(url) => {
                session.script_url = url;
                session.stage = SessionStage::UploadedScript;
                tracing::info!(url = %session.script_url, "script upload done");
            }
            Err(err) => {
                session.stage = SessionStage::NewVideo;
                return Err(err);
            }
        }

        // The averaged offset must be settled before any play command reads it.
        self.estimator
            .refine(self.relay.as_ref(), self.clock.as_ref(), &mut session.clock)
            .await
    }

    /// `UploadedScript → SyncStarting → {SyncStarted | NewVideo}`. A relay
    /// answer without a connected device reverts to `NewVideo` so the whole
    /// upload/prepare sequence retries on a later event.
    async fn prepare_sync(&self, session: &mut Session) -> Result<()> {
        session.stage = SessionStage::SyncStarting;
        tracing::info!(url = %session.script_url, "sync prepare starting");

        match self
            .relay
            .prepare_sync(&session.script_url, self.config.prepare_timeout)
            .await
        {
            Ok(true) => {
                session.stage = SessionStage::SyncStarted;
                tracing::info!("sync prepare done, device connected");
            }
            Ok(false) => {
                session.stage = SessionStage::NewVideo;
                tracing::info!("sync prepare found no connected device");
            }
            Err(err) => {
                session.stage = SessionStage::UploadedScript;
                return Err(err);
            }
        }
        Ok(())
    }

    /// `{SyncStarted, Paused} --Start--> Playing` and
    /// `Playing --Stop--> Paused`. Any other pair is a no-op: repeating an
    /// identical change issues no further relay call.
    async fn apply_change(
        &self,
        session: &mut Session,
        event: &PlaybackEvent,
        change: PlaybackChange,
    ) -> Result<()> {
        match change {
            PlaybackChange::Start if session.stage.can_start() => {
                let position_ms = event.position_ms();
                let server_time_ms = session.clock.server_now_ms(self.clock.now_ms());
                tracing::info!(position_ms, server_time_ms, "playback starting");

                self.relay
                    .set_play(true, Some(server_time_ms), Some(position_ms))
                    .await?;
                session.stage = SessionStage::Playing;
            }
            PlaybackChange::Stop if session.stage.is_playing() => {
                tracing::info!("playback stopping");
                self.relay.set_play(false, None, None).await?;
                session.stage = SessionStage::Paused;
            }
            _ => {}
        }
        Ok(())
    }
}

impl std::fmt::Debug for SyncManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncManager")
            .field("config", &self.config)
            .field("estimator", &self.estimator)
            .finish_non_exhaustive()
    }
}
