use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Base URL of the synchronization relay
pub const RELAY_BASE: &str = "https://www.handyfeeling.com/";

/// File extension of companion scripts, derived from the media path
pub const SCRIPT_EXTENSION: &str = "funscript";

/// Configuration for synchronization behavior
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the relay (default: `https://www.handyfeeling.com/`)
    pub relay_base: String,

    /// Timeout budget passed to the relay's prepare call (default: 30 seconds)
    pub prepare_timeout: Duration,

    /// Number of round-trip samples per clock-sync run (default: 30)
    pub sync_rounds: u32,

    /// Extension of the companion script file (default: `funscript`)
    pub script_extension: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            relay_base: RELAY_BASE.to_string(),
            prepare_timeout: Duration::from_secs(30),
            sync_rounds: 30,
            script_extension: SCRIPT_EXTENSION.to_string(),
        }
    }
}

impl SyncConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }
}

/// Builder for `SyncConfig`
#[derive(Debug, Clone, Default)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    /// Set the relay base URL
    #[must_use]
    pub fn relay_base(mut self, base: impl Into<String>) -> Self {
        self.config.relay_base = base.into();
        self
    }

    /// Set the prepare timeout budget
    #[must_use]
    pub fn prepare_timeout(mut self, timeout: Duration) -> Self {
        self.config.prepare_timeout = timeout;
        self
    }

    /// Set the number of clock-sync rounds
    #[must_use]
    pub fn sync_rounds(mut self, rounds: u32) -> Self {
        self.config.sync_rounds = rounds;
        self
    }

    /// Set the companion script extension
    #[must_use]
    pub fn script_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.script_extension = extension.into();
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> SyncConfig {
        self.config
    }
}

/// User-editable plugin settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Connection key identifying the paired device on the relay
    #[serde(default)]
    pub connection_key: String,
}

/// Shared settings store.
///
/// The connection key is read from here on every outbound relay call, so a
/// key changed through the host's configuration UI takes effect on the next
/// call without reconnecting.
#[derive(Debug, Default)]
pub struct SettingsStore {
    inner: RwLock<SyncSettings>,
}

impl SettingsStore {
    /// Create a store with the given settings
    #[must_use]
    pub fn new(settings: SyncSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    /// Create a store with the given connection key
    #[must_use]
    pub fn with_connection_key(key: impl Into<String>) -> Self {
        Self::new(SyncSettings {
            connection_key: key.into(),
        })
    }

    /// Get a snapshot of the current settings
    pub async fn get(&self) -> SyncSettings {
        self.inner.read().await.clone()
    }

    /// Read the current connection key
    pub async fn connection_key(&self) -> String {
        self.inner.read().await.connection_key.clone()
    }

    /// Replace the connection key
    pub async fn set_connection_key(&self, key: impl Into<String>) {
        self.inner.write().await.connection_key = key.into();
    }

    /// Replace the settings wholesale
    pub async fn replace(&self, settings: SyncSettings) {
        *self.inner.write().await = settings;
    }
}
