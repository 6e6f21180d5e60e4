//! Relay endpoint trait and the HTTP implementation

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, SyncError};
use crate::types::SettingsStore;
use crate::types::config::RELAY_BASE;

/// Path of the script upload endpoint, relative to the relay base
pub const UPLOAD_PATH: &str = "api/sync/upload";

/// Path prefix of the per-connection API, relative to the relay base
pub const API_PATH: &str = "api/v1/";

/// Operations offered by the synchronization relay.
///
/// Each is a single HTTP call returning a parsed success indicator plus
/// payload fields. A call fails if the HTTP layer reports a non-success
/// status or the body is not parseable as the expected structure.
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Upload a companion script; returns its location on the relay
    async fn upload_script(&self, script: &Path) -> Result<String>;

    /// Ask the relay to prepare playback of the uploaded script.
    ///
    /// Returns whether a device is connected.
    async fn prepare_sync(&self, script_url: &str, timeout: Duration) -> Result<bool>;

    /// Start or stop device playback.
    ///
    /// Time fields are carried only when starting.
    async fn set_play(
        &self,
        playing: bool,
        server_time_ms: Option<i64>,
        position_ms: Option<i64>,
    ) -> Result<()>;

    /// Query the relay's current time in epoch milliseconds
    async fn server_time(&self) -> Result<i64>;
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PrepareResponse {
    pub(crate) connected: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServerTimeResponse {
    #[serde(rename = "serverTime")]
    pub(crate) server_time: i64,
}

/// HTTP client for the handyfeeling synchronization relay.
///
/// The per-connection endpoint base is rebuilt on every call from the relay
/// base plus the connection key read from the settings store, so key changes
/// take effect on the next call.
pub struct HandyClient {
    http: reqwest::Client,
    relay_base: String,
    settings: Arc<SettingsStore>,
}

impl HandyClient {
    /// Create a client against the production relay
    #[must_use]
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self::with_relay_base(RELAY_BASE, settings)
    }

    /// Create a client against a custom relay base URL
    #[must_use]
    pub fn with_relay_base(relay_base: impl Into<String>, settings: Arc<SettingsStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            relay_base: normalize_base(relay_base.into()),
            settings,
        }
    }

    /// Build the per-connection endpoint URL for an operation
    pub(crate) async fn api_url(&self, operation: &str) -> String {
        let key = self.settings.connection_key().await;
        format!("{}{}{}/{}", self.relay_base, API_PATH, key, operation)
    }

    async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
        endpoint: &'static str,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|source| SyncError::MalformedResponse {
                endpoint,
                message: source.to_string(),
            })
    }
}

fn normalize_base(mut base: String) -> String {
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}

fn transport(endpoint: &'static str) -> impl FnOnce(reqwest::Error) -> SyncError {
    move |source| SyncError::Transport { endpoint, source }
}

#[async_trait]
impl RelayApi for HandyClient {
    async fn upload_script(&self, script: &Path) -> Result<String> {
        let bytes = tokio::fs::read(script)
            .await
            .map_err(|source| SyncError::ScriptRead {
                path: script.to_path_buf(),
                source,
            })?;
        let file_name = script
            .file_name()
            .map_or_else(|| "script".to_string(), |n| n.to_string_lossy().into_owned());

        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let url = format!("{}{}", self.relay_base, UPLOAD_PATH);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport("upload"))?;

        let body: UploadResponse = Self::parse(response, "upload").await?;
        if !body.success {
            return Err(SyncError::UploadRejected);
        }
        tracing::debug!(url = %body.url, "script uploaded");
        Ok(body.url)
    }

    async fn prepare_sync(&self, script_url: &str, timeout: Duration) -> Result<bool> {
        let url = self.api_url("syncPrepare").await;
        let timeout_ms = timeout.as_millis().to_string();
        let response = self
            .http
            .get(&url)
            .query(&[("url", script_url), ("timeout", timeout_ms.as_str())])
            .send()
            .await
            .map_err(transport("syncPrepare"))?;

        let body: PrepareResponse = Self::parse(response, "syncPrepare").await?;
        tracing::debug!(connected = body.connected, "sync prepare answered");
        Ok(body.connected)
    }

    async fn set_play(
        &self,
        playing: bool,
        server_time_ms: Option<i64>,
        position_ms: Option<i64>,
    ) -> Result<()> {
        let url = self.api_url("syncPlay").await;
        let mut query: Vec<(&str, String)> = vec![("play", playing.to_string())];
        if let Some(ms) = server_time_ms {
            query.push(("serverTime", ms.to_string()));
        }
        if let Some(ms) = position_ms {
            query.push(("time", ms.to_string()));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(transport("syncPlay"))?;

        // Ack fields are not validated beyond being well-formed JSON.
        let _ack: serde_json::Value = Self::parse(response, "syncPlay").await?;
        Ok(())
    }

    async fn server_time(&self) -> Result<i64> {
        let url = self.api_url("getServerTime").await;
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(transport("getServerTime"))?;

        let body: ServerTimeResponse = Self::parse(response, "getServerTime").await?;
        Ok(body.server_time)
    }
}

impl std::fmt::Debug for HandyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandyClient")
            .field("relay_base", &self.relay_base)
            .finish_non_exhaustive()
    }
}
