use std::sync::Arc;

use super::client::{HandyClient, PrepareResponse, ServerTimeResponse, UploadResponse};
use crate::types::SettingsStore;

// ===== Response parsing =====

#[test]
fn test_upload_response_parse() {
    let body: UploadResponse =
        serde_json::from_str(r#"{"success": true, "url": "https://relay.test/s/movie.funscript"}"#)
            .unwrap();
    assert!(body.success);
    assert_eq!(body.url, "https://relay.test/s/movie.funscript");
}

#[test]
fn test_upload_response_rejected_without_url() {
    let body: UploadResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
    assert!(!body.success);
    assert_eq!(body.url, "");
}

#[test]
fn test_prepare_response_parse() {
    let connected: PrepareResponse = serde_json::from_str(r#"{"connected": true}"#).unwrap();
    assert!(connected.connected);

    let absent: PrepareResponse = serde_json::from_str(r#"{"connected": false}"#).unwrap();
    assert!(!absent.connected);
}

#[test]
fn test_prepare_response_requires_connected_field() {
    assert!(serde_json::from_str::<PrepareResponse>("{}").is_err());
}

#[test]
fn test_server_time_response_parse() {
    let body: ServerTimeResponse =
        serde_json::from_str(r#"{"serverTime": 1724400000123}"#).unwrap();
    assert_eq!(body.server_time, 1_724_400_000_123);
}

// ===== Endpoint construction =====

#[tokio::test]
async fn test_api_url_includes_connection_key() {
    let settings = Arc::new(SettingsStore::with_connection_key("abc123"));
    let client = HandyClient::with_relay_base("https://relay.test/", settings);
    assert_eq!(
        client.api_url("syncPrepare").await,
        "https://relay.test/api/v1/abc123/syncPrepare"
    );
}

#[tokio::test]
async fn test_api_url_normalizes_missing_slash() {
    let settings = Arc::new(SettingsStore::with_connection_key("k"));
    let client = HandyClient::with_relay_base("https://relay.test", settings);
    assert_eq!(
        client.api_url("getServerTime").await,
        "https://relay.test/api/v1/k/getServerTime"
    );
}

#[tokio::test]
async fn test_api_url_reads_key_per_call() {
    let settings = Arc::new(SettingsStore::with_connection_key("before"));
    let client = HandyClient::with_relay_base("https://relay.test/", Arc::clone(&settings));
    assert_eq!(
        client.api_url("syncPlay").await,
        "https://relay.test/api/v1/before/syncPlay"
    );

    settings.set_connection_key("after").await;
    assert_eq!(
        client.api_url("syncPlay").await,
        "https://relay.test/api/v1/after/syncPlay"
    );
}
