//! Error types for relay and script failures.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while synchronizing playback with the relay
#[derive(Debug, Error)]
pub enum SyncError {
    /// The HTTP layer failed before a response was received
    #[error("relay request to {endpoint} failed")]
    Transport {
        /// The relay endpoint that was being called
        endpoint: &'static str,
        /// The underlying HTTP error
        #[source]
        source: reqwest::Error,
    },

    /// The relay answered with a non-success HTTP status
    #[error("relay returned status {status} from {endpoint}")]
    UnexpectedStatus {
        /// The relay endpoint that was being called
        endpoint: &'static str,
        /// The HTTP status code
        status: u16,
    },

    /// The response body could not be parsed as the expected structure
    #[error("malformed response from {endpoint}: {message}")]
    MalformedResponse {
        /// The relay endpoint that was being called
        endpoint: &'static str,
        /// Description of the parse failure
        message: String,
    },

    /// The relay accepted the upload request but reported `success: false`
    #[error("relay rejected script upload")]
    UploadRejected,

    /// The companion script could not be read from disk
    #[error("failed to read script {path}")]
    ScriptRead {
        /// Path of the script that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    /// Check if this error is recoverable by the next playback event
    /// re-driving the same state checks.
    ///
    /// All relay failures are scoped to one session's handling of one
    /// event; nothing here is fatal to the host process.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::UnexpectedStatus { .. }
                | Self::MalformedResponse { .. }
                | Self::UploadRejected
        )
    }

    /// The relay endpoint involved, if the error came from a relay call
    #[must_use]
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::UnexpectedStatus { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. } => Some(endpoint),
            Self::UploadRejected | Self::ScriptRead { .. } => None,
        }
    }
}

/// Result type alias for synchronization operations
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::UnexpectedStatus {
            endpoint: "syncPrepare",
            status: 502,
        };
        assert_eq!(err.to_string(), "relay returned status 502 from syncPrepare");
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(
            SyncError::UnexpectedStatus {
                endpoint: "syncPlay",
                status: 500,
            }
            .is_recoverable()
        );
        assert!(SyncError::UploadRejected.is_recoverable());

        let read_err = SyncError::ScriptRead {
            path: PathBuf::from("/media/movie.funscript"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!read_err.is_recoverable());
    }

    #[test]
    fn test_error_endpoint() {
        let err = SyncError::MalformedResponse {
            endpoint: "getServerTime",
            message: "expected number".to_string(),
        };
        assert_eq!(err.endpoint(), Some("getServerTime"));
        assert_eq!(SyncError::UploadRejected.endpoint(), None);
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncError>();
    }
}
