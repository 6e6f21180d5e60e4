//! Path-keyed session storage

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::Session;

/// A registry entry: the session behind its serialization lock.
///
/// The mutex is held across every suspension point while handling one event,
/// so two events for the same path can never interleave a transition.
pub type SharedSession = Arc<Mutex<Session>>;

/// Mapping from media identity to session state.
///
/// Supports concurrent get-or-create across sessions; it only vends
/// sessions, callers mutate them in place under the per-session lock.
/// Entries live for the lifetime of the registry, one per distinct path
/// ever played.
#[derive(Debug)]
pub struct SessionRegistry {
    script_extension: String,
    sessions: RwLock<HashMap<PathBuf, SharedSession>>,
}

impl SessionRegistry {
    /// Create an empty registry deriving script paths with the given extension
    #[must_use]
    pub fn new(script_extension: impl Into<String>) -> Self {
        Self {
            script_extension: script_extension.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Return the session for `media_path`, creating it on first observation
    pub async fn get_or_create(&self, media_path: &Path) -> SharedSession {
        if let Some(existing) = self.sessions.read().await.get(media_path) {
            return Arc::clone(existing);
        }

        let mut sessions = self.sessions.write().await;
        // Re-check under the write lock; another event may have won the race.
        let entry = sessions.entry(media_path.to_path_buf()).or_insert_with(|| {
            tracing::debug!(media = %media_path.display(), "creating session");
            Arc::new(Mutex::new(Session::for_media(
                media_path,
                &self.script_extension,
            )))
        });
        Arc::clone(entry)
    }

    /// Look up the session for `media_path` without creating one
    pub async fn get(&self, media_path: &Path) -> Option<SharedSession> {
        self.sessions.read().await.get(media_path).map(Arc::clone)
    }

    /// Number of sessions ever created
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Check whether no session exists yet
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
