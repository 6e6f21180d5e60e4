//! Scripted in-memory stand-ins for the relay and the local clock.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, SyncError};
use crate::relay::RelayApi;
use crate::timesync::LocalClock;

/// Script URL returned by [`MockRelay`] uploads when none is scripted
pub const DEFAULT_SCRIPT_URL: &str = "https://relay.test/scripts/uploaded.funscript";

/// One recorded relay invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayCall {
    /// `upload_script` was called
    Upload {
        /// The script path passed in
        script: PathBuf,
    },
    /// `prepare_sync` was called
    Prepare {
        /// The script URL passed in
        url: String,
        /// The timeout budget passed in
        timeout: Duration,
    },
    /// `set_play` was called
    Play {
        /// The play flag passed in
        playing: bool,
        /// The server time carried, if any
        server_time_ms: Option<i64>,
        /// The video position carried, if any
        position_ms: Option<i64>,
    },
    /// `server_time` was called
    ServerTime,
}

#[derive(Default)]
struct MockState {
    calls: Vec<RelayCall>,
    upload: VecDeque<Result<String>>,
    prepare: VecDeque<Result<bool>>,
    play: VecDeque<Result<()>>,
    server_time: VecDeque<Result<i64>>,
}

/// In-memory [`RelayApi`] double.
///
/// Replies are scripted per endpoint with the `push_*` methods and consumed
/// in order; when a queue runs dry the call succeeds with a default (upload
/// returns [`DEFAULT_SCRIPT_URL`], prepare reports connected, play acks,
/// server time reads `0`). Every invocation is recorded.
#[derive(Default)]
pub struct MockRelay {
    state: Mutex<MockState>,
}

impl MockRelay {
    /// Create a relay double with empty reply queues
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next upload reply
    pub fn push_upload(&self, reply: Result<String>) {
        self.lock().upload.push_back(reply);
    }

    /// Script the next prepare reply
    pub fn push_prepare(&self, reply: Result<bool>) {
        self.lock().prepare.push_back(reply);
    }

    /// Script the next play reply
    pub fn push_play(&self, reply: Result<()>) {
        self.lock().play.push_back(reply);
    }

    /// Script the next server-time reply
    pub fn push_server_time(&self, reply: Result<i64>) {
        self.lock().server_time.push_back(reply);
    }

    /// Script a sequence of server-time replies
    pub fn push_server_times(&self, times: impl IntoIterator<Item = i64>) {
        let mut state = self.lock();
        for time in times {
            state.server_time.push_back(Ok(time));
        }
    }

    /// A representative transport failure for scripting error replies
    #[must_use]
    pub fn failure(endpoint: &'static str) -> SyncError {
        SyncError::UnexpectedStatus {
            endpoint,
            status: 500,
        }
    }

    /// All recorded invocations, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RelayCall> {
        self.lock().calls.clone()
    }

    /// Number of recorded upload calls
    #[must_use]
    pub fn upload_count(&self) -> usize {
        self.count(|call| matches!(call, RelayCall::Upload { .. }))
    }

    /// Number of recorded prepare calls
    #[must_use]
    pub fn prepare_count(&self) -> usize {
        self.count(|call| matches!(call, RelayCall::Prepare { .. }))
    }

    /// Number of recorded play calls
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.count(|call| matches!(call, RelayCall::Play { .. }))
    }

    /// Number of recorded server-time calls
    #[must_use]
    pub fn server_time_count(&self) -> usize {
        self.count(|call| matches!(call, RelayCall::ServerTime))
    }

    fn count(&self, matching: impl Fn(&RelayCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| matching(call)).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock relay state poisoned")
    }
}

#[async_trait]
impl RelayApi for MockRelay {
    async fn upload_script(&self, script: &Path) -> Result<String> {
        let mut state = self.lock();
        state.calls.push(RelayCall::Upload {
            script: script.to_path_buf(),
        });
        state
            .upload
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_SCRIPT_URL.to_string()))
    }

    async fn prepare_sync(&self, script_url: &str, timeout: Duration) -> Result<bool> {
        let mut state = self.lock();
        state.calls.push(RelayCall::Prepare {
            url: script_url.to_string(),
            timeout,
        });
        state.prepare.pop_front().unwrap_or(Ok(true))
    }

    async fn set_play(
        &self,
        playing: bool,
        server_time_ms: Option<i64>,
        position_ms: Option<i64>,
    ) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(RelayCall::Play {
            playing,
            server_time_ms,
            position_ms,
        });
        state.play.pop_front().unwrap_or(Ok(()))
    }

    async fn server_time(&self) -> Result<i64> {
        let mut state = self.lock();
        state.calls.push(RelayCall::ServerTime);
        state.server_time.pop_front().unwrap_or(Ok(0))
    }
}

/// Scripted [`LocalClock`].
///
/// Returns the queued times in order; once the queue is exhausted, repeats
/// the last value returned (or the fixed fallback).
pub struct FakeClock {
    times: Mutex<VecDeque<i64>>,
    fallback: Mutex<i64>,
}

impl FakeClock {
    /// Create a clock that plays back the given times in order
    #[must_use]
    pub fn new(times: impl IntoIterator<Item = i64>) -> Self {
        Self {
            times: Mutex::new(times.into_iter().collect()),
            fallback: Mutex::new(0),
        }
    }

    /// Create a clock frozen at one instant
    #[must_use]
    pub fn fixed(now_ms: i64) -> Self {
        Self {
            times: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(now_ms),
        }
    }
}

impl LocalClock for FakeClock {
    fn now_ms(&self) -> i64 {
        let mut times = self.times.lock().expect("fake clock poisoned");
        match times.pop_front() {
            Some(time) => {
                *self.fallback.lock().expect("fake clock poisoned") = time;
                time
            }
            None => *self.fallback.lock().expect("fake clock poisoned"),
        }
    }
}
