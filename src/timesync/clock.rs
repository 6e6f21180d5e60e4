//! Local clock source and the running offset estimate

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of local wall-clock time in epoch milliseconds.
///
/// Injected into the estimator and the state machine so offset math is
/// testable against synthetic time sequences.
pub trait LocalClock: Send + Sync {
    /// Current local time in milliseconds since the Unix epoch
    fn now_ms(&self) -> i64;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl LocalClock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}

/// Running estimate of the offset between the local and relay clocks.
///
/// The first sample captures an initial offset; every later sample
/// contributes to a simple arithmetic mean of the residual offsets. Fields
/// are monotonically updated and reset only by session recreation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockOffset {
    samples: u32,
    aggregated_ms: i64,
    average_ms: i64,
    initial_ms: i64,
}

impl ClockOffset {
    /// Fold one time-sync response into the estimate.
    ///
    /// `estimated_server_now_ms` is the relay's reported time plus half the
    /// measured round-trip delay; `receive_ms` is the local time the reply
    /// arrived. The first sample only captures the initial offset; sample
    /// `i ≥ 1` updates the running average to the mean of all `i` non-initial
    /// residuals.
    pub fn record(&mut self, estimated_server_now_ms: i64, receive_ms: i64) {
        if self.samples == 0 {
            self.initial_ms = estimated_server_now_ms - receive_ms;
            tracing::debug!(initial_ms = self.initial_ms, "captured initial clock offset");
        } else {
            let offset = estimated_server_now_ms - receive_ms - self.initial_ms;
            self.aggregated_ms += offset;
            self.average_ms = self.aggregated_ms / i64::from(self.samples);
            tracing::trace!(
                offset_ms = offset,
                average_ms = self.average_ms,
                sample = self.samples,
                "refined clock offset"
            );
        }
        self.samples += 1;
    }

    /// Translate a local time into the relay's clock
    #[must_use]
    pub fn server_now_ms(&self, local_now_ms: i64) -> i64 {
        local_now_ms + self.average_ms + self.initial_ms
    }

    /// Number of time-sync responses processed, including the initial one
    #[must_use]
    pub fn sample_count(&self) -> u32 {
        self.samples
    }

    /// Current averaged offset in milliseconds
    #[must_use]
    pub fn average_ms(&self) -> i64 {
        self.average_ms
    }

    /// Offset captured from the first sample
    #[must_use]
    pub fn initial_ms(&self) -> i64 {
        self.initial_ms
    }

    /// Sum of all non-initial offset samples
    #[must_use]
    pub fn aggregated_ms(&self) -> i64 {
        self.aggregated_ms
    }
}
