//! Round-trip sampling loop against the relay clock

use crate::error::Result;
use crate::relay::RelayApi;

use super::clock::{ClockOffset, LocalClock};

/// Refines a session's clock offset by round-trip sampling.
///
/// One `refine` run issues server-time queries until the offset has
/// accumulated the configured number of samples, one awaited round trip at a
/// time. The loop is bounded; there is no recursive self-scheduling.
#[derive(Debug, Clone, Copy)]
pub struct ClockSyncEstimator {
    rounds: u32,
}

impl ClockSyncEstimator {
    /// Samples collected per refinement run by default
    pub const DEFAULT_ROUNDS: u32 = 30;

    /// Create an estimator collecting the given number of samples
    #[must_use]
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
        }
    }

    /// Number of samples a full run collects
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Run rounds until `offset` holds the configured sample count.
    ///
    /// Each round records the local send time, queries the relay clock, and
    /// records the local receive time; the relay's reported time plus half
    /// the round-trip delay is folded into the offset estimate. A failed
    /// query aborts the run; partially accumulated samples remain as the
    /// best-effort current average.
    ///
    /// # Errors
    ///
    /// Returns the relay error of the failed round, if any.
    pub async fn refine(
        &self,
        relay: &dyn RelayApi,
        clock: &dyn LocalClock,
        offset: &mut ClockOffset,
    ) -> Result<()> {
        while offset.sample_count() < self.rounds {
            let send_ms = clock.now_ms();
            let server_ms = relay.server_time().await?;
            let receive_ms = clock.now_ms();

            let round_trip_ms = receive_ms - send_ms;
            let estimated_server_now_ms = server_ms + round_trip_ms / 2;
            offset.record(estimated_server_now_ms, receive_ms);
        }

        tracing::debug!(
            samples = offset.sample_count(),
            average_ms = offset.average_ms(),
            initial_ms = offset.initial_ms(),
            "server time sync done"
        );
        Ok(())
    }
}

impl Default for ClockSyncEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROUNDS)
    }
}
