//! Clock synchronization between the local host and the relay.
//!
//! Device motion timing depends on translating local playback time into
//! relay time. [`ClockOffset`] holds a session's running offset estimate;
//! [`ClockSyncEstimator`] refines it by sampling the relay clock over many
//! round trips and averaging, which suppresses jitter in any single network
//! measurement. The midpoint assumption (one-way latency ≈ half the round
//! trip) is the standard NTP-style estimator for symmetric paths.

pub mod clock;
pub mod estimator;

#[cfg(test)]
mod tests;

pub use clock::{ClockOffset, LocalClock, SystemClock};
pub use estimator::ClockSyncEstimator;
