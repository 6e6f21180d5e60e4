//! Thin HTTP binding to the synchronization relay.
//!
//! Four endpoints: script upload, sync prepare, play/pause signaling, and
//! server time. The [`RelayApi`] trait is the seam between the session state
//! machine and the wire; [`HandyClient`] is the production implementation.

pub mod client;

#[cfg(test)]
mod tests;

pub use client::{HandyClient, RelayApi};
