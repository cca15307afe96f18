//! Adapter implementations of the attestation ports.
//!
//! The production database and email transport adapters live with the host
//! application; this crate ships the in-memory registry, the recording
//! dispatcher, and a settable clock so the engine can be exercised without
//! infrastructure.

pub mod clock;
pub mod memory;

pub use clock::FixedClock;
pub use memory::{InMemoryRegistry, RecordingDispatcher};
