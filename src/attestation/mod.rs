//! Attestation campaign lifecycle and scheduling engine.
//!
//! This module drives time-windowed compliance campaigns: reminder and
//! escalation notifications dispatched at most once per threshold crossing,
//! auto-close of expired campaigns, and the exactly-once promotion of
//! employee-declared draft assets into the canonical registry when an
//! attestation completes. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
