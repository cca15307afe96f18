//! Steward: IT-asset registration and compliance engine.
//!
//! This crate provides the core of an asset compliance application: the
//! attestation campaign lifecycle and scheduling engine. It drives
//! time-windowed campaigns, sends reminder and escalation notifications at
//! most once per threshold crossing, auto-closes expired campaigns, and
//! atomically promotes employee-declared draft assets into the authoritative
//! registry when an attestation completes.
//!
//! # Architecture
//!
//! Steward follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for stores and email dispatch
//! - **Adapters**: Concrete implementations of ports (in-memory, clock)
//!
//! The HTTP layer, persistence mechanics, and mail transport live with the
//! host application and plug into the ports defined here.
//!
//! # Modules
//!
//! - [`attestation`]: Campaign scheduling, notification passes, and
//!   draft-asset transfer

pub mod attestation;
