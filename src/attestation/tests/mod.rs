//! Unit and service tests for the attestation scheduling engine.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

mod scheduler_tests;
mod support;
mod transfer_tests;
