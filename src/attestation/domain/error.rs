//! Error types for attestation domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating domain attestation values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttestationDomainError {
    /// The email address is empty or structurally invalid.
    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    /// The campaign name is empty after trimming.
    #[error("campaign name must not be empty")]
    EmptyCampaignName,

    /// The campaign end date does not come after its start date.
    #[error("campaign end date must be after its start date")]
    EndDateBeforeStart,

    /// The invite token is empty after trimming.
    #[error("invite token must not be empty")]
    EmptyInviteToken,

    /// The draft asset serial number is empty after trimming.
    #[error("asset serial number must not be empty")]
    EmptySerialNumber,

    /// The requested record status transition is not permitted.
    #[error("invalid attestation record transition: {from} -> {to}")]
    InvalidRecordTransition {
        /// Status the record currently holds.
        from: &'static str,
        /// Status the caller attempted to move to.
        to: &'static str,
    },

    /// The campaign is already completed and cannot change again.
    #[error("campaign is already completed")]
    CampaignAlreadyCompleted,
}

/// Error returned while parsing campaign statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown campaign status: {0}")]
pub struct ParseCampaignStatusError(pub String);

/// Error returned while parsing attestation record statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown attestation record status: {0}")]
pub struct ParseRecordStatusError(pub String);

/// Error returned while parsing asset statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown asset status: {0}")]
pub struct ParseAssetStatusError(pub String);
