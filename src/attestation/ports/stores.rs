//! Store ports for campaign, record, invite, asset, and user persistence.
//!
//! The scheduling engine never touches persistence directly; these contracts
//! are implemented by the application's database layer. Two requirements are
//! first-class here rather than implementation details:
//!
//! - `claim_reminder` / `claim_escalation` are atomic conditional updates
//!   (set the sent-at timestamp only while it is still unset, report whether
//!   the caller won). Concurrent or duplicate scheduler ticks may race on the
//!   same row and at most one wins.
//! - [`RecordStore::complete_with_assets`] commits the asset insertions and
//!   the record completion as one unit or not at all.

use crate::attestation::domain::{
    Asset, AttestationRecord, Campaign, CampaignId, DraftAsset, EmailAddress, InviteId, NewAsset,
    PendingInvite, RecordId, User, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The campaign does not exist.
    #[error("campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    /// The attestation record does not exist.
    #[error("attestation record not found: {0}")]
    RecordNotFound(RecordId),

    /// The pending invite does not exist.
    #[error("pending invite not found: {0}")]
    InviteNotFound(InviteId),

    /// An asset with the same serial number already exists.
    #[error("duplicate asset serial number: {0}")]
    DuplicateSerialNumber(String),

    /// An asset with the same inventory tag already exists.
    #[error("duplicate asset tag: {0}")]
    DuplicateAssetTag(String),

    /// The record cannot move to completed from its current status.
    #[error("attestation record {id} cannot complete from status {status}")]
    RecordNotCompletable {
        /// Record the completion was attempted on.
        id: RecordId,
        /// Status the record currently holds.
        status: &'static str,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence-layer error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}

/// Outcome of a transactional record completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The record was completed and its drafts were transferred.
    Completed(Vec<Asset>),
    /// The record had already completed; nothing was written.
    AlreadyCompleted,
}

/// Campaign persistence contract.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    /// Returns every campaign with active status.
    async fn list_active(&self) -> StoreResult<Vec<Campaign>>;

    /// Conditionally transitions a campaign to completed.
    ///
    /// Succeeds only while the campaign is still active; returns whether this
    /// caller performed the transition. Closing an already-completed campaign
    /// is a no-op reported as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CampaignNotFound`] when the campaign does not
    /// exist.
    async fn close(&self, id: CampaignId, at: DateTime<Utc>) -> StoreResult<bool>;
}

/// Attestation record persistence contract.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every record belonging to the campaign.
    async fn list_by_campaign(&self, campaign_id: CampaignId)
    -> StoreResult<Vec<AttestationRecord>>;

    /// Returns the record, when it exists.
    async fn get(&self, id: RecordId) -> StoreResult<Option<AttestationRecord>>;

    /// Atomically claims the record's reminder side-channel.
    ///
    /// Sets `reminder_sent_at` to `at` only while it is still unset and
    /// reports whether this caller won the claim.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RecordNotFound`] when the record does not exist.
    async fn claim_reminder(&self, id: RecordId, at: DateTime<Utc>) -> StoreResult<bool>;

    /// Clears a won reminder claim after a failed dispatch, restoring
    /// next-tick retry eligibility.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RecordNotFound`] when the record does not exist.
    async fn release_reminder(&self, id: RecordId) -> StoreResult<()>;

    /// Atomically claims the record's escalation side-channel.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RecordNotFound`] when the record does not exist.
    async fn claim_escalation(&self, id: RecordId, at: DateTime<Utc>) -> StoreResult<bool>;

    /// Clears a won escalation claim after a failed dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RecordNotFound`] when the record does not exist.
    async fn release_escalation(&self, id: RecordId) -> StoreResult<()>;

    /// Transactionally inserts the given assets and marks the record
    /// completed.
    ///
    /// All insertions, the status flip, and the removal of the record's
    /// drafts commit as one unit or not at all.
    /// A record that already completed yields
    /// [`CompletionOutcome::AlreadyCompleted`] without writing anything, so
    /// re-invocation never duplicates transferred assets.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RecordNotFound`] when the record does not exist,
    /// [`StoreError::DuplicateSerialNumber`] / [`StoreError::DuplicateAssetTag`]
    /// when an insertion would violate registry uniqueness (nothing is
    /// written), and [`StoreError::RecordNotCompletable`] when the status
    /// transition is not legal.
    async fn complete_with_assets(
        &self,
        id: RecordId,
        assets: Vec<NewAsset>,
        at: DateTime<Utc>,
    ) -> StoreResult<CompletionOutcome>;
}

/// Pending invite persistence contract.
#[async_trait]
pub trait PendingInviteStore: Send + Sync {
    /// Returns every invite belonging to the campaign.
    async fn list_by_campaign(&self, campaign_id: CampaignId) -> StoreResult<Vec<PendingInvite>>;

    /// Atomically claims the invite's reminder side-channel.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InviteNotFound`] when the invite does not exist.
    async fn claim_reminder(&self, id: InviteId, at: DateTime<Utc>) -> StoreResult<bool>;

    /// Clears a won reminder claim after a failed dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InviteNotFound`] when the invite does not exist.
    async fn release_reminder(&self, id: InviteId) -> StoreResult<()>;

    /// Atomically claims the invite's escalation side-channel.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InviteNotFound`] when the invite does not exist.
    async fn claim_escalation(&self, id: InviteId, at: DateTime<Utc>) -> StoreResult<bool>;

    /// Clears a won escalation claim after a failed dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InviteNotFound`] when the invite does not exist.
    async fn release_escalation(&self, id: InviteId) -> StoreResult<()>;
}

/// Draft asset persistence contract.
#[async_trait]
pub trait DraftAssetStore: Send + Sync {
    /// Returns every draft declared on the attestation record.
    async fn list_by_record(&self, record_id: RecordId) -> StoreResult<Vec<DraftAsset>>;
}

/// Canonical asset registry contract.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Returns every asset owned by the given employee email, oldest first.
    ///
    /// Manager inference takes the first asset carrying a manager, so the
    /// ordering must be stable across calls.
    async fn list_by_employee_email(&self, email: &EmailAddress) -> StoreResult<Vec<Asset>>;

    /// Inserts a canonical asset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateSerialNumber`] or
    /// [`StoreError::DuplicateAssetTag`] on registry uniqueness violations.
    async fn create(&self, row: NewAsset, at: DateTime<Utc>) -> StoreResult<Asset>;
}

/// User directory contract.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the user, when the account exists.
    async fn get(&self, id: UserId) -> StoreResult<Option<User>>;
}
