//! Attestation completion and draft-asset transfer.
//!
//! Invoked from the attestation-submission request path, not from the
//! scheduler tick: completing a record promotes every draft the employee
//! declared into the canonical registry, atomically with the record's status
//! flip.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info};

use crate::attestation::{
    domain::{AssetOwner, RecordId, RecordStatus, UserId},
    ports::{CompletionOutcome, DraftAssetStore, RecordStore, StoreError, UserStore},
};

/// Result type for attestation completion.
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Errors surfaced to the attestation-submission caller.
///
/// A failed transfer leaves the record incomplete and every draft in place;
/// the caller must surface the error to the end user rather than silently
/// dropping an asset.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The attestation record does not exist.
    #[error("attestation record not found: {0}")]
    RecordNotFound(RecordId),

    /// The attesting user's account could not be resolved.
    #[error("attesting user not found: {0}")]
    UserNotFound(UserId),

    /// The store rejected the transfer; includes registry uniqueness
    /// violations on serial number or asset tag.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Promotes draft assets into the registry when an attestation completes.
#[derive(Clone)]
pub struct AttestationCompletionService<R, D, U, K>
where
    R: RecordStore,
    D: DraftAssetStore,
    U: UserStore,
    K: Clock + Send + Sync,
{
    records: Arc<R>,
    drafts: Arc<D>,
    users: Arc<U>,
    clock: Arc<K>,
}

impl<R, D, U, K> AttestationCompletionService<R, D, U, K>
where
    R: RecordStore,
    D: DraftAssetStore,
    U: UserStore,
    K: Clock + Send + Sync,
{
    /// Creates a completion service.
    #[must_use]
    pub const fn new(records: Arc<R>, drafts: Arc<D>, users: Arc<U>, clock: Arc<K>) -> Self {
        Self {
            records,
            drafts,
            users,
            clock,
        }
    }

    /// Completes the record and transfers its drafts, exactly once.
    ///
    /// A record that already completed returns
    /// [`CompletionOutcome::AlreadyCompleted`] without writing anything, so
    /// retries and duplicate submissions are safe.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::RecordNotFound`] /
    /// [`CompletionError::UserNotFound`] when the record or its user cannot
    /// be resolved, and [`CompletionError::Store`] when the transactional
    /// transfer aborts; no partial state is left behind in that case.
    pub async fn complete(&self, record_id: RecordId) -> CompletionResult<CompletionOutcome> {
        let record = self
            .records
            .get(record_id)
            .await?
            .ok_or(CompletionError::RecordNotFound(record_id))?;

        if record.status() == RecordStatus::Completed {
            debug!(record = %record_id, "attestation already completed");
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        let user = self
            .users
            .get(record.user_id())
            .await?
            .ok_or(CompletionError::UserNotFound(record.user_id()))?;

        let drafts = self.drafts.list_by_record(record_id).await?;
        let owner = AssetOwner::from_user(&user);
        let rows = drafts
            .iter()
            .map(|draft| draft.promote(owner.clone()))
            .collect();

        let outcome = self
            .records
            .complete_with_assets(record_id, rows, self.clock.utc())
            .await?;

        match &outcome {
            CompletionOutcome::Completed(assets) => {
                info!(
                    record = %record_id,
                    employee = %owner.email,
                    transferred = assets.len(),
                    "attestation completed"
                );
            }
            CompletionOutcome::AlreadyCompleted => {
                debug!(record = %record_id, "attestation completed concurrently");
            }
        }

        Ok(outcome)
    }
}
