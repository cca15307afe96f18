//! Attestation record aggregate and its status state machine.

use super::{AttestationDomainError, CampaignId, ParseRecordStatusError, RecordId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Attestation record lifecycle state.
///
/// Transitions are monotonic: a record never moves backwards, and
/// `Completed` is terminal. Reminder and escalation timestamps are
/// independent side-channels, not states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// The user has not yet opened their attestation.
    Pending,
    /// The user has started but not finished attesting.
    InProgress,
    /// The attestation has been submitted. Terminal.
    Completed,
}

impl RecordStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Reports whether moving from `self` to `target` is a legal transition.
    ///
    /// `Pending -> Completed` is permitted so a single request may submit and
    /// finish an attestation in one step.
    #[must_use]
    pub const fn can_transition(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::InProgress)
                | (Self::Pending, Self::Completed)
                | (Self::InProgress, Self::Completed)
        )
    }
}

impl TryFrom<&str> for RecordStatus {
    type Error = ParseRecordStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseRecordStatusError(value.to_owned())),
        }
    }
}

/// Per-user, per-campaign attestation progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    id: RecordId,
    campaign_id: CampaignId,
    user_id: UserId,
    status: RecordStatus,
    reminder_sent_at: Option<DateTime<Utc>>,
    escalation_sent_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted attestation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRecordData {
    /// Persisted record identifier.
    pub id: RecordId,
    /// Persisted owning campaign.
    pub campaign_id: CampaignId,
    /// Persisted attesting user.
    pub user_id: UserId,
    /// Persisted lifecycle status.
    pub status: RecordStatus,
    /// Persisted reminder timestamp, if a reminder was sent.
    pub reminder_sent_at: Option<DateTime<Utc>>,
    /// Persisted escalation timestamp, if an escalation was sent.
    pub escalation_sent_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if the record finished.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl AttestationRecord {
    /// Creates a fresh pending record for a campaign participant.
    #[must_use]
    pub fn new(campaign_id: CampaignId, user_id: UserId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: RecordId::new(),
            campaign_id,
            user_id,
            status: RecordStatus::Pending,
            reminder_sent_at: None,
            escalation_sent_at: None,
            completed_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRecordData) -> Self {
        Self {
            id: data.id,
            campaign_id: data.campaign_id,
            user_id: data.user_id,
            status: data.status,
            reminder_sent_at: data.reminder_sent_at,
            escalation_sent_at: data.escalation_sent_at,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the owning campaign identifier.
    #[must_use]
    pub const fn campaign_id(&self) -> CampaignId {
        self.campaign_id
    }

    /// Returns the attesting user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> RecordStatus {
        self.status
    }

    /// Returns the reminder timestamp, if a reminder was sent.
    #[must_use]
    pub const fn reminder_sent_at(&self) -> Option<DateTime<Utc>> {
        self.reminder_sent_at
    }

    /// Returns the escalation timestamp, if an escalation was sent.
    #[must_use]
    pub const fn escalation_sent_at(&self) -> Option<DateTime<Utc>> {
        self.escalation_sent_at
    }

    /// Returns the completion timestamp, if the record finished.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reports whether the record still awaits a reminder.
    #[must_use]
    pub const fn is_reminder_eligible(&self) -> bool {
        matches!(self.status, RecordStatus::Pending) && self.reminder_sent_at.is_none()
    }

    /// Reports whether the record still awaits an escalation.
    #[must_use]
    pub const fn is_escalation_eligible(&self) -> bool {
        matches!(self.status, RecordStatus::Pending) && self.escalation_sent_at.is_none()
    }

    /// Moves the record from pending to in-progress.
    ///
    /// # Errors
    ///
    /// Returns [`AttestationDomainError::InvalidRecordTransition`] when the
    /// record is not pending.
    pub fn begin(&mut self, at: DateTime<Utc>) -> Result<(), AttestationDomainError> {
        self.transition(RecordStatus::InProgress, at)
    }

    /// Moves the record to its terminal completed state.
    ///
    /// # Errors
    ///
    /// Returns [`AttestationDomainError::InvalidRecordTransition`] when the
    /// record is already completed.
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), AttestationDomainError> {
        self.transition(RecordStatus::Completed, at)?;
        self.completed_at = Some(at);
        Ok(())
    }

    /// Conditionally claims the reminder side-channel.
    ///
    /// Sets `reminder_sent_at` only when it is still unset and reports
    /// whether this caller won the claim. Mirrors the conditional update the
    /// store contract requires.
    pub fn claim_reminder(&mut self, at: DateTime<Utc>) -> bool {
        claim_slot(&mut self.reminder_sent_at, at)
    }

    /// Releases a previously won reminder claim after a failed dispatch.
    pub const fn release_reminder(&mut self) {
        self.reminder_sent_at = None;
    }

    /// Conditionally claims the escalation side-channel.
    pub fn claim_escalation(&mut self, at: DateTime<Utc>) -> bool {
        claim_slot(&mut self.escalation_sent_at, at)
    }

    /// Releases a previously won escalation claim after a failed dispatch.
    pub const fn release_escalation(&mut self) {
        self.escalation_sent_at = None;
    }

    fn transition(
        &mut self,
        target: RecordStatus,
        at: DateTime<Utc>,
    ) -> Result<(), AttestationDomainError> {
        if !self.status.can_transition(target) {
            return Err(AttestationDomainError::InvalidRecordTransition {
                from: self.status.as_str(),
                to: target.as_str(),
            });
        }
        self.status = target;
        self.updated_at = at;
        Ok(())
    }
}

/// Sets a timestamp slot if empty, reporting whether the caller won.
pub(crate) fn claim_slot(slot: &mut Option<DateTime<Utc>>, at: DateTime<Utc>) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(at);
    true
}
