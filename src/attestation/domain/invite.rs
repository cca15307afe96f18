//! Pending invite rows for asset owners who have not registered yet.

use super::record::claim_slot;
use super::{CampaignId, EmailAddress, InviteId, InviteToken};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Tracking row for an asset owner without an account.
///
/// Drives pre-registration reminders and escalations; becomes irrelevant once
/// the owner registers and `registered_at` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInvite {
    id: InviteId,
    campaign_id: CampaignId,
    employee_email: EmailAddress,
    employee_first_name: String,
    employee_last_name: String,
    invite_token: InviteToken,
    registered_at: Option<DateTime<Utc>>,
    reminder_sent_at: Option<DateTime<Utc>>,
    escalation_sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted pending invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInviteData {
    /// Persisted invite identifier.
    pub id: InviteId,
    /// Persisted owning campaign.
    pub campaign_id: CampaignId,
    /// Persisted employee address.
    pub employee_email: EmailAddress,
    /// Persisted employee first name.
    pub employee_first_name: String,
    /// Persisted employee last name.
    pub employee_last_name: String,
    /// Persisted registration token.
    pub invite_token: InviteToken,
    /// Persisted registration timestamp, if the owner registered.
    pub registered_at: Option<DateTime<Utc>>,
    /// Persisted reminder timestamp, if a reminder was sent.
    pub reminder_sent_at: Option<DateTime<Utc>>,
    /// Persisted escalation timestamp, if an escalation was sent.
    pub escalation_sent_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PendingInvite {
    /// Creates a new invite with a freshly generated token.
    #[must_use]
    pub fn new(
        campaign_id: CampaignId,
        employee_email: EmailAddress,
        employee_first_name: impl Into<String>,
        employee_last_name: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: InviteId::new(),
            campaign_id,
            employee_email,
            employee_first_name: employee_first_name.into(),
            employee_last_name: employee_last_name.into(),
            invite_token: InviteToken::generate(),
            registered_at: None,
            reminder_sent_at: None,
            escalation_sent_at: None,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an invite from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedInviteData) -> Self {
        Self {
            id: data.id,
            campaign_id: data.campaign_id,
            employee_email: data.employee_email,
            employee_first_name: data.employee_first_name,
            employee_last_name: data.employee_last_name,
            invite_token: data.invite_token,
            registered_at: data.registered_at,
            reminder_sent_at: data.reminder_sent_at,
            escalation_sent_at: data.escalation_sent_at,
            created_at: data.created_at,
        }
    }

    /// Returns the invite identifier.
    #[must_use]
    pub const fn id(&self) -> InviteId {
        self.id
    }

    /// Returns the owning campaign identifier.
    #[must_use]
    pub const fn campaign_id(&self) -> CampaignId {
        self.campaign_id
    }

    /// Returns the employee address.
    #[must_use]
    pub const fn employee_email(&self) -> &EmailAddress {
        &self.employee_email
    }

    /// Returns the employee first name.
    #[must_use]
    pub fn employee_first_name(&self) -> &str {
        &self.employee_first_name
    }

    /// Returns the employee last name.
    #[must_use]
    pub fn employee_last_name(&self) -> &str {
        &self.employee_last_name
    }

    /// Returns the employee's display name.
    #[must_use]
    pub fn employee_full_name(&self) -> String {
        format!("{} {}", self.employee_first_name, self.employee_last_name)
    }

    /// Returns the registration token.
    #[must_use]
    pub const fn invite_token(&self) -> &InviteToken {
        &self.invite_token
    }

    /// Returns the registration timestamp, if the owner registered.
    #[must_use]
    pub const fn registered_at(&self) -> Option<DateTime<Utc>> {
        self.registered_at
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

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reports whether the invited owner has registered an account.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.registered_at.is_some()
    }

    /// Reports whether the invite still awaits a reminder.
    #[must_use]
    pub const fn is_reminder_eligible(&self) -> bool {
        self.registered_at.is_none() && self.reminder_sent_at.is_none()
    }

    /// Reports whether the invite still awaits an escalation.
    #[must_use]
    pub const fn is_escalation_eligible(&self) -> bool {
        self.registered_at.is_none() && self.escalation_sent_at.is_none()
    }

    /// Marks the invited owner as registered.
    pub const fn mark_registered(&mut self, at: DateTime<Utc>) {
        self.registered_at = Some(at);
    }

    /// Conditionally claims the reminder side-channel.
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
}
