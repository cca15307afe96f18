//! Notification dispatcher port for reminder and escalation email delivery.
//!
//! Transport (SMTP, Brevo, templating) lives behind this contract; the
//! scheduling engine only hands over fully resolved notice payloads and
//! observes success or failure per recipient.

use crate::attestation::domain::EmailAddress;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors returned by notification dispatch implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The transport rejected or failed to deliver the message.
    #[error("notification transport failure: {0}")]
    Transport(String),

    /// The recipient address was rejected by the transport.
    #[error("recipient rejected: {0}")]
    RecipientRejected(String),
}

/// Reminder payload for a registered campaign participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderNotice {
    /// Recipient address.
    pub recipient: EmailAddress,
    /// Recipient display name.
    pub recipient_name: String,
    /// Campaign the attestation belongs to.
    pub campaign_name: String,
    /// Number of assets currently registered to the recipient.
    pub asset_count: usize,
    /// Signed URL opening the recipient's attestation.
    pub attestation_url: String,
}

/// Escalation payload sent to a participant's manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationNotice {
    /// Manager address.
    pub manager_email: EmailAddress,
    /// Overdue employee's address.
    pub employee_email: EmailAddress,
    /// Overdue employee's display name.
    pub employee_name: String,
    /// Campaign the attestation belongs to.
    pub campaign_name: String,
    /// Number of assets currently registered to the employee.
    pub asset_count: usize,
}

/// Reminder payload for an asset owner without an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnregisteredReminderNotice {
    /// Invited owner's address.
    pub recipient: EmailAddress,
    /// Invited owner's display name.
    pub recipient_name: String,
    /// Campaign the invite belongs to.
    pub campaign_name: String,
    /// Number of assets currently registered to the owner's email.
    pub asset_count: usize,
    /// Signed registration URL built from the invite token.
    pub registration_url: String,
}

/// Escalation payload for an unregistered asset owner's inferred manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnregisteredEscalationNotice {
    /// Inferred manager address.
    pub manager_email: EmailAddress,
    /// Unregistered owner's address.
    pub employee_email: EmailAddress,
    /// Unregistered owner's display name.
    pub employee_name: String,
    /// Campaign the invite belongs to.
    pub campaign_name: String,
    /// Number of assets currently registered to the owner's email.
    pub asset_count: usize,
}

/// Email delivery contract for scheduled campaign notifications.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Sends an attestation reminder to a registered participant.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the transport fails; the caller keeps
    /// the recipient eligible for retry.
    async fn send_reminder(&self, notice: &ReminderNotice) -> DispatchResult<()>;

    /// Sends an overdue-attestation escalation to a participant's manager.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the transport fails.
    async fn send_escalation(&self, notice: &EscalationNotice) -> DispatchResult<()>;

    /// Sends a registration reminder to an invited asset owner.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the transport fails.
    async fn send_unregistered_reminder(
        &self,
        notice: &UnregisteredReminderNotice,
    ) -> DispatchResult<()>;

    /// Sends an escalation about an unregistered asset owner to their
    /// inferred manager.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the transport fails.
    async fn send_unregistered_escalation(
        &self,
        notice: &UnregisteredEscalationNotice,
    ) -> DispatchResult<()>;
}
