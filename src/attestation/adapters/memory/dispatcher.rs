//! Recording notification dispatcher for tests and local runs.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::attestation::{
    domain::EmailAddress,
    ports::{
        DispatchError, DispatchResult, EscalationNotice, NotificationDispatcher, ReminderNotice,
        UnregisteredEscalationNotice, UnregisteredReminderNotice,
    },
};

/// Dispatcher that records every notice instead of delivering it.
///
/// Individual recipients can be configured to fail, exercising the
/// release-and-retry path of the processors.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    log: Mutex<DispatchLog>,
}

#[derive(Debug, Default)]
struct DispatchLog {
    reminders: Vec<ReminderNotice>,
    escalations: Vec<EscalationNotice>,
    unregistered_reminders: Vec<UnregisteredReminderNotice>,
    unregistered_escalations: Vec<UnregisteredEscalationNotice>,
    failing_recipients: HashSet<String>,
}

impl RecordingDispatcher {
    /// Creates a dispatcher with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the given recipient to fail every dispatch.
    pub fn fail_recipient(&self, email: &EmailAddress) {
        if let Ok(mut log) = self.log.lock() {
            log.failing_recipients.insert(email.as_str().to_owned());
        }
    }

    /// Restores successful dispatch for the given recipient.
    pub fn restore_recipient(&self, email: &EmailAddress) {
        if let Ok(mut log) = self.log.lock() {
            log.failing_recipients.remove(email.as_str());
        }
    }

    /// Returns every recorded reminder notice.
    #[must_use]
    pub fn reminders(&self) -> Vec<ReminderNotice> {
        self.log
            .lock()
            .map(|log| log.reminders.clone())
            .unwrap_or_default()
    }

    /// Returns every recorded escalation notice.
    #[must_use]
    pub fn escalations(&self) -> Vec<EscalationNotice> {
        self.log
            .lock()
            .map(|log| log.escalations.clone())
            .unwrap_or_default()
    }

    /// Returns every recorded unregistered reminder notice.
    #[must_use]
    pub fn unregistered_reminders(&self) -> Vec<UnregisteredReminderNotice> {
        self.log
            .lock()
            .map(|log| log.unregistered_reminders.clone())
            .unwrap_or_default()
    }

    /// Returns every recorded unregistered escalation notice.
    #[must_use]
    pub fn unregistered_escalations(&self) -> Vec<UnregisteredEscalationNotice> {
        self.log
            .lock()
            .map(|log| log.unregistered_escalations.clone())
            .unwrap_or_default()
    }

    fn deliver<N: Clone>(
        &self,
        recipient: &EmailAddress,
        notice: &N,
        select: impl FnOnce(&mut DispatchLog) -> &mut Vec<N>,
    ) -> DispatchResult<()> {
        let mut log = self
            .log
            .lock()
            .map_err(|err| DispatchError::Transport(err.to_string()))?;
        if log.failing_recipients.contains(recipient.as_str()) {
            return Err(DispatchError::Transport(format!(
                "configured failure for {recipient}"
            )));
        }
        select(&mut log).push(notice.clone());
        Ok(())
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send_reminder(&self, notice: &ReminderNotice) -> DispatchResult<()> {
        self.deliver(&notice.recipient, notice, |log| &mut log.reminders)
    }

    async fn send_escalation(&self, notice: &EscalationNotice) -> DispatchResult<()> {
        self.deliver(&notice.manager_email, notice, |log| &mut log.escalations)
    }

    async fn send_unregistered_reminder(
        &self,
        notice: &UnregisteredReminderNotice,
    ) -> DispatchResult<()> {
        self.deliver(&notice.recipient, notice, |log| {
            &mut log.unregistered_reminders
        })
    }

    async fn send_unregistered_escalation(
        &self,
        notice: &UnregisteredEscalationNotice,
    ) -> DispatchResult<()> {
        self.deliver(&notice.manager_email, notice, |log| {
            &mut log.unregistered_escalations
        })
    }
}
