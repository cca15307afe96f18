//! Pass summaries and tick reporting for the scheduled processors.

use crate::attestation::ports::StoreError;
use thiserror::Error;

/// Result type for processor passes.
pub type ProcessorResult<T> = Result<T, ProcessorError>;

/// Pass-level processor failure.
///
/// Raised only when a processor cannot run at all (campaign listing
/// unreachable); per-recipient and per-campaign failures are counted in the
/// pass summary instead.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The backing store was unreachable for the whole pass.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Counters describing one notification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Campaigns whose threshold was crossed this pass.
    pub campaigns: usize,
    /// Notices dispatched successfully.
    pub sent: usize,
    /// Recipients permanently skipped (no manager email, claim already won).
    pub skipped: usize,
    /// Recipients that failed transiently and stay eligible for retry.
    pub failed: usize,
}

/// Delivery outcome for a single recipient within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecipientOutcome {
    /// The notice was dispatched and the claim stands.
    Sent,
    /// The recipient is permanently ineligible; no claim was left behind.
    Skipped,
    /// A transient failure; the recipient stays eligible for the next tick.
    Failed,
}

impl PassSummary {
    /// Folds a recipient outcome into the counters.
    pub(crate) const fn absorb(&mut self, outcome: RecipientOutcome) {
        match outcome {
            RecipientOutcome::Sent => self.sent += 1,
            RecipientOutcome::Skipped => self.skipped += 1,
            RecipientOutcome::Failed => self.failed += 1,
        }
    }
}

/// Counters describing one auto-close pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseSummary {
    /// Active campaigns whose window had expired.
    pub expired: usize,
    /// Campaigns this pass transitioned to completed.
    pub closed: usize,
    /// Campaigns whose close attempt failed and will be retried.
    pub failed: usize,
}

/// Outcome of one full scheduler tick.
///
/// Each field carries the corresponding pass result; a pass-level failure in
/// one processor never prevents the others from running.
#[derive(Debug)]
pub struct TickReport {
    /// Registered-user reminder pass.
    pub reminders: ProcessorResult<PassSummary>,
    /// Registered-user escalation pass.
    pub escalations: ProcessorResult<PassSummary>,
    /// Unregistered-owner reminder pass.
    pub unregistered_reminders: ProcessorResult<PassSummary>,
    /// Unregistered-owner escalation pass.
    pub unregistered_escalations: ProcessorResult<PassSummary>,
    /// Campaign auto-close pass.
    pub auto_close: ProcessorResult<CloseSummary>,
}

impl TickReport {
    /// Reports whether every pass ran to completion.
    #[must_use]
    pub const fn fully_succeeded(&self) -> bool {
        self.reminders.is_ok()
            && self.escalations.is_ok()
            && self.unregistered_reminders.is_ok()
            && self.unregistered_escalations.is_ok()
            && self.auto_close.is_ok()
    }

    /// Returns the total notices dispatched across all notification passes.
    #[must_use]
    pub fn total_sent(&self) -> usize {
        [
            &self.reminders,
            &self.escalations,
            &self.unregistered_reminders,
            &self.unregistered_escalations,
        ]
        .into_iter()
        .filter_map(|pass| pass.as_ref().ok())
        .map(|summary| summary.sent)
        .sum()
    }
}
