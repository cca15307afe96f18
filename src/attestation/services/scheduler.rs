//! Scheduler driver running one full pass across all processors.
//!
//! The driver exposes a stateless [`SchedulerDriver::run_tick`] entry point
//! designed to be invoked on a fixed interval by an external supervisor. It
//! re-reads everything from the stores on every tick, so overlapping or
//! duplicated ticks degrade to the store-level claim contract rather than to
//! double sends.

use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::attestation::{
    ports::{
        AssetStore, CampaignStore, NotificationDispatcher, PendingInviteStore, RecordStore,
        UserStore,
    },
    services::{
        auto_close::CampaignAutoCloser,
        escalations::EscalationProcessor,
        reminders::ReminderProcessor,
        report::{CloseSummary, PassSummary, ProcessorResult, TickReport},
        unregistered::{UnregisteredEscalationProcessor, UnregisteredReminderProcessor},
        url::{AttestationUrlSigner, UrlSignerConfig},
    },
};

const fn default_tick_interval_hours() -> u32 {
    24
}

/// Configuration for the scheduling engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Hours between ticks, for the external supervisor. Defaults to 24.
    #[serde(default = "default_tick_interval_hours")]
    pub tick_interval_hours: u32,
    /// Signed URL configuration.
    pub urls: UrlSignerConfig,
}

impl SchedulerConfig {
    /// Returns the configured tick interval as a duration.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::hours(i64::from(self.tick_interval_hours))
    }
}

/// Collaborators wired into the scheduler driver.
pub struct SchedulerParts<C, R, P, U, A, N, K>
where
    C: CampaignStore,
    R: RecordStore,
    P: PendingInviteStore,
    U: UserStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    /// Campaign store.
    pub campaigns: Arc<C>,
    /// Attestation record store.
    pub records: Arc<R>,
    /// Pending invite store.
    pub invites: Arc<P>,
    /// User directory.
    pub users: Arc<U>,
    /// Canonical asset registry.
    pub assets: Arc<A>,
    /// Email dispatcher.
    pub dispatcher: Arc<N>,
    /// Signed URL builder.
    pub signer: Arc<AttestationUrlSigner>,
    /// Clock shared by every processor.
    pub clock: Arc<K>,
}

/// Orchestrates the five scheduled processors.
#[derive(Clone)]
pub struct SchedulerDriver<C, R, P, U, A, N, K>
where
    C: CampaignStore,
    R: RecordStore,
    P: PendingInviteStore,
    U: UserStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    reminders: ReminderProcessor<C, R, U, A, N, K>,
    escalations: EscalationProcessor<C, R, U, A, N, K>,
    unregistered_reminders: UnregisteredReminderProcessor<C, P, A, N, K>,
    unregistered_escalations: UnregisteredEscalationProcessor<C, P, A, N, K>,
    auto_closer: CampaignAutoCloser<C, K>,
}

impl<C, R, P, U, A, N, K> SchedulerDriver<C, R, P, U, A, N, K>
where
    C: CampaignStore,
    R: RecordStore,
    P: PendingInviteStore,
    U: UserStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    /// Wires the five processors from shared collaborators.
    #[must_use]
    pub fn new(parts: SchedulerParts<C, R, P, U, A, N, K>) -> Self {
        Self {
            reminders: ReminderProcessor::new(
                Arc::clone(&parts.campaigns),
                Arc::clone(&parts.records),
                Arc::clone(&parts.users),
                Arc::clone(&parts.assets),
                Arc::clone(&parts.dispatcher),
                Arc::clone(&parts.signer),
                Arc::clone(&parts.clock),
            ),
            escalations: EscalationProcessor::new(
                Arc::clone(&parts.campaigns),
                Arc::clone(&parts.records),
                Arc::clone(&parts.users),
                Arc::clone(&parts.assets),
                Arc::clone(&parts.dispatcher),
                Arc::clone(&parts.clock),
            ),
            unregistered_reminders: UnregisteredReminderProcessor::new(
                Arc::clone(&parts.campaigns),
                Arc::clone(&parts.invites),
                Arc::clone(&parts.assets),
                Arc::clone(&parts.dispatcher),
                Arc::clone(&parts.signer),
                Arc::clone(&parts.clock),
            ),
            unregistered_escalations: UnregisteredEscalationProcessor::new(
                Arc::clone(&parts.campaigns),
                Arc::clone(&parts.invites),
                Arc::clone(&parts.assets),
                Arc::clone(&parts.dispatcher),
                Arc::clone(&parts.clock),
            ),
            auto_closer: CampaignAutoCloser::new(parts.campaigns, parts.clock),
        }
    }

    /// Runs one full scheduler tick.
    ///
    /// The five passes run sequentially; a pass-level failure is recorded in
    /// the report and never blocks the remaining passes. The tick runs to
    /// completion and cannot be cancelled.
    pub async fn run_tick(&self) -> TickReport {
        info!("attestation scheduler tick started");

        let reminders = self.reminders.run_pass().await;
        log_notification_pass("reminders", &reminders);

        let escalations = self.escalations.run_pass().await;
        log_notification_pass("escalations", &escalations);

        let unregistered_reminders = self.unregistered_reminders.run_pass().await;
        log_notification_pass("unregistered_reminders", &unregistered_reminders);

        let unregistered_escalations = self.unregistered_escalations.run_pass().await;
        log_notification_pass("unregistered_escalations", &unregistered_escalations);

        let auto_close = self.auto_closer.run_pass().await;
        log_close_pass(&auto_close);

        let report = TickReport {
            reminders,
            escalations,
            unregistered_reminders,
            unregistered_escalations,
            auto_close,
        };
        info!(
            fully_succeeded = report.fully_succeeded(),
            total_sent = report.total_sent(),
            "attestation scheduler tick finished"
        );
        report
    }
}

fn log_notification_pass(pass: &str, result: &ProcessorResult<PassSummary>) {
    match result {
        Ok(summary) => info!(
            pass,
            campaigns = summary.campaigns,
            sent = summary.sent,
            skipped = summary.skipped,
            failed = summary.failed,
            "pass finished"
        ),
        Err(err) => error!(pass, error = %err, "pass aborted; will retry next tick"),
    }
}

fn log_close_pass(result: &ProcessorResult<CloseSummary>) {
    match result {
        Ok(summary) => info!(
            pass = "auto_close",
            expired = summary.expired,
            closed = summary.closed,
            failed = summary.failed,
            "pass finished"
        ),
        Err(err) => error!(pass = "auto_close", error = %err, "pass aborted; will retry next tick"),
    }
}
