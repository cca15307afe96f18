//! Scheduled reminder pass over registered campaign participants.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use crate::attestation::{
    domain::{AttestationRecord, Campaign, ThresholdCheck},
    ports::{AssetStore, CampaignStore, NotificationDispatcher, RecordStore, ReminderNotice, UserStore},
    services::{
        report::{PassSummary, ProcessorResult, RecipientOutcome},
        url::AttestationUrlSigner,
    },
};

/// Drives reminder dispatch for registered users on active campaigns.
///
/// A record is eligible while it is pending and has never been successfully
/// reminded. The claim on the sent-at side-channel is taken before dispatch
/// and released on dispatch failure, so the next tick retries the recipient
/// and duplicate ticks can never double-send.
#[derive(Clone)]
pub struct ReminderProcessor<C, R, U, A, N, K>
where
    C: CampaignStore,
    R: RecordStore,
    U: UserStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    campaigns: Arc<C>,
    records: Arc<R>,
    users: Arc<U>,
    assets: Arc<A>,
    dispatcher: Arc<N>,
    signer: Arc<AttestationUrlSigner>,
    clock: Arc<K>,
}

impl<C, R, U, A, N, K> ReminderProcessor<C, R, U, A, N, K>
where
    C: CampaignStore,
    R: RecordStore,
    U: UserStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    /// Creates a reminder processor.
    #[must_use]
    pub const fn new(
        campaigns: Arc<C>,
        records: Arc<R>,
        users: Arc<U>,
        assets: Arc<A>,
        dispatcher: Arc<N>,
        signer: Arc<AttestationUrlSigner>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            campaigns,
            records,
            users,
            assets,
            dispatcher,
            signer,
            clock,
        }
    }

    /// Runs one reminder pass over every active campaign.
    ///
    /// # Errors
    ///
    /// Returns [`crate::attestation::services::ProcessorError`] only when the
    /// campaign listing itself is unreachable; failures below campaign level
    /// are counted in the summary and retried next tick.
    pub async fn run_pass(&self) -> ProcessorResult<PassSummary> {
        let now = self.clock.utc();
        let campaigns = self.campaigns.list_active().await?;
        let mut summary = PassSummary::default();

        for campaign in &campaigns {
            let check = ThresholdCheck::evaluate(
                campaign.start_date(),
                now,
                campaign.thresholds().reminder_days,
            );
            if !check.crossed() {
                continue;
            }
            summary.campaigns += 1;

            let records = match self.records.list_by_campaign(campaign.id()).await {
                Ok(records) => records,
                Err(err) => {
                    warn!(
                        campaign = %campaign.id(),
                        error = %err,
                        "reminder pass: record listing failed"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            for record in records.iter().filter(|record| record.is_reminder_eligible()) {
                summary.absorb(self.process_record(campaign, record, now).await);
            }
        }

        Ok(summary)
    }

    async fn process_record(
        &self,
        campaign: &Campaign,
        record: &AttestationRecord,
        now: DateTime<Utc>,
    ) -> RecipientOutcome {
        let user = match self.users.get(record.user_id()).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(
                    record = %record.id(),
                    user = %record.user_id(),
                    "reminder deferred: user not found"
                );
                return RecipientOutcome::Failed;
            }
            Err(err) => {
                warn!(record = %record.id(), error = %err, "reminder deferred: user lookup failed");
                return RecipientOutcome::Failed;
            }
        };

        let asset_count = match self.assets.list_by_employee_email(user.email()).await {
            Ok(assets) => assets.len(),
            Err(err) => {
                warn!(record = %record.id(), error = %err, "reminder deferred: asset lookup failed");
                return RecipientOutcome::Failed;
            }
        };

        match self.records.claim_reminder(record.id(), now).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(record = %record.id(), "reminder claim already taken");
                return RecipientOutcome::Skipped;
            }
            Err(err) => {
                warn!(record = %record.id(), error = %err, "reminder deferred: claim failed");
                return RecipientOutcome::Failed;
            }
        }

        let notice = ReminderNotice {
            recipient: user.email().clone(),
            recipient_name: user.full_name(),
            campaign_name: campaign.name().to_owned(),
            asset_count,
            attestation_url: self.signer.attestation_url(record.id()),
        };

        match self.dispatcher.send_reminder(&notice).await {
            Ok(()) => {
                debug!(record = %record.id(), recipient = %notice.recipient, "reminder sent");
                RecipientOutcome::Sent
            }
            Err(err) => {
                warn!(
                    record = %record.id(),
                    recipient = %notice.recipient,
                    error = %err,
                    "reminder dispatch failed, releasing claim"
                );
                if let Err(release_err) = self.records.release_reminder(record.id()).await {
                    warn!(
                        record = %record.id(),
                        error = %release_err,
                        "reminder claim release failed; recipient will not be retried"
                    );
                }
                RecipientOutcome::Failed
            }
        }
    }
}
