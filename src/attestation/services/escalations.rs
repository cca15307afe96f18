//! Scheduled escalation pass notifying managers of overdue attestations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use crate::attestation::{
    domain::{AttestationRecord, Campaign, ThresholdCheck},
    ports::{AssetStore, CampaignStore, EscalationNotice, NotificationDispatcher, RecordStore, UserStore},
    services::report::{PassSummary, ProcessorResult, RecipientOutcome},
};

/// Drives escalation dispatch to managers of registered users.
///
/// Follows the reminder pattern at the escalation threshold, with one extra
/// gate: a user without a manager email is a permanent skip, logged but never
/// claimed and never retried.
#[derive(Clone)]
pub struct EscalationProcessor<C, R, U, A, N, K>
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
    clock: Arc<K>,
}

impl<C, R, U, A, N, K> EscalationProcessor<C, R, U, A, N, K>
where
    C: CampaignStore,
    R: RecordStore,
    U: UserStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    /// Creates an escalation processor.
    #[must_use]
    pub const fn new(
        campaigns: Arc<C>,
        records: Arc<R>,
        users: Arc<U>,
        assets: Arc<A>,
        dispatcher: Arc<N>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            campaigns,
            records,
            users,
            assets,
            dispatcher,
            clock,
        }
    }

    /// Runs one escalation pass over every active campaign.
    ///
    /// # Errors
    ///
    /// Returns [`crate::attestation::services::ProcessorError`] only when the
    /// campaign listing itself is unreachable.
    pub async fn run_pass(&self) -> ProcessorResult<PassSummary> {
        let now = self.clock.utc();
        let campaigns = self.campaigns.list_active().await?;
        let mut summary = PassSummary::default();

        for campaign in &campaigns {
            let check = ThresholdCheck::evaluate(
                campaign.start_date(),
                now,
                campaign.thresholds().escalation_days,
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
                        "escalation pass: record listing failed"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            for record in records
                .iter()
                .filter(|record| record.is_escalation_eligible())
            {
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
                    "escalation deferred: user not found"
                );
                return RecipientOutcome::Failed;
            }
            Err(err) => {
                warn!(record = %record.id(), error = %err, "escalation deferred: user lookup failed");
                return RecipientOutcome::Failed;
            }
        };

        let Some(manager_email) = user.manager_email().cloned() else {
            debug!(
                record = %record.id(),
                employee = %user.email(),
                "escalation skipped: no manager email"
            );
            return RecipientOutcome::Skipped;
        };

        let asset_count = match self.assets.list_by_employee_email(user.email()).await {
            Ok(assets) => assets.len(),
            Err(err) => {
                warn!(record = %record.id(), error = %err, "escalation deferred: asset lookup failed");
                return RecipientOutcome::Failed;
            }
        };

        match self.records.claim_escalation(record.id(), now).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(record = %record.id(), "escalation claim already taken");
                return RecipientOutcome::Skipped;
            }
            Err(err) => {
                warn!(record = %record.id(), error = %err, "escalation deferred: claim failed");
                return RecipientOutcome::Failed;
            }
        }

        let notice = EscalationNotice {
            manager_email,
            employee_email: user.email().clone(),
            employee_name: user.full_name(),
            campaign_name: campaign.name().to_owned(),
            asset_count,
        };

        match self.dispatcher.send_escalation(&notice).await {
            Ok(()) => {
                debug!(record = %record.id(), manager = %notice.manager_email, "escalation sent");
                RecipientOutcome::Sent
            }
            Err(err) => {
                warn!(
                    record = %record.id(),
                    manager = %notice.manager_email,
                    error = %err,
                    "escalation dispatch failed, releasing claim"
                );
                if let Err(release_err) = self.records.release_escalation(record.id()).await {
                    warn!(
                        record = %record.id(),
                        error = %release_err,
                        "escalation claim release failed; recipient will not be retried"
                    );
                }
                RecipientOutcome::Failed
            }
        }
    }
}
