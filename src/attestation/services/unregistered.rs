//! Scheduled passes over asset owners who have not registered an account.
//!
//! Pending invites follow the same threshold/claim/dispatch pattern as
//! attestation records, with two differences: a registered invite is inert,
//! and escalation has no user directory to consult, so the manager is
//! inferred from the assets already registered to the invite's email.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use crate::attestation::{
    domain::{Asset, Campaign, EmailAddress, PendingInvite, ThresholdCheck},
    ports::{
        AssetStore, CampaignStore, NotificationDispatcher, PendingInviteStore,
        UnregisteredEscalationNotice, UnregisteredReminderNotice,
    },
    services::{
        report::{PassSummary, ProcessorResult, RecipientOutcome},
        url::AttestationUrlSigner,
    },
};

/// Picks the manager email off the owner's registered assets.
///
/// The first asset carrying a manager wins. Assets disagreeing on the manager
/// is ambiguous upstream data; it is logged rather than treated as an error.
fn infer_manager(assets: &[Asset]) -> Option<&EmailAddress> {
    let mut managers = assets
        .iter()
        .filter_map(|asset| asset.owner().manager_email.as_ref());
    let first = managers.next()?;
    if managers.any(|other| other != first) {
        warn!(manager = %first, "owned assets disagree on manager email; using first match");
    }
    Some(first)
}

/// Drives registration reminders for invited asset owners.
#[derive(Clone)]
pub struct UnregisteredReminderProcessor<C, P, A, N, K>
where
    C: CampaignStore,
    P: PendingInviteStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    campaigns: Arc<C>,
    invites: Arc<P>,
    assets: Arc<A>,
    dispatcher: Arc<N>,
    signer: Arc<AttestationUrlSigner>,
    clock: Arc<K>,
}

impl<C, P, A, N, K> UnregisteredReminderProcessor<C, P, A, N, K>
where
    C: CampaignStore,
    P: PendingInviteStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    /// Creates an unregistered reminder processor.
    #[must_use]
    pub const fn new(
        campaigns: Arc<C>,
        invites: Arc<P>,
        assets: Arc<A>,
        dispatcher: Arc<N>,
        signer: Arc<AttestationUrlSigner>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            campaigns,
            invites,
            assets,
            dispatcher,
            signer,
            clock,
        }
    }

    /// Runs one registration-reminder pass over every active campaign.
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
                campaign.thresholds().unregistered_reminder_days,
            );
            if !check.crossed() {
                continue;
            }
            summary.campaigns += 1;

            let invites = match self.invites.list_by_campaign(campaign.id()).await {
                Ok(invites) => invites,
                Err(err) => {
                    warn!(
                        campaign = %campaign.id(),
                        error = %err,
                        "unregistered reminder pass: invite listing failed"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            for invite in invites.iter().filter(|invite| invite.is_reminder_eligible()) {
                summary.absorb(self.process_invite(campaign, invite, now).await);
            }
        }

        Ok(summary)
    }

    async fn process_invite(
        &self,
        campaign: &Campaign,
        invite: &PendingInvite,
        now: DateTime<Utc>,
    ) -> RecipientOutcome {
        let asset_count = match self
            .assets
            .list_by_employee_email(invite.employee_email())
            .await
        {
            Ok(assets) => assets.len(),
            Err(err) => {
                warn!(invite = %invite.id(), error = %err, "unregistered reminder deferred: asset lookup failed");
                return RecipientOutcome::Failed;
            }
        };

        match self.invites.claim_reminder(invite.id(), now).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(invite = %invite.id(), "unregistered reminder claim already taken");
                return RecipientOutcome::Skipped;
            }
            Err(err) => {
                warn!(invite = %invite.id(), error = %err, "unregistered reminder deferred: claim failed");
                return RecipientOutcome::Failed;
            }
        }

        let notice = UnregisteredReminderNotice {
            recipient: invite.employee_email().clone(),
            recipient_name: invite.employee_full_name(),
            campaign_name: campaign.name().to_owned(),
            asset_count,
            registration_url: self.signer.registration_url(invite.invite_token()),
        };

        match self.dispatcher.send_unregistered_reminder(&notice).await {
            Ok(()) => {
                debug!(invite = %invite.id(), recipient = %notice.recipient, "unregistered reminder sent");
                RecipientOutcome::Sent
            }
            Err(err) => {
                warn!(
                    invite = %invite.id(),
                    recipient = %notice.recipient,
                    error = %err,
                    "unregistered reminder dispatch failed, releasing claim"
                );
                if let Err(release_err) = self.invites.release_reminder(invite.id()).await {
                    warn!(
                        invite = %invite.id(),
                        error = %release_err,
                        "unregistered reminder claim release failed; recipient will not be retried"
                    );
                }
                RecipientOutcome::Failed
            }
        }
    }
}

/// Drives escalations about invited asset owners who never registered.
#[derive(Clone)]
pub struct UnregisteredEscalationProcessor<C, P, A, N, K>
where
    C: CampaignStore,
    P: PendingInviteStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    campaigns: Arc<C>,
    invites: Arc<P>,
    assets: Arc<A>,
    dispatcher: Arc<N>,
    clock: Arc<K>,
}

impl<C, P, A, N, K> UnregisteredEscalationProcessor<C, P, A, N, K>
where
    C: CampaignStore,
    P: PendingInviteStore,
    A: AssetStore,
    N: NotificationDispatcher,
    K: Clock + Send + Sync,
{
    /// Creates an unregistered escalation processor.
    #[must_use]
    pub const fn new(
        campaigns: Arc<C>,
        invites: Arc<P>,
        assets: Arc<A>,
        dispatcher: Arc<N>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            campaigns,
            invites,
            assets,
            dispatcher,
            clock,
        }
    }

    /// Runs one unregistered-escalation pass over every active campaign.
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

            let invites = match self.invites.list_by_campaign(campaign.id()).await {
                Ok(invites) => invites,
                Err(err) => {
                    warn!(
                        campaign = %campaign.id(),
                        error = %err,
                        "unregistered escalation pass: invite listing failed"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            for invite in invites
                .iter()
                .filter(|invite| invite.is_escalation_eligible())
            {
                summary.absorb(self.process_invite(campaign, invite, now).await);
            }
        }

        Ok(summary)
    }

    async fn process_invite(
        &self,
        campaign: &Campaign,
        invite: &PendingInvite,
        now: DateTime<Utc>,
    ) -> RecipientOutcome {
        let assets = match self
            .assets
            .list_by_employee_email(invite.employee_email())
            .await
        {
            Ok(assets) => assets,
            Err(err) => {
                warn!(invite = %invite.id(), error = %err, "unregistered escalation deferred: asset lookup failed");
                return RecipientOutcome::Failed;
            }
        };

        let Some(manager_email) = infer_manager(&assets).cloned() else {
            debug!(
                invite = %invite.id(),
                employee = %invite.employee_email(),
                "unregistered escalation skipped: no manager on any owned asset"
            );
            return RecipientOutcome::Skipped;
        };

        match self.invites.claim_escalation(invite.id(), now).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(invite = %invite.id(), "unregistered escalation claim already taken");
                return RecipientOutcome::Skipped;
            }
            Err(err) => {
                warn!(invite = %invite.id(), error = %err, "unregistered escalation deferred: claim failed");
                return RecipientOutcome::Failed;
            }
        }

        let notice = UnregisteredEscalationNotice {
            manager_email,
            employee_email: invite.employee_email().clone(),
            employee_name: invite.employee_full_name(),
            campaign_name: campaign.name().to_owned(),
            asset_count: assets.len(),
        };

        match self.dispatcher.send_unregistered_escalation(&notice).await {
            Ok(()) => {
                debug!(invite = %invite.id(), manager = %notice.manager_email, "unregistered escalation sent");
                RecipientOutcome::Sent
            }
            Err(err) => {
                warn!(
                    invite = %invite.id(),
                    manager = %notice.manager_email,
                    error = %err,
                    "unregistered escalation dispatch failed, releasing claim"
                );
                if let Err(release_err) = self.invites.release_escalation(invite.id()).await {
                    warn!(
                        invite = %invite.id(),
                        error = %release_err,
                        "unregistered escalation claim release failed; recipient will not be retried"
                    );
                }
                RecipientOutcome::Failed
            }
        }
    }
}
