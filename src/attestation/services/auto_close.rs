//! Scheduled auto-close of expired campaigns.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::attestation::{
    ports::CampaignStore,
    services::report::{CloseSummary, ProcessorResult},
};

/// Transitions active campaigns past their end date to completed.
///
/// The transition goes through the store's conditional close, so re-running
/// the pass, or racing another tick, is a no-op for campaigns that already
/// completed.
#[derive(Clone)]
pub struct CampaignAutoCloser<C, K>
where
    C: CampaignStore,
    K: Clock + Send + Sync,
{
    campaigns: Arc<C>,
    clock: Arc<K>,
}

impl<C, K> CampaignAutoCloser<C, K>
where
    C: CampaignStore,
    K: Clock + Send + Sync,
{
    /// Creates an auto-close processor.
    #[must_use]
    pub const fn new(campaigns: Arc<C>, clock: Arc<K>) -> Self {
        Self { campaigns, clock }
    }

    /// Runs one auto-close pass.
    ///
    /// # Errors
    ///
    /// Returns [`crate::attestation::services::ProcessorError`] only when the
    /// campaign listing itself is unreachable; individual close failures are
    /// counted and retried next tick.
    pub async fn run_pass(&self) -> ProcessorResult<CloseSummary> {
        let now = self.clock.utc();
        let campaigns = self.campaigns.list_active().await?;
        let mut summary = CloseSummary::default();

        for campaign in campaigns
            .iter()
            .filter(|campaign| campaign.expired_at(now))
        {
            summary.expired += 1;
            match self.campaigns.close(campaign.id(), now).await {
                Ok(true) => {
                    info!(campaign = %campaign.id(), name = campaign.name(), "campaign auto-closed");
                    summary.closed += 1;
                }
                Ok(false) => {
                    // Lost the close to a concurrent tick or admin action.
                }
                Err(err) => {
                    warn!(campaign = %campaign.id(), error = %err, "campaign close failed");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
