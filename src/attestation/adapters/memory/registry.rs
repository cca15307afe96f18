//! Thread-safe in-memory registry implementing every store port.
//!
//! One shared state block backs all stores, mirroring a database where the
//! tables share a connection pool: the transactional completion contract and
//! the conditional claim contract are honoured under a single write lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::attestation::{
    domain::{
        Asset, AssetId, AttestationRecord, Campaign, CampaignId, DraftAsset, DraftAssetId,
        EmailAddress, InviteId, NewAsset, PendingInvite, RecordId, RecordStatus, User, UserId,
    },
    ports::{
        AssetStore, CampaignStore, CompletionOutcome, DraftAssetStore, PendingInviteStore,
        RecordStore, StoreError, StoreResult, UserStore,
    },
};

/// Shared in-memory backing for the attestation stores.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    state: Arc<RwLock<RegistryState>>,
}

#[derive(Debug, Default)]
struct RegistryState {
    campaigns: HashMap<CampaignId, Campaign>,
    records: HashMap<RecordId, AttestationRecord>,
    invites: HashMap<InviteId, PendingInvite>,
    drafts: HashMap<DraftAssetId, DraftAsset>,
    assets: HashMap<AssetId, Asset>,
    users: HashMap<UserId, User>,
}

fn lock_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::backend(std::io::Error::other(err.to_string()))
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, RegistryState>> {
        self.state.read().map_err(lock_error)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, RegistryState>> {
        self.state.write().map_err(lock_error)
    }

    /// Seeds a campaign.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn insert_campaign(&self, campaign: Campaign) -> StoreResult<()> {
        let mut state = self.write()?;
        state.campaigns.insert(campaign.id(), campaign);
        Ok(())
    }

    /// Seeds an attestation record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn insert_record(&self, record: AttestationRecord) -> StoreResult<()> {
        let mut state = self.write()?;
        state.records.insert(record.id(), record);
        Ok(())
    }

    /// Seeds a pending invite.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn insert_invite(&self, invite: PendingInvite) -> StoreResult<()> {
        let mut state = self.write()?;
        state.invites.insert(invite.id(), invite);
        Ok(())
    }

    /// Seeds a draft asset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn insert_draft(&self, draft: DraftAsset) -> StoreResult<()> {
        let mut state = self.write()?;
        state.drafts.insert(draft.id(), draft);
        Ok(())
    }

    /// Seeds a user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn insert_user(&self, user: User) -> StoreResult<()> {
        let mut state = self.write()?;
        state.users.insert(user.id(), user);
        Ok(())
    }

    /// Seeds a canonical asset, bypassing uniqueness checks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn insert_asset(&self, asset: Asset) -> StoreResult<()> {
        let mut state = self.write()?;
        state.assets.insert(asset.id(), asset);
        Ok(())
    }

    /// Returns a stored campaign.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn campaign(&self, id: CampaignId) -> StoreResult<Option<Campaign>> {
        Ok(self.read()?.campaigns.get(&id).cloned())
    }

    /// Returns a stored attestation record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn record(&self, id: RecordId) -> StoreResult<Option<AttestationRecord>> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    /// Returns a stored pending invite.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn invite(&self, id: InviteId) -> StoreResult<Option<PendingInvite>> {
        Ok(self.read()?.invites.get(&id).cloned())
    }

    /// Returns the drafts still attached to the given attestation record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn drafts_by_record(&self, record_id: RecordId) -> StoreResult<Vec<DraftAsset>> {
        Ok(self
            .read()?
            .drafts
            .values()
            .filter(|draft| draft.record_id() == record_id)
            .cloned()
            .collect())
    }

    /// Returns every stored canonical asset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn assets(&self) -> StoreResult<Vec<Asset>> {
        Ok(self.read()?.assets.values().cloned().collect())
    }

    /// Returns stored assets matching the given serial number.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the state lock is poisoned.
    pub fn assets_by_serial(&self, serial_number: &str) -> StoreResult<Vec<Asset>> {
        Ok(self
            .read()?
            .assets
            .values()
            .filter(|asset| asset.details().serial_number == serial_number)
            .cloned()
            .collect())
    }
}

/// Rejects rows that would violate registry uniqueness, including duplicates
/// within the batch itself.
fn check_uniqueness(state: &RegistryState, rows: &[NewAsset]) -> StoreResult<()> {
    let mut batch_serials: Vec<&str> = Vec::new();
    let mut batch_tags: Vec<&str> = Vec::new();
    for row in rows {
        let serial = row.details.serial_number.as_str();
        let serial_taken = state
            .assets
            .values()
            .any(|asset| asset.details().serial_number == serial);
        if serial_taken || batch_serials.contains(&serial) {
            return Err(StoreError::DuplicateSerialNumber(serial.to_owned()));
        }
        batch_serials.push(serial);

        if let Some(tag) = row.details.asset_tag.as_deref() {
            let tag_taken = state
                .assets
                .values()
                .any(|asset| asset.details().asset_tag.as_deref() == Some(tag));
            if tag_taken || batch_tags.contains(&tag) {
                return Err(StoreError::DuplicateAssetTag(tag.to_owned()));
            }
            batch_tags.push(tag);
        }
    }
    Ok(())
}

#[async_trait]
impl CampaignStore for InMemoryRegistry {
    async fn list_active(&self) -> StoreResult<Vec<Campaign>> {
        Ok(self
            .read()?
            .campaigns
            .values()
            .filter(|campaign| campaign.is_active())
            .cloned()
            .collect())
    }

    async fn close(&self, id: CampaignId, at: DateTime<Utc>) -> StoreResult<bool> {
        let mut state = self.write()?;
        let campaign = state
            .campaigns
            .get_mut(&id)
            .ok_or(StoreError::CampaignNotFound(id))?;
        if !campaign.is_active() {
            return Ok(false);
        }
        Ok(campaign.complete(at).is_ok())
    }
}

#[async_trait]
impl RecordStore for InMemoryRegistry {
    async fn list_by_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> StoreResult<Vec<AttestationRecord>> {
        Ok(self
            .read()?
            .records
            .values()
            .filter(|record| record.campaign_id() == campaign_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<AttestationRecord>> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    async fn claim_reminder(&self, id: RecordId, at: DateTime<Utc>) -> StoreResult<bool> {
        let mut state = self.write()?;
        let record = state
            .records
            .get_mut(&id)
            .ok_or(StoreError::RecordNotFound(id))?;
        Ok(record.claim_reminder(at))
    }

    async fn release_reminder(&self, id: RecordId) -> StoreResult<()> {
        let mut state = self.write()?;
        let record = state
            .records
            .get_mut(&id)
            .ok_or(StoreError::RecordNotFound(id))?;
        record.release_reminder();
        Ok(())
    }

    async fn claim_escalation(&self, id: RecordId, at: DateTime<Utc>) -> StoreResult<bool> {
        let mut state = self.write()?;
        let record = state
            .records
            .get_mut(&id)
            .ok_or(StoreError::RecordNotFound(id))?;
        Ok(record.claim_escalation(at))
    }

    async fn release_escalation(&self, id: RecordId) -> StoreResult<()> {
        let mut state = self.write()?;
        let record = state
            .records
            .get_mut(&id)
            .ok_or(StoreError::RecordNotFound(id))?;
        record.release_escalation();
        Ok(())
    }

    async fn complete_with_assets(
        &self,
        id: RecordId,
        assets: Vec<NewAsset>,
        at: DateTime<Utc>,
    ) -> StoreResult<CompletionOutcome> {
        let mut state = self.write()?;
        let mut record = state
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::RecordNotFound(id))?;
        if record.status() == RecordStatus::Completed {
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        check_uniqueness(&state, &assets)?;

        record
            .complete(at)
            .map_err(|_| StoreError::RecordNotCompletable {
                id,
                status: record.status().as_str(),
            })?;

        let created: Vec<Asset> = assets
            .into_iter()
            .map(|row| Asset::from_new(row, at))
            .collect();
        for asset in &created {
            state.assets.insert(asset.id(), asset.clone());
        }
        state.records.insert(id, record);
        state.drafts.retain(|_, draft| draft.record_id() != id);
        Ok(CompletionOutcome::Completed(created))
    }
}

#[async_trait]
impl PendingInviteStore for InMemoryRegistry {
    async fn list_by_campaign(&self, campaign_id: CampaignId) -> StoreResult<Vec<PendingInvite>> {
        Ok(self
            .read()?
            .invites
            .values()
            .filter(|invite| invite.campaign_id() == campaign_id)
            .cloned()
            .collect())
    }

    async fn claim_reminder(&self, id: InviteId, at: DateTime<Utc>) -> StoreResult<bool> {
        let mut state = self.write()?;
        let invite = state
            .invites
            .get_mut(&id)
            .ok_or(StoreError::InviteNotFound(id))?;
        Ok(invite.claim_reminder(at))
    }

    async fn release_reminder(&self, id: InviteId) -> StoreResult<()> {
        let mut state = self.write()?;
        let invite = state
            .invites
            .get_mut(&id)
            .ok_or(StoreError::InviteNotFound(id))?;
        invite.release_reminder();
        Ok(())
    }

    async fn claim_escalation(&self, id: InviteId, at: DateTime<Utc>) -> StoreResult<bool> {
        let mut state = self.write()?;
        let invite = state
            .invites
            .get_mut(&id)
            .ok_or(StoreError::InviteNotFound(id))?;
        Ok(invite.claim_escalation(at))
    }

    async fn release_escalation(&self, id: InviteId) -> StoreResult<()> {
        let mut state = self.write()?;
        let invite = state
            .invites
            .get_mut(&id)
            .ok_or(StoreError::InviteNotFound(id))?;
        invite.release_escalation();
        Ok(())
    }
}

#[async_trait]
impl DraftAssetStore for InMemoryRegistry {
    async fn list_by_record(&self, record_id: RecordId) -> StoreResult<Vec<DraftAsset>> {
        Ok(self
            .read()?
            .drafts
            .values()
            .filter(|draft| draft.record_id() == record_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AssetStore for InMemoryRegistry {
    async fn list_by_employee_email(&self, email: &EmailAddress) -> StoreResult<Vec<Asset>> {
        let mut assets: Vec<Asset> = self
            .read()?
            .assets
            .values()
            .filter(|asset| asset.owner().email == *email)
            .cloned()
            .collect();
        // Registration order, with the id breaking timestamp ties. Manager
        // inference depends on a stable "first asset" across listings.
        assets.sort_by_key(|asset| (asset.created_at(), asset.id().into_inner()));
        Ok(assets)
    }

    async fn create(&self, row: NewAsset, at: DateTime<Utc>) -> StoreResult<Asset> {
        let mut state = self.write()?;
        check_uniqueness(&state, std::slice::from_ref(&row))?;
        let asset = Asset::from_new(row, at);
        state.assets.insert(asset.id(), asset.clone());
        Ok(asset)
    }
}

#[async_trait]
impl UserStore for InMemoryRegistry {
    async fn get(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }
}
