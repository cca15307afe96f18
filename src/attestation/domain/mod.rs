//! Domain model for the attestation campaign lifecycle.
//!
//! The attestation domain models time-windowed compliance campaigns, per-user
//! attestation records with monotonic status transitions, pre-registration
//! invites, and the promotion of employee-declared draft assets into the
//! canonical registry, while keeping all infrastructure concerns outside of
//! the domain boundary.

mod asset;
mod campaign;
mod error;
mod ids;
mod invite;
mod record;
mod threshold;
mod user;

pub use asset::{Asset, AssetDetails, AssetOwner, AssetStatus, DraftAsset, NewAsset};
pub use campaign::{
    Campaign, CampaignStatus, NewCampaign, NotificationThresholds, PersistedCampaignData,
};
pub use error::{
    AttestationDomainError, ParseAssetStatusError, ParseCampaignStatusError,
    ParseRecordStatusError,
};
pub use ids::{
    AssetId, CampaignId, CompanyId, DraftAssetId, EmailAddress, InviteId, InviteToken, RecordId,
    UserId,
};
pub use invite::{PendingInvite, PersistedInviteData};
pub use record::{AttestationRecord, PersistedRecordData, RecordStatus};
pub use threshold::ThresholdCheck;
pub use user::User;
