//! Port contracts for the attestation scheduling engine.
//!
//! Ports define infrastructure-agnostic interfaces used by the scheduled
//! processors and the completion service.

pub mod notification;
pub mod stores;

pub use notification::{
    DispatchError, DispatchResult, EscalationNotice, NotificationDispatcher, ReminderNotice,
    UnregisteredEscalationNotice, UnregisteredReminderNotice,
};
pub use stores::{
    AssetStore, CampaignStore, CompletionOutcome, DraftAssetStore, PendingInviteStore,
    RecordStore, StoreError, StoreResult, UserStore,
};
