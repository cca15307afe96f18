//! End-to-end tests for the scheduler driver tick.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rstest::rstest;

use super::support::{DEFAULT_THRESHOLDS, TestBed, utc};
use crate::attestation::{
    domain::{CampaignId, CampaignStatus, InviteId, PendingInvite},
    ports::{PendingInviteStore, StoreError, StoreResult},
    services::{SchedulerConfig, SchedulerDriver, SchedulerParts, UrlSignerConfig},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_full_tick_runs_every_pass() {
    let start = utc(2025, 3, 1);
    let now = start + Duration::days(14);
    let bed = TestBed::at(now);

    let campaign = bed.seed_campaign(start, DEFAULT_THRESHOLDS);
    let user = bed.seed_user("avery.quinn@example.com", Some("morgan.lee@example.com"));
    bed.seed_record(&campaign, &user);
    bed.seed_invite(&campaign, "rowan.hale@example.com");
    bed.seed_asset(
        "rowan.hale@example.com",
        Some("morgan.lee@example.com"),
        "SN-600",
    );
    let expired =
        bed.seed_campaign_with_end(start, Some(start + Duration::days(10)), DEFAULT_THRESHOLDS);

    let report = bed.driver().run_tick().await;

    assert!(report.fully_succeeded());
    // Reminder, escalation, registration reminder, and unregistered
    // escalation all fire on day 14 for this data set.
    assert_eq!(report.total_sent(), 4);
    assert_eq!(bed.dispatcher.reminders().len(), 1);
    assert_eq!(bed.dispatcher.escalations().len(), 1);
    assert_eq!(bed.dispatcher.unregistered_reminders().len(), 1);
    assert_eq!(bed.dispatcher.unregistered_escalations().len(), 1);

    let closed = bed
        .registry
        .campaign(expired.id())
        .expect("registry readable")
        .expect("campaign present");
    assert_eq!(closed.status(), CampaignStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_duplicate_tick_sends_nothing_new() {
    let start = utc(2025, 3, 1);
    let bed = TestBed::at(start + Duration::days(14));
    let campaign = bed.seed_campaign(start, DEFAULT_THRESHOLDS);
    let user = bed.seed_user("avery.quinn@example.com", Some("morgan.lee@example.com"));
    bed.seed_record(&campaign, &user);
    bed.seed_invite(&campaign, "rowan.hale@example.com");
    bed.seed_asset(
        "rowan.hale@example.com",
        Some("morgan.lee@example.com"),
        "SN-610",
    );
    let driver = bed.driver();

    let first = driver.run_tick().await;
    assert_eq!(first.total_sent(), 4);

    let second = driver.run_tick().await;
    assert!(second.fully_succeeded());
    assert_eq!(second.total_sent(), 0);
    assert_eq!(bed.dispatcher.reminders().len(), 1);
    assert_eq!(bed.dispatcher.escalations().len(), 1);
    assert_eq!(bed.dispatcher.unregistered_reminders().len(), 1);
    assert_eq!(bed.dispatcher.unregistered_escalations().len(), 1);
}

/// Invite store whose listing is permanently down.
struct FailingInviteStore;

#[async_trait]
impl PendingInviteStore for FailingInviteStore {
    async fn list_by_campaign(&self, _campaign_id: CampaignId) -> StoreResult<Vec<PendingInvite>> {
        Err(StoreError::backend(std::io::Error::other(
            "invite table offline",
        )))
    }

    async fn claim_reminder(&self, _id: InviteId, _at: DateTime<Utc>) -> StoreResult<bool> {
        Err(StoreError::backend(std::io::Error::other(
            "invite table offline",
        )))
    }

    async fn release_reminder(&self, _id: InviteId) -> StoreResult<()> {
        Err(StoreError::backend(std::io::Error::other(
            "invite table offline",
        )))
    }

    async fn claim_escalation(&self, _id: InviteId, _at: DateTime<Utc>) -> StoreResult<bool> {
        Err(StoreError::backend(std::io::Error::other(
            "invite table offline",
        )))
    }

    async fn release_escalation(&self, _id: InviteId) -> StoreResult<()> {
        Err(StoreError::backend(std::io::Error::other(
            "invite table offline",
        )))
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_broken_invite_store_does_not_block_the_other_passes() {
    let start = utc(2025, 3, 1);
    let bed = TestBed::at(start + Duration::days(14));
    let campaign = bed.seed_campaign(start, DEFAULT_THRESHOLDS);
    let user = bed.seed_user("avery.quinn@example.com", Some("morgan.lee@example.com"));
    bed.seed_record(&campaign, &user);

    let driver = SchedulerDriver::new(SchedulerParts {
        campaigns: Arc::clone(&bed.registry),
        records: Arc::clone(&bed.registry),
        invites: Arc::new(FailingInviteStore),
        users: Arc::clone(&bed.registry),
        assets: Arc::clone(&bed.registry),
        dispatcher: Arc::clone(&bed.dispatcher),
        signer: Arc::clone(&bed.signer),
        clock: Arc::clone(&bed.clock),
    });

    let report = driver.run_tick().await;

    let reminders = report.reminders.expect("reminder pass ran");
    assert_eq!(reminders.sent, 1);
    let escalations = report.escalations.expect("escalation pass ran");
    assert_eq!(escalations.sent, 1);

    let unregistered = report
        .unregistered_reminders
        .expect("pass ran despite the broken listing");
    assert_eq!(unregistered.sent, 0);
    assert_eq!(unregistered.failed, 1);
    assert!(report.auto_close.is_ok());
}

#[rstest]
fn tick_interval_defaults_to_daily() {
    let config: SchedulerConfig = serde_json::from_str(
        r#"{
            "urls": {
                "base_url": "https://steward.example.com",
                "signing_secret": "secret"
            }
        }"#,
    )
    .expect("valid config");

    assert_eq!(config.tick_interval_hours, 24);
    assert_eq!(config.tick_interval(), Duration::hours(24));
}

#[rstest]
fn tick_interval_honours_an_explicit_value() {
    let config = SchedulerConfig {
        tick_interval_hours: 6,
        urls: UrlSignerConfig {
            base_url: "https://steward.example.com".to_owned(),
            signing_secret: "secret".to_owned(),
        },
    };

    assert_eq!(config.tick_interval(), Duration::hours(6));
}
