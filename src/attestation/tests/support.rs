//! Shared fixtures and builders for scheduling engine tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;

use crate::attestation::{
    adapters::{FixedClock, InMemoryRegistry, RecordingDispatcher},
    domain::{
        Asset, AssetDetails, AssetOwner, AssetStatus, AttestationRecord, Campaign, DraftAsset,
        EmailAddress, NewAsset, NewCampaign, NotificationThresholds, PendingInvite, User, UserId,
    },
    services::{
        AttestationCompletionService, AttestationUrlSigner, CampaignAutoCloser,
        EscalationProcessor, ReminderProcessor, SchedulerDriver, SchedulerParts,
        UnregisteredEscalationProcessor, UnregisteredReminderProcessor, UrlSignerConfig,
    },
};

/// Thresholds used by most scenarios: reminders on day 7, escalations on day
/// 14, unregistered reminders on day 5.
pub(super) const DEFAULT_THRESHOLDS: NotificationThresholds = NotificationThresholds {
    reminder_days: 7,
    escalation_days: 14,
    unregistered_reminder_days: 5,
};

pub(super) type TestReminderProcessor = ReminderProcessor<
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    RecordingDispatcher,
    FixedClock,
>;
pub(super) type TestEscalationProcessor = EscalationProcessor<
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    RecordingDispatcher,
    FixedClock,
>;
pub(super) type TestUnregisteredReminderProcessor = UnregisteredReminderProcessor<
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    RecordingDispatcher,
    FixedClock,
>;
pub(super) type TestUnregisteredEscalationProcessor = UnregisteredEscalationProcessor<
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    RecordingDispatcher,
    FixedClock,
>;
pub(super) type TestAutoCloser = CampaignAutoCloser<InMemoryRegistry, FixedClock>;
pub(super) type TestCompletionService = AttestationCompletionService<
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    FixedClock,
>;
pub(super) type TestDriver = SchedulerDriver<
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    InMemoryRegistry,
    RecordingDispatcher,
    FixedClock,
>;

/// Returns a fixed morning instant on the given date.
pub(super) fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid test date")
}

/// Builds a validated email address.
pub(super) fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value).expect("valid test email")
}

/// Builds laptop-shaped asset details with the given serial number.
pub(super) fn asset_details(serial: &str) -> AssetDetails {
    AssetDetails {
        kind: "laptop".to_owned(),
        make: "Lenovo".to_owned(),
        model: "T14".to_owned(),
        serial_number: serial.to_owned(),
        asset_tag: None,
        company_id: None,
        notes: None,
    }
}

/// Everything a scheduling scenario needs, wired onto one in-memory registry.
pub(super) struct TestBed {
    pub registry: Arc<InMemoryRegistry>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub signer: Arc<AttestationUrlSigner>,
    pub clock: Arc<FixedClock>,
}

impl TestBed {
    /// Creates a test bed with the clock pinned to `now`.
    pub(super) fn at(now: DateTime<Utc>) -> Self {
        Self {
            registry: Arc::new(InMemoryRegistry::new()),
            dispatcher: Arc::new(RecordingDispatcher::new()),
            signer: Arc::new(AttestationUrlSigner::new(UrlSignerConfig {
                base_url: "https://steward.example.com".to_owned(),
                signing_secret: "test-signing-secret".to_owned(),
            })),
            clock: Arc::new(FixedClock::new(now)),
        }
    }

    pub(super) fn reminder_processor(&self) -> TestReminderProcessor {
        ReminderProcessor::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.signer),
            Arc::clone(&self.clock),
        )
    }

    pub(super) fn escalation_processor(&self) -> TestEscalationProcessor {
        EscalationProcessor::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.clock),
        )
    }

    pub(super) fn unregistered_reminder_processor(&self) -> TestUnregisteredReminderProcessor {
        UnregisteredReminderProcessor::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.signer),
            Arc::clone(&self.clock),
        )
    }

    pub(super) fn unregistered_escalation_processor(&self) -> TestUnregisteredEscalationProcessor {
        UnregisteredEscalationProcessor::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.clock),
        )
    }

    pub(super) fn auto_closer(&self) -> TestAutoCloser {
        CampaignAutoCloser::new(Arc::clone(&self.registry), Arc::clone(&self.clock))
    }

    pub(super) fn completion_service(&self) -> TestCompletionService {
        AttestationCompletionService::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.clock),
        )
    }

    pub(super) fn driver(&self) -> TestDriver {
        SchedulerDriver::new(SchedulerParts {
            campaigns: Arc::clone(&self.registry),
            records: Arc::clone(&self.registry),
            invites: Arc::clone(&self.registry),
            users: Arc::clone(&self.registry),
            assets: Arc::clone(&self.registry),
            dispatcher: Arc::clone(&self.dispatcher),
            signer: Arc::clone(&self.signer),
            clock: Arc::clone(&self.clock),
        })
    }

    /// Seeds an unbounded active campaign starting at `start`.
    pub(super) fn seed_campaign(
        &self,
        start: DateTime<Utc>,
        thresholds: NotificationThresholds,
    ) -> Campaign {
        self.seed_campaign_with_end(start, None, thresholds)
    }

    /// Seeds an active campaign with an explicit window end.
    pub(super) fn seed_campaign_with_end(
        &self,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        thresholds: NotificationThresholds,
    ) -> Campaign {
        let campaign = Campaign::create(
            NewCampaign {
                name: "Q3 hardware attestation".to_owned(),
                description: "Confirm the assets assigned to you".to_owned(),
                start_date: start,
                end_date: end,
                thresholds,
                created_by: UserId::new(),
            },
            &*self.clock,
        )
        .expect("valid test campaign");
        self.registry
            .insert_campaign(campaign.clone())
            .expect("seed campaign");
        campaign
    }

    /// Seeds a registered user, optionally with a manager email.
    pub(super) fn seed_user(&self, address: &str, manager: Option<&str>) -> User {
        let user = User::new(
            UserId::new(),
            email(address),
            "Avery",
            "Quinn",
            manager.map(email),
        );
        self.registry.insert_user(user.clone()).expect("seed user");
        user
    }

    /// Seeds a pending attestation record for the user on the campaign.
    pub(super) fn seed_record(&self, campaign: &Campaign, user: &User) -> AttestationRecord {
        let record = AttestationRecord::new(campaign.id(), user.id(), &*self.clock);
        self.registry
            .insert_record(record.clone())
            .expect("seed record");
        record
    }

    /// Seeds a pending invite for an unregistered asset owner.
    pub(super) fn seed_invite(&self, campaign: &Campaign, address: &str) -> PendingInvite {
        let invite = PendingInvite::new(campaign.id(), email(address), "Rowan", "Hale", &*self.clock);
        self.registry
            .insert_invite(invite.clone())
            .expect("seed invite");
        invite
    }

    /// Seeds a canonical asset owned by the given email.
    pub(super) fn seed_asset(&self, owner: &str, manager: Option<&str>, serial: &str) -> Asset {
        let asset = Asset::from_new(
            NewAsset {
                details: asset_details(serial),
                owner: AssetOwner {
                    email: email(owner),
                    first_name: "Rowan".to_owned(),
                    last_name: "Hale".to_owned(),
                    manager_email: manager.map(email),
                },
                status: AssetStatus::Active,
            },
            self.clock.utc(),
        );
        self.registry
            .insert_asset(asset.clone())
            .expect("seed asset");
        asset
    }

    /// Seeds a draft asset on the given attestation record.
    pub(super) fn seed_draft(&self, record: &AttestationRecord, serial: &str) -> DraftAsset {
        let draft =
            DraftAsset::new(record.id(), asset_details(serial)).expect("valid test draft");
        self.registry
            .insert_draft(draft.clone())
            .expect("seed draft");
        draft
    }
}
