//! Service tests for attestation completion and draft-asset transfer.

use super::support::{DEFAULT_THRESHOLDS, TestBed, utc};
use crate::attestation::{
    domain::{AssetStatus, EmailAddress, RecordId, RecordStatus},
    ports::{CompletionOutcome, StoreError},
    services::CompletionError,
};
use chrono::Duration;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_a_record_transfers_every_draft() {
    let start = utc(2025, 3, 1);
    let bed = TestBed::at(start + Duration::days(3));
    let campaign = bed.seed_campaign(start, DEFAULT_THRESHOLDS);
    let user = bed.seed_user("avery.quinn@example.com", Some("morgan.lee@example.com"));
    let record = bed.seed_record(&campaign, &user);
    bed.seed_draft(&record, "SN-500");
    bed.seed_draft(&record, "SN-501");

    let outcome = bed
        .completion_service()
        .complete(record.id())
        .await
        .expect("completion succeeds");

    let CompletionOutcome::Completed(assets) = outcome else {
        panic!("expected a fresh completion");
    };
    assert_eq!(assets.len(), 2);
    for asset in &assets {
        assert_eq!(asset.status(), AssetStatus::Active);
        assert_eq!(asset.owner().email.as_str(), "avery.quinn@example.com");
        assert_eq!(
            asset
                .owner()
                .manager_email
                .as_ref()
                .map(EmailAddress::as_str),
            Some("morgan.lee@example.com")
        );
    }

    let stored = bed
        .registry
        .record(record.id())
        .expect("registry readable")
        .expect("record present");
    assert_eq!(stored.status(), RecordStatus::Completed);
    assert_eq!(stored.completed_at(), Some(start + Duration::days(3)));
    assert_eq!(bed.registry.assets().expect("assets readable").len(), 2);
    // The transferred drafts are consumed in the same transaction.
    assert!(
        bed.registry
            .drafts_by_record(record.id())
            .expect("drafts readable")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resubmitting_a_completed_record_transfers_nothing() {
    let start = utc(2025, 3, 1);
    let bed = TestBed::at(start + Duration::days(3));
    let campaign = bed.seed_campaign(start, DEFAULT_THRESHOLDS);
    let user = bed.seed_user("avery.quinn@example.com", None);
    let record = bed.seed_record(&campaign, &user);
    bed.seed_draft(&record, "SN-510");
    let service = bed.completion_service();

    let first = service
        .complete(record.id())
        .await
        .expect("first completion");
    assert!(matches!(first, CompletionOutcome::Completed(_)));

    let second = service
        .complete(record.id())
        .await
        .expect("second completion");
    assert!(matches!(second, CompletionOutcome::AlreadyCompleted));
    assert_eq!(bed.registry.assets().expect("assets readable").len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_serial_aborts_the_whole_transfer() {
    let start = utc(2025, 3, 1);
    let bed = TestBed::at(start + Duration::days(3));
    let campaign = bed.seed_campaign(start, DEFAULT_THRESHOLDS);
    let user = bed.seed_user("avery.quinn@example.com", None);
    let record = bed.seed_record(&campaign, &user);
    bed.seed_asset("someone.else@example.com", None, "SN-520");
    bed.seed_draft(&record, "SN-519");
    bed.seed_draft(&record, "SN-520");

    let result = bed.completion_service().complete(record.id()).await;

    assert!(matches!(
        result,
        Err(CompletionError::Store(StoreError::DuplicateSerialNumber(
            ref serial
        ))) if serial == "SN-520"
    ));

    // Nothing was committed: the record stays open and the clean draft was
    // not promoted on its own.
    let stored = bed
        .registry
        .record(record.id())
        .expect("registry readable")
        .expect("record present");
    assert_eq!(stored.status(), RecordStatus::Pending);
    assert!(
        bed.registry
            .assets_by_serial("SN-519")
            .expect("assets readable")
            .is_empty()
    );
    assert_eq!(bed.registry.assets().expect("assets readable").len(), 1);
    // The drafts survive the aborted transfer for a corrected resubmission.
    assert_eq!(
        bed.registry
            .drafts_by_record(record.id())
            .expect("drafts readable")
            .len(),
        2
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicates_within_the_submission_are_rejected() {
    let start = utc(2025, 3, 1);
    let bed = TestBed::at(start + Duration::days(3));
    let campaign = bed.seed_campaign(start, DEFAULT_THRESHOLDS);
    let user = bed.seed_user("avery.quinn@example.com", None);
    let record = bed.seed_record(&campaign, &user);
    bed.seed_draft(&record, "SN-530");
    bed.seed_draft(&record, "SN-530");

    let result = bed.completion_service().complete(record.id()).await;

    assert!(matches!(
        result,
        Err(CompletionError::Store(StoreError::DuplicateSerialNumber(_)))
    ));
    assert!(bed.registry.assets().expect("assets readable").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_with_no_drafts_still_closes_the_record() {
    let start = utc(2025, 3, 1);
    let bed = TestBed::at(start + Duration::days(3));
    let campaign = bed.seed_campaign(start, DEFAULT_THRESHOLDS);
    let user = bed.seed_user("avery.quinn@example.com", None);
    let record = bed.seed_record(&campaign, &user);

    let outcome = bed
        .completion_service()
        .complete(record.id())
        .await
        .expect("completion succeeds");

    let CompletionOutcome::Completed(assets) = outcome else {
        panic!("expected a fresh completion");
    };
    assert!(assets.is_empty());
    let stored = bed
        .registry
        .record(record.id())
        .expect("registry readable")
        .expect("record present");
    assert_eq!(stored.status(), RecordStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_record_is_reported() {
    let bed = TestBed::at(utc(2025, 3, 4));

    let result = bed.completion_service().complete(RecordId::new()).await;

    assert!(matches!(result, Err(CompletionError::RecordNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_user_is_reported() {
    let start = utc(2025, 3, 1);
    let bed = TestBed::at(start + Duration::days(3));
    let campaign = bed.seed_campaign(start, DEFAULT_THRESHOLDS);
    let user = bed.seed_user("avery.quinn@example.com", None);
    let record = bed.seed_record(&campaign, &user);

    let orphaned = TestBed::at(start + Duration::days(3));
    orphaned
        .registry
        .insert_campaign(campaign)
        .expect("seed campaign");
    orphaned
        .registry
        .insert_record(record.clone())
        .expect("seed record");

    let result = orphaned.completion_service().complete(record.id()).await;

    assert!(matches!(result, Err(CompletionError::UserNotFound(_))));
}
