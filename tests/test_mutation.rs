mod common;

use common::{catalog, setup, setup_anonymous, FakeApi};
use recsync::domain::error::DomainError;
use recsync::domain::values::record_status::RecordStatus;
use recsync::domain::values::resource_kind::ResourceKind;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_archive_refreshes_both_lists() {
    let api = FakeApi::with_active(catalog(3));
    let rs = setup(api.clone());
    let active = rs.query(ResourceKind::Active, "", vec![]).await.unwrap();
    let archived = rs.query(ResourceKind::Archived, "", vec![]).await.unwrap();
    assert!(archived.result().is_empty());

    let outcome = rs.archive("rec-0").await.unwrap();
    assert!(outcome.applied);
    assert_eq!(outcome.action, "archive");
    assert_eq!(outcome.refetched.len(), 2);
    assert_eq!(api.fetches(), 4);

    let active = active.result();
    assert_eq!(active.records().count(), 2);
    assert!(active.records().all(|r| r.id != "rec-0"));

    let archived = archived.result();
    let ids: Vec<_> = archived.records().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["rec-0"]);
    assert!(archived.records().all(|r| r.status == RecordStatus::Archived));
}

#[tokio::test]
async fn test_unarchive_refreshes_both_lists() {
    let api = FakeApi::with_active(catalog(1));
    *api.archived.lock().unwrap() = vec![common::record("old-1", "Old finding", &[])];
    let rs = setup(api.clone());
    let active = rs.query(ResourceKind::Active, "", vec![]).await.unwrap();
    let archived = rs.query(ResourceKind::Archived, "", vec![]).await.unwrap();

    let outcome = rs.unarchive("old-1").await.unwrap();
    assert!(outcome.applied);
    assert_eq!(active.result().records().count(), 2);
    assert!(archived.result().is_empty());
    assert!(active
        .result()
        .records()
        .all(|r| r.status == RecordStatus::Active));
}

#[tokio::test]
async fn test_unsubscribed_lists_are_reset_without_refetch() {
    let api = FakeApi::with_active(catalog(3));
    let rs = setup(api.clone());
    drop(rs.query(ResourceKind::Active, "", vec![]).await.unwrap());

    let outcome = rs.archive("rec-1").await.unwrap();
    assert!(outcome.refetched.is_empty());
    assert_eq!(api.fetches(), 1);

    let fresh = rs.query(ResourceKind::Active, "", vec![]).await.unwrap();
    assert_eq!(fresh.result().records().count(), 2);
}

#[tokio::test]
async fn test_failed_mutation_leaves_cache_untouched() {
    let api = FakeApi::with_active(catalog(3));
    let rs = setup(api.clone());
    let active = rs.query(ResourceKind::Active, "", vec![]).await.unwrap();
    let before = active.result();

    let err = rs.archive("missing").await.unwrap_err();
    assert_eq!(err.user_message(), "Recommendation not found");
    assert_eq!(api.fetches(), 1);
    assert_eq!(active.result(), before);

    *api.mutate_error.lock().unwrap() = Some(DomainError::Transport("connection reset".into()));
    assert!(rs.archive("rec-0").await.is_err());
    assert_eq!(api.fetches(), 1);
    assert_eq!(api.active.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unapplied_mutation_does_not_invalidate() {
    let api = FakeApi::with_active(catalog(3));
    api.reject_mutations.store(true, Ordering::SeqCst);
    let rs = setup(api.clone());
    let _active = rs.query(ResourceKind::Active, "", vec![]).await.unwrap();

    let outcome = rs.archive("rec-0").await.unwrap();
    assert!(!outcome.applied);
    assert!(outcome.refetched.is_empty());
    assert_eq!(api.fetches(), 1);
}

#[tokio::test]
async fn test_mutation_requires_token_and_id() {
    let api = FakeApi::with_active(catalog(3));
    let rs = setup_anonymous(api.clone());

    assert_eq!(rs.archive("rec-0").await.unwrap_err(), DomainError::Unauthenticated);
    assert!(matches!(
        rs.unarchive("  ").await.unwrap_err(),
        DomainError::InvalidInput(_)
    ));
    assert_eq!(api.mutations(), 0);
}
