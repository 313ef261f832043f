use ccc_catalog::builtin;
use ccc_core::{Action, Assignee, Completion, FormType, Session, ShareEncoder};
use ccc_store::{from_config, MarkerService, MemoryStore, StorageError, SubmissionError};
use ccc_test_utils::{complete_cascade_actions, office_location, sample_assignees, RecordingMap};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn ready_session() -> Session<'static> {
    let mut session = Session::new(builtin());
    for action in complete_cascade_actions() {
        session.dispatch(&action);
    }
    session.dispatch(&Action::SetFormType(Some(FormType::Ccc)));
    let loc = office_location();
    session
        .handle_map_click(&mut RecordingMap::default(), loc.lat, loc.lng)
        .unwrap();
    session
        .refresh_share_url(&ShareEncoder::new("https://qr.example/"))
        .unwrap();
    session
}

#[tokio::test]
async fn test_session_submit_to_memory_store() {
    let store = Arc::new(MemoryStore::new().with_assignees(sample_assignees()));
    let service = MarkerService::new(store.clone(), builtin());
    let mut session = ready_session();

    let ticket = session.begin_assignee_fetch();
    let fetched = service.assignees().await;
    assert_eq!(
        session.complete_assignee_fetch(ticket, fetched).unwrap(),
        Completion::Applied
    );
    session.select_assignee(Some("u-ada"));

    let stored = service.submit_session(&session).await.unwrap();
    let markers = store.markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].0, stored.id);
    assert_eq!(
        markers[0].1.assignee.as_ref().and_then(|a| a.username.as_deref()),
        Some("ada")
    );
    assert_eq!(markers[0].1.url, session.share_url().unwrap());
}

#[tokio::test]
async fn test_offline_store_keeps_form() {
    let store = Arc::new(MemoryStore::new());
    store.set_offline(true);
    let service = MarkerService::new(store.clone(), builtin());
    let session = ready_session();

    let err = service.submit_session(&session).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Storage(StorageError::Unavailable(_))));
    assert!(err.is_recoverable());
    assert!(session.marker().is_ok());

    store.set_offline(false);
    assert!(service.submit_session(&session).await.is_ok());
}

#[tokio::test]
async fn test_slow_stale_fetch_is_dropped() {
    let slow = MarkerService::new(
        Arc::new(
            MemoryStore::new()
                .with_assignees(vec![Assignee::new("old", "Old List")])
                .with_latency(Duration::from_millis(50)),
        ),
        builtin(),
    );
    let fast = MarkerService::new(
        Arc::new(MemoryStore::new().with_assignees(sample_assignees())),
        builtin(),
    );

    let mut session = Session::new(builtin());
    let first = session.begin_assignee_fetch();
    let second = session.begin_assignee_fetch();

    let (slow_result, fast_result) = tokio::join!(slow.assignees(), fast.assignees());
    assert_eq!(
        session.complete_assignee_fetch(second, fast_result).unwrap(),
        Completion::Applied
    );
    assert_eq!(
        session.complete_assignee_fetch(first, slow_result).unwrap(),
        Completion::Stale
    );
    assert_eq!(session.assignees(), &sample_assignees()[..]);
}

#[tokio::test]
async fn test_default_config_uses_memory() {
    let store = from_config(&ccc_core::StoreConfig::default()).unwrap();
    assert_eq!(store.backend(), "memory");
    assert!(store.list_assignees().await.unwrap().is_empty());
}
