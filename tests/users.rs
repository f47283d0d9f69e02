mod common;

use async_trait::async_trait;
use common::{DuplicateUsers, FailingUsers};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use token_desk::error::FetchError;
use token_desk::fetch::FetchState;
use token_desk::users::{MockUserSource, UserListProvider, UserRecord, UserSource};

fn mock_provider() -> UserListProvider {
    UserListProvider::new(Arc::new(MockUserSource::new(Duration::from_millis(20))))
}

#[tokio::test]
async fn test_mock_emits_loading_then_two_users() {
    let states: Vec<_> = mock_provider().subscribe().collect().await;

    assert_eq!(states.len(), 2);
    assert!(states[0].is_loading());
    let users = states[1].data().expect("terminal state should be data");
    let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_loading_is_available_before_fetch_completes() {
    let provider =
        UserListProvider::new(Arc::new(MockUserSource::new(Duration::from_secs(60))));
    let mut states = provider.subscribe();
    let first = tokio::time::timeout(Duration::from_millis(500), states.next())
        .await
        .expect("loading should be emitted immediately");
    assert_eq!(first, Some(FetchState::Loading));
}

#[tokio::test]
async fn test_source_failure_becomes_error_state() {
    let provider = UserListProvider::new(Arc::new(FailingUsers));
    let states: Vec<_> = provider.subscribe().collect().await;

    assert_eq!(states.len(), 2);
    assert!(states[0].is_loading());
    assert_eq!(
        states[1].error(),
        Some(&FetchError::Unavailable("database offline".to_string()))
    );
}

#[tokio::test]
async fn test_duplicate_ids_become_error_state() {
    let provider = UserListProvider::new(Arc::new(DuplicateUsers));
    let state = provider.load().await;
    assert!(matches!(state, FetchState::Error(FetchError::Malformed(_))));
}

#[tokio::test]
async fn test_each_subscription_is_independent() {
    let provider = mock_provider();
    let first = provider.load().await;
    let second = provider.load().await;
    assert_eq!(first, second);
    assert_eq!(first.data().map(|u| u.len()), Some(2));
}

struct SlowSource {
    finished: Arc<AtomicBool>,
}

#[async_trait]
impl UserSource for SlowSource {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_dropping_stream_cancels_fetch() {
    let finished = Arc::new(AtomicBool::new(false));
    let provider = UserListProvider::new(Arc::new(SlowSource {
        finished: Arc::clone(&finished),
    }));

    let mut states = provider.subscribe();
    assert_eq!(states.next().await, Some(FetchState::Loading));
    drop(states);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_empty_list_is_data_not_error() {
    let provider = UserListProvider::new(Arc::new(SlowSource {
        finished: Arc::new(AtomicBool::new(false)),
    }));
    let state = provider.load().await;
    assert_eq!(state, FetchState::Data(Vec::new()));
}
