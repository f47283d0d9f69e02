use crate::error::FetchError;
use crate::fetch::FetchState;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub email: String,
}

#[async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError>;
}

/// Fixed two-row sample delivered after a delay; no network.
pub struct MockUserSource {
    delay: Duration,
}

impl MockUserSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn sample_users() -> Vec<UserRecord> {
        vec![
            UserRecord {
                id: 1,
                username: "user1".to_string(),
                email: "user1@example.com".to_string(),
            },
            UserRecord {
                id: 2,
                username: "user2".to_string(),
                email: "user2@example.com".to_string(),
            },
        ]
    }
}

impl Default for MockUserSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl UserSource for MockUserSource {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        tokio::time::sleep(self.delay).await;
        Ok(Self::sample_users())
    }
}

fn check_unique_ids(users: &[UserRecord]) -> Result<(), FetchError> {
    let mut seen = HashSet::new();
    for user in users {
        if !seen.insert(user.id) {
            return Err(FetchError::Malformed(format!("duplicate user id {}", user.id)));
        }
    }
    Ok(())
}

pub struct UserListProvider {
    source: Arc<dyn UserSource>,
}

impl UserListProvider {
    pub fn new(source: Arc<dyn UserSource>) -> Self {
        Self { source }
    }

    /// `Loading`, then exactly one `Data` or `Error`, then the stream ends.
    ///
    /// The fetch runs inside the stream, so dropping the stream before the
    /// terminal state cancels it.
    pub fn subscribe(&self) -> BoxStream<'static, FetchState<Vec<UserRecord>>> {
        let source = Arc::clone(&self.source);
        let terminal = async move {
            let result = source
                .fetch_users()
                .await
                .and_then(|users| check_unique_ids(&users).map(|_| users));
            match &result {
                Ok(users) => info!("Loaded {} users", users.len()),
                Err(e) => warn!("User list failed to load: {}", e),
            }
            FetchState::from_result(result)
        };

        stream::once(async { FetchState::Loading })
            .chain(stream::once(terminal))
            .boxed()
    }

    /// Drive a subscription to its terminal state.
    pub async fn load(&self) -> FetchState<Vec<UserRecord>> {
        let mut last = FetchState::Loading;
        let mut states = self.subscribe();
        while let Some(state) = states.next().await {
            last = state;
        }
        last
    }
}
