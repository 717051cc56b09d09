use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::audit::{AuditAction, AuditPayload, AuditProducer, PublishStatus, TOPIC_AUDIT};
use crate::models::User;

/// Repository trait for User persistence
///
/// `None` from `list`, `create` or `update` means the store had nothing to return.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users
    async fn list(&self) -> Option<Vec<User>>;

    /// Store a new user
    async fn create(&self, user: User) -> Option<User>;

    /// Replace the user stored under `id`
    async fn update(&self, id: i64, user: User) -> Option<User>;

    /// Remove the user stored under `id`
    async fn delete(&self, id: i64) -> bool;
}

/// Canned repository that persists nothing.
///
/// Every mutation is reported to the audit producer.
#[derive(Clone)]
pub struct StubUserRepository {
    producer: Arc<dyn AuditProducer>,
}

impl StubUserRepository {
    pub fn new(producer: Arc<dyn AuditProducer>) -> Self {
        Self { producer }
    }

    fn sample_users() -> Vec<User> {
        vec![
            User::new(1, "Ada Lovelace", "ada", "ada@example.com"),
            User::new(2, "Grace Hopper", "grace_h", "grace@example.com"),
        ]
    }

    /// Ids for users created without one, derived from the clock
    fn generate_id() -> i64 {
        Utc::now().timestamp_millis().max(1)
    }

    async fn audit(&self, payload: AuditPayload) {
        let status = self.producer.send_payload(&payload).await;
        match status {
            PublishStatus::Success => info!(
                topic = TOPIC_AUDIT,
                action = %payload.action,
                user_id = payload.user_id,
                status = %status,
                "Audit payload published"
            ),
            PublishStatus::Failed => warn!(
                topic = TOPIC_AUDIT,
                action = %payload.action,
                user_id = payload.user_id,
                status = %status,
                "Audit payload was not published"
            ),
        }
    }
}

impl std::fmt::Debug for StubUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubUserRepository").finish_non_exhaustive()
    }
}

#[async_trait]
impl UserRepository for StubUserRepository {
    async fn list(&self) -> Option<Vec<User>> {
        Some(Self::sample_users())
    }

    async fn create(&self, user: User) -> Option<User> {
        let user = if user.id == 0 {
            user.with_id(Self::generate_id())
        } else {
            user
        };

        self.audit(
            AuditPayload::new(AuditAction::Created, user.id)
                .with_details(json!({ "username": user.username })),
        )
        .await;

        Some(user)
    }

    async fn update(&self, id: i64, user: User) -> Option<User> {
        let user = user.with_id(id);

        self.audit(
            AuditPayload::new(AuditAction::Updated, id)
                .with_details(json!({ "username": user.username })),
        )
        .await;

        Some(user)
    }

    async fn delete(&self, id: i64) -> bool {
        self.audit(AuditPayload::new(AuditAction::Deleted, id)).await;
        true
    }
}
