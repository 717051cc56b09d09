//! Audit records for user mutations and the producer they are handed to.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Topic every audit payload is addressed to
pub const TOPIC_AUDIT: &str = "audit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Created => write!(f, "created"),
            AuditAction::Updated => write!(f, "updated"),
            AuditAction::Deleted => write!(f, "deleted"),
        }
    }
}

/// One audited change to a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditPayload {
    pub action: AuditAction,
    pub user_id: i64,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AuditPayload {
    pub fn new(action: AuditAction, user_id: i64) -> Self {
        Self {
            action,
            user_id,
            occurred_at: Utc::now(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Outcome reported by an [`AuditProducer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Success,
    Failed,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Success => "success",
            PublishStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message sink for audit payloads
#[async_trait]
pub trait AuditProducer: Send + Sync {
    async fn send_payload(&self, payload: &AuditPayload) -> PublishStatus;
}

/// Producer that transmits nothing and always reports success
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAuditProducer;

#[async_trait]
impl AuditProducer for StubAuditProducer {
    async fn send_payload(&self, payload: &AuditPayload) -> PublishStatus {
        debug!(
            topic = TOPIC_AUDIT,
            action = %payload.action,
            user_id = payload.user_id,
            "Audit payload accepted"
        );
        PublishStatus::Success
    }
}
