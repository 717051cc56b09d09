//! Users Domain
//!
//! CRUD endpoints for users over a stub store, with every controller operation timed
//! by a [`TimingInterceptor`](axum_helpers::TimingInterceptor) and every mutation
//! reported to an [`AuditProducer`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, timed by the controller interceptor
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Delegation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + stub), audit publishing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User entity, audit payload
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_users::{
//!     handlers,
//!     audit::StubAuditProducer,
//!     repository::StubUserRepository,
//!     service::UserService,
//! };
//!
//! let repository = StubUserRepository::new(Arc::new(StubAuditProducer));
//! let service = UserService::new(repository);
//!
//! // Mount under /users
//! let router = axum::Router::new().nest("/users", handlers::router(service));
//! ```

pub mod audit;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use audit::{
    AuditAction, AuditPayload, AuditProducer, PublishStatus, StubAuditProducer, TOPIC_AUDIT,
};
pub use error::UserError;
pub use models::User;
pub use repository::{StubUserRepository, UserRepository};
pub use service::UserService;
