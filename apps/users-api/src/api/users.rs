use axum::Router;
use domain_users::{StubAuditProducer, StubUserRepository, UserService, handlers};
use std::sync::Arc;

pub fn router() -> Router {
    let repository = StubUserRepository::new(Arc::new(StubAuditProducer));
    let service = UserService::new(repository);
    handlers::router(service)
}
