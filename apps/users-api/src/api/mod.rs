use axum::Router;

pub mod users;

/// All API routes, before the shared layers are applied
pub fn routes() -> Router {
    Router::new().nest("/users", users::router())
}
