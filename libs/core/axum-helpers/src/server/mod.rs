//! Server infrastructure: router assembly, health probe, graceful shutdown.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_app, create_router, health_router};
//! use core_config::server::ServerConfig;
//!
//! let app = create_router(Router::new().nest("/users", users))
//!     .merge(health_router(env!("CARGO_PKG_VERSION")));
//! create_app(app, &ServerConfig::default()).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_app, create_router};
pub use health::{health_router, HealthResponse};
pub use shutdown::shutdown_signal;
