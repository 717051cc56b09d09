//! # Axum Helpers
//!
//! Cross-cutting pieces shared by the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`errors`]**: failure taxonomy, the ordered exception translator and the
//!   error-boundary middleware that renders every failure as an `ErrorBody`
//! - **[`extractors`]**: validated JSON bodies and positive numeric path ids
//! - **[`interceptor`]**: execution-time logging around controller operations and
//!   outgoing HTTP client calls
//! - **[`server`]**: router assembly, health check, graceful shutdown
//! - **[`http`]**: security headers middleware
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router(api_routes);
//!
//!     create_app(router, &ServerConfig::default()).await
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod interceptor;
pub mod server;

// Re-export server types
pub use server::{HealthResponse, create_app, create_router, health_router, shutdown_signal};

// Re-export HTTP middleware
pub use http::security_headers;

// Re-export error types
pub use errors::{AppError, ArgumentError, ConstraintViolation, ErrorBody, error_boundary};

// Re-export extractors
pub use extractors::{JsonBody, PositiveId, ValidatedJson};

// Re-export interceptor types
pub use interceptor::{InterceptedClient, Invocation, TIMING_TARGET, TimingInterceptor};
