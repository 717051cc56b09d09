use super::shutdown::shutdown_signal;
use crate::errors::{error_boundary, handlers::not_found};
use crate::http::security_headers;
use axum::{middleware, Router};
use core_config::server::ServerConfig;
use std::io;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

/// Starts the Axum server with graceful shutdown.
///
/// # Errors
/// Returns an error if the listener cannot bind to `server_config.address()` or the
/// server fails while running.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use core_config::server::ServerConfig;
/// use axum_helpers::server::create_app;
///
/// #[tokio::main]
/// async fn main() -> std::io::Result<()> {
///     create_app(Router::new(), &ServerConfig::default()).await
/// }
/// ```
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })?;

    Ok(())
}

/// Wraps the application routes with the cross-cutting layers.
///
/// From the inside out:
/// - JSON 404 fallback for unknown routes
/// - [`error_boundary`]: turns every failure (and router 405s) into an `ErrorBody`
/// - security headers
/// - request tracing spans
///
/// Domain routers apply their own state before being passed in.
pub fn create_router(apis: Router) -> Router {
    apis.fallback(not_found)
        .layer(middleware::from_fn(error_boundary))
        .layer(middleware::from_fn(security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_route_gets_json_404() {
        let app = create_router(Router::new().route("/known", get(|| async { "ok" })));

        let response = app
            .oneshot(Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
        let body = test_utils::http::error_body(response.into_body()).await;
        assert_eq!(body["exception"], "No endpoint GET /missing.");
        assert_eq!(body["web request desc"], "uri=/missing");
    }

    #[tokio::test]
    async fn test_nested_routes_report_full_path() {
        let nested = Router::new().route("/{id}", get(|| async { "ok" }));
        let app = create_router(Router::new().nest("/users", nested));

        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/users/3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = test_utils::http::error_body(response.into_body()).await;
        assert_eq!(body["path"], "/users/3");
        assert_eq!(body["method"], "PATCH");
    }
}
