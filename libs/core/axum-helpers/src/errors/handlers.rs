use axum::{
    extract::OriginalUri,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{ErrorBody, RequestContext};

/// Fallback for routes that do not exist.
///
/// Answers with the same body shape as translated failures.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    let context = RequestContext::new(method, &uri);
    tracing::info!(method = %context.method, path = %context.path, "No endpoint matched");

    let mut body = ErrorBody::for_request(&context);
    body.insert(
        ErrorBody::EXCEPTION,
        format!("No endpoint {} {}.", context.method, context.path),
    );

    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
