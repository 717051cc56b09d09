//! Failure → response translation.
//!
//! [`HANDLERS`] is walked in order and the first entry whose `matches` accepts the
//! failure produces the response; [`FALLBACK`] answers everything else with a 500.
//! Each translation logs the failure once, at `ERROR`.

use super::{AppError, ErrorBody, PendingFailure};
use axum::{
    extract::{OriginalUri, Request},
    http::{header, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// What the boundary knows about the request a failure belongs to.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
}

impl RequestContext {
    pub fn new(method: Method, uri: &Uri) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
        }
    }

    /// Prefers the pre-nesting URI so nested routers report the full path.
    pub fn from_request(request: &Request) -> Self {
        let uri = request
            .extensions()
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or_else(|| request.uri());
        Self::new(request.method().clone(), uri)
    }

    pub fn description(&self) -> String {
        format!("uri={}", self.path)
    }
}

/// One row of the translation table.
pub struct ExceptionHandler {
    pub name: &'static str,
    pub status: StatusCode,
    log_prefix: &'static str,
    matches: fn(&AppError) -> bool,
    fill: fn(&AppError, &mut ErrorBody),
}

impl ExceptionHandler {
    pub fn matches(&self, error: &AppError) -> bool {
        (self.matches)(error)
    }

    fn respond(&self, error: &AppError, context: &RequestContext) -> Response {
        tracing::error!(
            handler = self.name,
            method = %context.method,
            path = %context.path,
            "{} : {}",
            self.log_prefix,
            error
        );

        let mut body = ErrorBody::for_request(context);
        (self.fill)(error, &mut body);
        (self.status, Json(body)).into_response()
    }
}

static HANDLERS: [ExceptionHandler; 5] = [
    ExceptionHandler {
        name: "field_validation",
        status: StatusCode::BAD_REQUEST,
        log_prefix: "Method argument not valid exception",
        matches: is_field_validation,
        fill: fill_field_errors,
    },
    ExceptionHandler {
        name: "method_not_allowed",
        status: StatusCode::METHOD_NOT_ALLOWED,
        log_prefix: "HTTP request method not supported exception",
        matches: is_method_not_allowed,
        fill: fill_method,
    },
    ExceptionHandler {
        name: "constraint_violation",
        status: StatusCode::BAD_REQUEST,
        log_prefix: "Constraint Violation exception",
        matches: is_constraint_violation,
        fill: fill_constraint_violations,
    },
    ExceptionHandler {
        name: "not_found",
        status: StatusCode::BAD_REQUEST,
        log_prefix: "User Not Found exception",
        matches: is_not_found,
        fill: fill_exception,
    },
    ExceptionHandler {
        name: "handler_argument",
        status: StatusCode::BAD_REQUEST,
        log_prefix: "handler method violation exception",
        matches: is_handler_argument,
        fill: fill_argument_errors,
    },
];

static FALLBACK: ExceptionHandler = ExceptionHandler {
    name: "internal",
    status: StatusCode::INTERNAL_SERVER_ERROR,
    log_prefix: "internal server error",
    matches: any_failure,
    fill: fill_exception,
};

/// First handler in the table that accepts `error`, or the 500 fallback.
pub fn resolve(error: &AppError) -> &'static ExceptionHandler {
    HANDLERS
        .iter()
        .find(|handler| handler.matches(error))
        .unwrap_or(&FALLBACK)
}

/// Logs `error` and renders its response for `context`.
pub fn translate(error: &AppError, context: &RequestContext) -> Response {
    resolve(error).respond(error, context)
}

/// Outermost middleware: translates failures parked by [`AppError::into_response`] and
/// router-generated 405s.
pub async fn error_boundary(request: Request, next: Next) -> Response {
    let context = RequestContext::from_request(&request);
    let mut response = next.run(request).await;

    if let Some(PendingFailure(error)) = response.extensions_mut().remove::<PendingFailure>() {
        return translate(&error, &context);
    }

    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        let error = AppError::MethodNotAllowed {
            method: context.method.to_string(),
        };
        let allow = response.headers().get(header::ALLOW).cloned();
        let mut translated = translate(&error, &context);
        if let Some(allow) = allow {
            translated.headers_mut().insert(header::ALLOW, allow);
        }
        return translated;
    }

    response
}

fn any_failure(_: &AppError) -> bool {
    true
}

fn is_field_validation(error: &AppError) -> bool {
    matches!(error, AppError::FieldValidation(_))
}

fn is_method_not_allowed(error: &AppError) -> bool {
    matches!(error, AppError::MethodNotAllowed { .. })
}

fn is_constraint_violation(error: &AppError) -> bool {
    matches!(error, AppError::ConstraintViolation(_))
}

fn is_not_found(error: &AppError) -> bool {
    matches!(error, AppError::NotFound(_))
}

fn is_handler_argument(error: &AppError) -> bool {
    matches!(error, AppError::HandlerArgument(_))
}

fn fill_field_errors(error: &AppError, body: &mut ErrorBody) {
    if let AppError::FieldValidation(errors) = error {
        for (field, field_errors) in errors.field_errors() {
            let message = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect::<Vec<_>>()
                .join(", ");
            body.insert(field.to_string(), message);
        }
    }
}

fn fill_method(error: &AppError, body: &mut ErrorBody) {
    if let AppError::MethodNotAllowed { method } = error {
        body.insert(ErrorBody::METHOD, method);
    }
    fill_exception(error, body);
}

fn fill_constraint_violations(error: &AppError, body: &mut ErrorBody) {
    if let AppError::ConstraintViolation(violations) = error {
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        body.insert(ErrorBody::VIOLATIONS, format!("[{}]", messages.join(", ")));
    }
    fill_exception(error, body);
}

fn fill_argument_errors(error: &AppError, body: &mut ErrorBody) {
    if let AppError::HandlerArgument(arguments) = error {
        let rendered: Vec<String> = arguments.iter().map(ToString::to_string).collect();
        body.insert(ErrorBody::VIOLATIONS, format!("[{}]", rendered.join(", ")));
    }
    fill_exception(error, body);
}

fn fill_exception(error: &AppError, body: &mut ErrorBody) {
    body.insert(ErrorBody::EXCEPTION, error.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConstraintViolation;
    use axum::{body::Body, http::Request, routing::get, Router};
    use http_body_util::BodyExt;
    use test_utils::LogCapture;
    use tower::ServiceExt;
    use tracing::Level;
    use validator::{ValidationError, ValidationErrors};

    const TRANSLATOR_TARGET: &str = "axum_helpers::errors::translator";

    fn context(path: &str) -> RequestContext {
        RequestContext::new(Method::GET, &path.parse::<Uri>().unwrap())
    }

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let map: std::collections::BTreeMap<String, String> =
            serde_json::from_slice(&bytes).unwrap();
        let mut body = ErrorBody::default();
        for (k, v) in map {
            body.insert(k, v);
        }
        body
    }

    #[test]
    fn test_resolve_picks_most_specific_handler() {
        let cases = [
            (AppError::FieldValidation(ValidationErrors::new()), "field_validation"),
            (
                AppError::MethodNotAllowed {
                    method: "PATCH".into(),
                },
                "method_not_allowed",
            ),
            (AppError::constraint("id", "must be positive"), "constraint_violation"),
            (AppError::NotFound("gone".into()), "not_found"),
            (AppError::argument("id", "bad"), "handler_argument"),
            (AppError::Internal("boom".into()), "internal"),
        ];

        for (error, expected) in cases {
            assert_eq!(resolve(&error).name, expected, "{error:?}");
        }
    }

    #[test]
    fn test_statuses() {
        assert_eq!(
            resolve(&AppError::NotFound("x".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            resolve(&AppError::Internal("x".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            resolve(&AppError::MethodNotAllowed { method: "PATCH".into() }).status,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn test_field_validation_body_has_one_key_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            ValidationError::new("not_blank").with_message("must not be blank".into()),
        );
        errors.add("email", ValidationError::new("email"));

        let response = translate(&AppError::FieldValidation(errors), &context("/users"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.get("path"), Some("/users"));
        assert_eq!(body.get("web request desc"), Some("uri=/users"));
        assert_eq!(body.get("name"), Some("must not be blank"));
        assert_eq!(body.get("email"), Some("email"));
        assert_eq!(body.get("exception"), None);
        assert_eq!(body.len(), 4);
    }

    #[tokio::test]
    async fn test_constraint_violation_body() {
        let error = AppError::ConstraintViolation(vec![ConstraintViolation::new(
            "id",
            "must be greater than or equal to 1",
        )]);

        let body = body_of(translate(&error, &context("/users/0"))).await;
        assert_eq!(
            body.get("violations"),
            Some("[must be greater than or equal to 1]")
        );
        assert_eq!(
            body.get("exception"),
            Some("id: must be greater than or equal to 1")
        );
    }

    #[tokio::test]
    async fn test_handler_argument_body() {
        let body = body_of(translate(
            &AppError::argument("id", "invalid digit found in string"),
            &context("/users/abc"),
        ))
        .await;

        assert_eq!(
            body.get("violations"),
            Some("[id [invalid digit found in string]]")
        );
        assert_eq!(
            body.get("exception"),
            Some("Validation failure for argument(s): id")
        );
    }

    #[tokio::test]
    async fn test_boundary_translates_parked_failures() {
        let app = Router::new()
            .route(
                "/boom",
                get(|| async { Err::<(), _>(AppError::Internal("internal server error".into())) }),
            )
            .layer(axum::middleware::from_fn(error_boundary));

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<PendingFailure>().is_none());
        let body = body_of(response).await;
        assert_eq!(body.get("exception"), Some("internal server error"));
        assert_eq!(body.get("path"), Some("/boom"));
    }

    #[tokio::test]
    async fn test_boundary_turns_router_405_into_body() {
        let app = Router::new()
            .route("/things", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(error_boundary));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::PATCH)
                    .uri("/things")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(header::ALLOW));
        let body = body_of(response).await;
        assert_eq!(body.get("method"), Some("PATCH"));
        assert_eq!(
            body.get("exception"),
            Some("Request method 'PATCH' is not supported")
        );
    }

    #[tokio::test]
    async fn test_boundary_leaves_successes_alone() {
        let app = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .layer(axum::middleware::from_fn(error_boundary));

        let response = app
            .oneshot(Request::get("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"fine");
    }

    #[test]
    fn test_each_translation_logs_once_with_handler_prefix() {
        let capture = LogCapture::for_target(TRANSLATOR_TARGET);
        let _guard = capture.install();

        let mut field_errors = ValidationErrors::new();
        field_errors.add("name", ValidationError::new("not_blank"));

        let cases = [
            (
                AppError::FieldValidation(field_errors),
                "Method argument not valid exception : ",
            ),
            (
                AppError::MethodNotAllowed {
                    method: "PATCH".into(),
                },
                "HTTP request method not supported exception : Request method 'PATCH' is not supported",
            ),
            (
                AppError::constraint("id", "must be greater than or equal to 1"),
                "Constraint Violation exception : id: must be greater than or equal to 1",
            ),
            (
                AppError::NotFound("user not found".into()),
                "User Not Found exception : user not found",
            ),
            (
                AppError::argument("id", "bad"),
                "handler method violation exception : Validation failure for argument(s): id",
            ),
            (
                AppError::Internal("internal server error".into()),
                "internal server error : internal server error",
            ),
        ];

        for (error, expected) in cases {
            capture.clear();
            translate(&error, &context("/users"));

            let events = capture.events();
            assert_eq!(events.len(), 1, "{error:?}");
            assert_eq!(events[0].level, Level::ERROR);
            assert!(
                events[0].message.starts_with(expected),
                "{} does not start with {}",
                events[0].message,
                expected
            );
            assert_eq!(events[0].field("handler"), Some(resolve(&error).name));
            assert_eq!(events[0].field("path"), Some("/users"));
        }
    }

    #[tokio::test]
    async fn test_boundary_logs_router_405_once() {
        let capture = LogCapture::for_target(TRANSLATOR_TARGET);
        let _guard = capture.install();
        let app = Router::new()
            .route("/things", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(error_boundary));

        app.oneshot(
            Request::builder()
                .method(Method::PATCH)
                .uri("/things")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        let events = capture.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].field("handler"), Some("method_not_allowed"));
    }
}
