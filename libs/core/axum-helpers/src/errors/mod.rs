pub mod handlers;
pub mod translator;

pub use translator::{error_boundary, resolve, translate, ExceptionHandler, RequestContext};

use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use validator::ValidationErrors;

/// JSON error body: a flat, key-ordered `string -> string` map.
///
/// Every translated failure carries `path` and `web request desc`; the remaining keys
/// depend on the handler that produced it.
///
/// ```json
/// {
///   "exception": "user not found",
///   "path": "/users/user-not-found",
///   "web request desc": "uri=/users/user-not-found"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorBody(BTreeMap<String, String>);

impl ErrorBody {
    pub const PATH: &'static str = "path";
    pub const DESCRIPTION: &'static str = "web request desc";
    pub const EXCEPTION: &'static str = "exception";
    pub const METHOD: &'static str = "method";
    pub const VIOLATIONS: &'static str = "violations";

    /// Body pre-filled with the request context keys
    pub fn for_request(context: &RequestContext) -> Self {
        let mut body = Self::default();
        body.insert(Self::PATH, &context.path);
        body.insert(Self::DESCRIPTION, context.description());
        body
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A method parameter that broke a declared rule (e.g. `id >= 1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub property: String,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.message)
    }
}

/// A handler argument that could not be bound, with every reason it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentError {
    pub argument: String,
    pub errors: Vec<String>,
}

impl ArgumentError {
    pub fn new(argument: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            errors: vec![error.into()],
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.argument, self.errors.join(", "))
    }
}

/// Every failure a request can end in.
///
/// Handlers and extractors return these; the [`error_boundary`] middleware turns them
/// into responses through the handler table in [`translator`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation failed for request body: {0}")]
    FieldValidation(#[from] ValidationErrors),

    #[error("Request method '{method}' is not supported")]
    MethodNotAllowed { method: String },

    #[error("{}", join(.0))]
    ConstraintViolation(Vec<ConstraintViolation>),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation failure for argument(s): {}", argument_names(.0))]
    HandlerArgument(Vec<ArgumentError>),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn constraint(property: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::ConstraintViolation(vec![ConstraintViolation::new(property, message)])
    }

    pub fn argument(argument: impl Into<String>, error: impl Into<String>) -> Self {
        AppError::HandlerArgument(vec![ArgumentError::new(argument, error)])
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn argument_names(errors: &[ArgumentError]) -> String {
    errors
        .iter()
        .map(|e| e.argument.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure parked in the response extensions until the boundary translates it.
#[derive(Clone)]
pub(crate) struct PendingFailure(pub(crate) Arc<AppError>);

impl IntoResponse for AppError {
    /// Only the status is decided here; body and logging happen in [`error_boundary`],
    /// which knows the request the failure belongs to.
    fn into_response(self) -> Response {
        let status = resolve(&self).status;
        let mut response = status.into_response();
        response
            .extensions_mut()
            .insert(PendingFailure(Arc::new(self)));
        response
    }
}
