//! Numeric id path parameter constrained to `>= 1`.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extractor for a single `{id}` path segment holding a positive `i64`.
///
/// A segment that is not an integer is an [`AppError::HandlerArgument`]; an integer
/// below 1 is an [`AppError::ConstraintViolation`]. Either way the handler never runs.
///
/// # Example
/// ```ignore
/// use axum::{routing::delete, Router};
/// use axum_helpers::PositiveId;
///
/// async fn delete_user(PositiveId(id): PositiveId) -> String {
///     format!("deleting {id}")
/// }
///
/// let app = Router::new().route("/users/{id}", delete(delete_user));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveId(pub i64);

impl PositiveId {
    pub const MIN: i64 = 1;
    const ARGUMENT: &'static str = "id";

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let id: i64 = raw.parse().map_err(|e| {
            AppError::argument(
                Self::ARGUMENT,
                format!("Failed to convert value '{raw}' to i64: {e}"),
            )
        })?;

        if id < Self::MIN {
            return Err(AppError::constraint(
                Self::ARGUMENT,
                format!("must be greater than or equal to {}", Self::MIN),
            ));
        }

        Ok(PositiveId(id))
    }
}

impl<S> FromRequestParts<S> for PositiveId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::argument(Self::ARGUMENT, rejection.body_text()))?;

        Self::parse(&raw)
    }
}
