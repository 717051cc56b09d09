use axum_helpers::AppError;
use thiserror::Error;

/// Message used when the store hands back nothing
pub const NO_VALUE_PRESENT: &str = "No value present";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("{0}")]
    NotFound(String),

    /// The service returned nothing where a value was required
    #[error("{0}")]
    Absent(&'static str),
}

impl UserError {
    pub fn absent() -> Self {
        UserError::Absent(NO_VALUE_PRESENT)
    }
}

impl From<UserError> for AppError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::NotFound(message) => AppError::NotFound(message),
            UserError::Absent(message) => AppError::Internal(message.to_string()),
        }
    }
}
