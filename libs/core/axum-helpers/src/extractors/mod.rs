//! Extractors that reject with [`AppError`](crate::errors::AppError), so every input
//! failure goes through the same translation table.

pub mod positive_id;
pub mod validated_json;

pub use positive_id::PositiveId;
pub use validated_json::{JsonBody, ValidatedJson};
