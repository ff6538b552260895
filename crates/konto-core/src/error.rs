//! Error types for Konto

use thiserror::Error;

/// Result type alias using Konto's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Konto error types
///
/// Only genuinely fatal conditions live here. Expected "no result" shapes
/// (an unknown synonym, a mention outside the listing, a non-unique match)
/// are plain `None` values on the respective operations, never errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown action '{0}'.")]
    UnknownAction(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
