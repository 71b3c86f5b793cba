use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Database driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("Cast to ObjectId failed for value \"{0}\"")]
    InvalidId(String),

    #[error("Person validation failed: {0}")]
    Validation(#[from] CoreError),

    #[error("The requested data was not found in the database.")]
    NotFound,
}
