// ABOUTME: Error type for configuration store operations
// ABOUTME: One variant per expected failure outcome; none of them are fatal

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Configuration not found for user: {0}")]
    NotFound(String),

    #[error("Configuration already exists for user: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Default value unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;
