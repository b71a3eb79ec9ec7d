//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Remote error: {0}")]
    Remote(String),

    /// Creating a record the backend did not have failed during an upsert
    #[error("Create after failed lookup: {0}")]
    CreateFallback(Box<Error>),

    #[error("Sync task error: {0}")]
    Sync(String),
}
