//! Error types for the game facade.

use pexeso_core::CoreError;
use pexeso_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Pexeso operations.
#[derive(Debug, Error)]
pub enum PexesoError {
    /// Game logic or validation error.
    #[error("game error: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for Pexeso operations.
pub type Result<T> = std::result::Result<T, PexesoError>;
