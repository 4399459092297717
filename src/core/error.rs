//! Error types for the voxsculpt core

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    #[error("Stale snapshot: store derives from revision {found}, current revision is {expected}")]
    StaleSnapshot { expected: u64, found: u64 },

    #[error("Store belongs to world generation {found}, current generation is {expected}")]
    GenerationMismatch { expected: u64, found: u64 },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
