//! VFX Notes Error Definitions
//!
//! Defines error types used throughout the project.

use thiserror::Error;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Events list is empty")]
    EmptyEventList,

    #[error("Invalid events JSON: {0}")]
    InvalidEvents(String),

    // =========================================================================
    // Document Errors
    // =========================================================================
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Document file corrupted: {0}")]
    DocumentCorrupted(String),

    #[error("Document opened read-only: {0}")]
    DocumentReadOnly(String),

    #[error("Failed to save document: {0}")]
    DocumentSaveFailed(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Convert to a user-friendly error message for callers outside the core
    pub fn to_ipc_error(&self) -> String {
        self.to_string()
    }

    /// Returns true for errors caused by caller input rather than the document
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::EmptyEventList | CoreError::InvalidEvents(_) | CoreError::ValidationError(_)
        )
    }
}
