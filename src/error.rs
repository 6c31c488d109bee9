//! # Error Types
//!
//! This module defines error types used throughout the cartolina library.

use thiserror::Error;

/// Main error type for cartolina operations
#[derive(Debug, Error)]
pub enum CardError {
    /// Invalid input shape or values
    #[error("Validation error: {0}")]
    Validation(String),

    /// Template fetch or parse failure
    #[error("Template load error: {0}")]
    Load(String),

    /// Drawing-surface or drawing-call failure
    #[error("Render error: {0}")]
    Render(String),

    /// Document assembly failure
    #[error("Export error: {0}")]
    Export(String),

    /// Persistence collaborator failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
