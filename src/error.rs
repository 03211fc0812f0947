//! # Error Types
//!
//! This module defines error types used throughout the impacto library.
//!
//! Most trouble in an input stream is not an error at all: unknown codes are
//! ignored and truncated escape sequences end the run. What remains are
//! failures of the collaborators around the core (sinks, fonts, images).

use thiserror::Error;

/// Main error type for impacto operations
#[derive(Debug, Error)]
pub enum ImpactoError {
    /// Font resource could not be used
    #[error("Font error: {0}")]
    Font(String),

    /// Invalid command or parameter
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Document dump could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error wrapper (sink or source failure)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
