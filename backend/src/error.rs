//! Error types for the artjoin loader and server.
//!
//! The join-and-index core never fails: malformed rows and unjoinable
//! artworks are filtered out, unknown identifiers yield empty results.
//! Errors only come from the layers around it:
//!
//! - [`ShapeError`] - A row does not match its dataset's column count
//! - [`LoadError`] - Reading or decoding an input file
//! - [`ServerError`] - HTTP request handling
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Record Shape Errors
// =============================================================================

/// A row whose field count differs from the dataset schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected {expected} fields, found {found}")]
pub struct ShapeError {
    pub expected: usize,
    pub found: usize,
}

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while obtaining dataset text.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded to text.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// A required dataset was not supplied.
    #[error("Missing input: {0}")]
    MissingInput(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Loading the datasets failed.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No catalog has been loaded yet.
    #[error("No catalog loaded")]
    NotLoaded,

    /// Unknown resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A background task failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
