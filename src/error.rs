//! Error types for FineDB
//!
//! Two kinds of failure exist: the exchange with the server could not be
//! completed (`Connection`), or the request broke a protocol contract before
//! anything was sent (`Protocol`). A negative answer from the server is not an
//! error at all; operations report it as `false` or `None`.

use thiserror::Error;

/// Result type alias using FineError
pub type Result<T> = std::result::Result<T, FineError>;

/// Unified error type for FineDB client operations
#[derive(Debug, Error)]
pub enum FineError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Connect, resolve, read or write failed (including timeouts and EOF)
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Contract Errors
    // -------------------------------------------------------------------------
    /// Request or frame violates the wire protocol
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl FineError {
    /// Returns true for transport-level failures
    pub fn is_connection(&self) -> bool {
        matches!(self, FineError::Connection(_))
    }

    /// Returns true for protocol contract violations
    pub fn is_protocol(&self) -> bool {
        matches!(self, FineError::Protocol(_))
    }
}
