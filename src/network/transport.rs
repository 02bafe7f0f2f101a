//! Transport abstraction
//!
//! The byte pipe the client talks through. [`super::Connection`] is the TCP
//! implementation; tests substitute in-memory doubles.

use std::io::{Read, Write};

use crate::error::Result;

/// Raw, unframed byte transport with connection lifecycle
pub trait Transport: Read + Write {
    /// Whether the underlying connection is currently usable
    fn is_connected(&self) -> bool;

    /// Establish the connection if it is not currently usable
    fn ensure_connected(&mut self) -> Result<()>;

    /// Drop the connection; the next `ensure_connected` re-establishes it
    fn close(&mut self);
}
