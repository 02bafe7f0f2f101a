//! # FineDB
//!
//! A synchronous client for the FineDB key-value store:
//! - Compact binary protocol over plain TCP
//! - PING, GET, PUT, DEL and SETDB
//! - One lazily dialed socket per client, re-established when it drops
//! - Strict request/response ordering, no pooling or retries
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                               │
//! │            (ping / get / put / del / set_db)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Protocol Codec                            │
//! │       (request framing, validation, status parsing)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Connection (Transport)                      │
//! │          (single TCP socket, timeouts, re-dial)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use finedb::Client;
//!
//! # fn main() -> finedb::Result<()> {
//! let mut client = Client::new("127.0.0.1", 7777);
//! client.put("greeting", b"hello")?;
//! assert_eq!(client.get("greeting")?, Some(b"hello".to_vec()));
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FineError, Result};
pub use config::Config;
pub use client::Client;
pub use network::{Connection, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the FineDB client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
