//! Network Module
//!
//! TCP connection handling for the client.
//!
//! ## Architecture
//! - One socket per client, dialed lazily
//! - Liveness re-checked before every request
//! - No framing here; bytes are interpreted by the protocol codec

mod connection;
mod transport;

pub use connection::Connection;
pub use transport::Transport;
