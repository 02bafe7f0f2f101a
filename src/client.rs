//! Client Module
//!
//! The public FineDB operations: PING, GET, PUT, DEL and SETDB.
//!
//! ## Exchange
//! Every operation:
//! 1. Ensures the connection is live (re-dialing if needed)
//! 2. Validates and encodes its request frame
//! 3. Writes the frame
//! 4. Blocks reading the status byte (and, for GET, the value)
//!
//! Nothing is retried. A negative status from the server is a normal result
//! (`false` / `None`), not an error.

use std::io::Write;

use crate::config::Config;
use crate::error::{FineError, Result};
use crate::network::{Connection, Transport};
use crate::protocol::{encode_request, read_status, read_value, Request};

/// Synchronous FineDB client over a single connection
///
/// ## Concurrency
///
/// One request is in flight at a time and responses carry no request id, so
/// every operation takes `&mut self`. Share a client between threads only
/// behind your own lock, or give each thread its own client.
pub struct Client<T: Transport = Connection> {
    transport: T,
}

impl Client<Connection> {
    /// Client for `host:port` with default timeouts; does not connect yet
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_config(Config::new(host, port))
    }

    /// Client with explicit connection settings; does not connect yet
    pub fn with_config(config: Config) -> Self {
        Self::with_transport(Connection::new(config))
    }
}

impl<T: Transport> Client<T> {
    /// Client over an arbitrary transport
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the client, returning its transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Whether the underlying connection is currently usable
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the connection; the next operation re-dials
    pub fn close(&mut self) {
        self.transport.close();
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Check the server answers
    pub fn ping(&mut self) -> Result<bool> {
        self.send(&Request::Ping)?;
        let status = self.receive(|t| read_status(t))?;
        Ok(status.is_success())
    }

    /// Fetch the value stored under `key`
    ///
    /// Returns `None` when the server answers with a failure status, which
    /// covers both a missing key and a refused read.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        self.send(&Request::get(key))?;
        self.receive(|t| read_value(t))
    }

    /// Store `data` under `key`
    pub fn put(&mut self, key: &str, data: &[u8]) -> Result<bool> {
        self.send(&Request::put(key, data))?;
        let status = self.receive(|t| read_status(t))?;
        Ok(status.is_success())
    }

    /// Remove `key`
    pub fn del(&mut self, key: &str) -> Result<bool> {
        self.send(&Request::del(key))?;
        let status = self.receive(|t| read_status(t))?;
        Ok(status.is_success())
    }

    /// Select the database used by later requests on this connection
    ///
    /// `None` selects the default database. Names must be ASCII, at most 255
    /// bytes, and must not start with `_`.
    pub fn set_db(&mut self, name: Option<&str>) -> Result<bool> {
        self.send(&Request::set_db(name))?;
        let status = self.receive(|t| read_status(t))?;
        Ok(status.is_success())
    }

    // =========================================================================
    // Exchange helpers
    // =========================================================================

    /// Connect, encode, write
    ///
    /// A request that fails validation is never written.
    fn send(&mut self, request: &Request) -> Result<()> {
        self.transport.ensure_connected()?;

        let frame = encode_request(request)?;

        tracing::trace!(
            command = ?request.command_type(),
            len = frame.len(),
            "sending request"
        );

        let result = self
            .transport
            .write_all(&frame)
            .and_then(|_| self.transport.flush())
            .map_err(FineError::from);
        self.drop_on_failure(result)
    }

    fn receive<R>(&mut self, read: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let result = read(&mut self.transport);
        self.drop_on_failure(result)
    }

    /// A failed exchange leaves the stream mid-frame; never reuse it
    fn drop_on_failure<R>(&mut self, result: Result<R>) -> Result<R> {
        if let Err(FineError::Connection(ref e)) = result {
            tracing::warn!("Exchange failed, dropping connection: {}", e);
            self.transport.close();
        }
        result
    }
}
