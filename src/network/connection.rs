//! Connection Manager
//!
//! Owns the single TCP socket of a client and re-dials it whenever it is no
//! longer usable.

use std::io::{self, BufReader, BufWriter, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use super::Transport;
use crate::config::Config;
use crate::error::{FineError, Result};

/// Handles to one established socket
struct Stream {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: SocketAddr,
}

/// A lazily established TCP connection to one FineDB server
pub struct Connection {
    config: Config,
    stream: Option<Stream>,
}

impl Connection {
    /// Create a connection manager; no socket is opened until first use
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Settings used for every dial
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Address of the connected server, if any
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.as_ref().map(|s| s.peer_addr)
    }

    /// Whether the socket exists and is still usable in both directions
    ///
    /// Re-derived from the socket on every call: the peer may have closed it
    /// or the kernel may hold a pending error since the last operation.
    pub fn is_connected(&self) -> bool {
        let Some(stream) = &self.stream else {
            return false;
        };
        let socket = stream.writer.get_ref();

        if socket.peer_addr().is_err() {
            return false;
        }

        if !matches!(socket.take_error(), Ok(None)) {
            return false;
        }

        if !stream.reader.buffer().is_empty() {
            return true;
        }

        peer_open(socket)
    }

    /// Dial the server unless the current socket is still usable
    pub fn ensure_connected(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        if let Some(old) = self.stream.take() {
            tracing::debug!("Connection to {} lost, re-dialing", old.peer_addr);
        }

        let socket = self.dial()?;
        let peer_addr = socket.peer_addr()?;

        // Clone stream for separate read/write handles
        let read_stream = socket.try_clone()?;
        let write_stream = socket;

        self.stream = Some(Stream {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        });

        tracing::debug!("Connected to {}", peer_addr);
        Ok(())
    }

    /// Drop the socket; linger is zero so the close is abortive
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            tracing::debug!("Closing connection to {}", stream.peer_addr);
        }
    }

    /// Try every resolved address in order until one connects
    fn dial(&self) -> Result<TcpStream> {
        let host = self.config.host.as_str();
        let port = self.config.port;

        if port == 0 {
            return Err(FineError::Connection(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no port configured for {}", host),
            )));
        }

        let mut last_err = None;
        for addr in (host, port).to_socket_addrs()? {
            match open_socket(&addr, &self.config) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        let err = last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no addresses resolved for {}:{}", host, port),
            )
        });
        Err(FineError::Connection(err))
    }

    fn stream_mut(&mut self) -> io::Result<&mut Stream> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "not connected"))
    }
}

/// Open and configure one socket
fn open_socket(addr: &SocketAddr, config: &Config) -> io::Result<TcpStream> {
    let socket = Socket::new(Domain::for_address(*addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_keepalive(true)?;
    socket.set_linger(Some(Duration::ZERO))?;

    let target = SockAddr::from(*addr);
    if config.connect_timeout_ms > 0 {
        socket.connect_timeout(&target, config.connect_timeout())?;
    } else {
        socket.connect(&target)?;
    }

    let stream: TcpStream = socket.into();

    // Disable Nagle's algorithm for low latency
    stream.set_nodelay(true)?;

    if config.read_timeout_ms > 0 {
        stream.set_read_timeout(Some(config.read_timeout()))?;
    }
    if config.write_timeout_ms > 0 {
        stream.set_write_timeout(Some(config.write_timeout()))?;
    }

    Ok(stream)
}

/// Non-blocking peek: end of stream means the peer has closed its side
fn peer_open(socket: &TcpStream) -> bool {
    if socket.set_nonblocking(true).is_err() {
        return false;
    }

    let mut probe = [0u8; 1];
    let open = match socket.peek(&mut probe) {
        Ok(0) => false,
        Ok(_) => true,
        Err(e) => e.kind() == io::ErrorKind::WouldBlock,
    };

    socket.set_nonblocking(false).is_ok() && open
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream_mut()?.reader.read(buf)
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream_mut()?.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream_mut()?.writer.flush()
    }
}

impl Transport for Connection {
    fn is_connected(&self) -> bool {
        Connection::is_connected(self)
    }

    fn ensure_connected(&mut self) -> Result<()> {
        Connection::ensure_connected(self)
    }

    fn close(&mut self) {
        Connection::close(self)
    }
}
