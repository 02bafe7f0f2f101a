//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! All multi-byte integers are big-endian. Byte 0 of every request is
//! `opcode (low nibble) | flags (high nibble)`.
//!
//! ### Request Frames
//! ```text
//! PING          ┌────────┐
//!               │ Op (1) │
//!               └────────┘
//! GET / DEL     ┌────────┬─────────────┬──────────────┐
//!               │ Op (1) │ KeyLen (2)  │ Key          │
//!               └────────┴─────────────┴──────────────┘
//! PUT           ┌────────┬─────────────┬──────────────┬─────────────┬──────────┐
//!               │ Op (1) │ KeyLen (2)  │ Key          │ DataLen (4) │ Data     │
//!               └────────┴─────────────┴──────────────┴─────────────┴──────────┘
//! SETDB         ┌────────┬─────────────┬──────────────┐
//!               │ Op (1) │ NameLen (1) │ Name         │   (NameLen 0 = default db)
//!               └────────┴─────────────┴──────────────┘
//! ```
//!
//! ### Response Frames
//! ```text
//! PING/PUT/DEL/SETDB  ┌───────────┐
//!                     │ Status(1) │
//!                     └───────────┘
//! GET (success)       ┌───────────┬──────────┬──────────┐
//!                     │ Status(1) │ Len (4)  │ Value    │
//!                     └───────────┴──────────┴──────────┘
//! ```
//!
//! A GET whose status byte has bit 0 clear carries nothing after the status.

use std::io::{Cursor, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::{header_byte, CommandType, Flags, Request, Status};
use crate::error::{FineError, Result};

/// Maximum encoded key length (2-byte length field)
pub const MAX_KEY_LENGTH: usize = 0xFFFF;

/// Maximum encoded database name length (1-byte length field)
pub const MAX_DB_NAME_LENGTH: usize = 0xFF;

/// Database names starting with this byte are reserved for the server
pub const RESERVED_DB_PREFIX: u8 = b'_';

/// Size of the key length field
pub const KEY_LEN_SIZE: usize = 2;

/// Size of the data length field
pub const DATA_LEN_SIZE: usize = 4;

// =============================================================================
// Validation
// =============================================================================

/// Check a key fits its 2-byte length field
pub fn validate_key(key: &[u8]) -> Result<()> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(FineError::Protocol(format!(
            "Key too long: {} bytes (max {})",
            key.len(),
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Check a database name is ASCII, unreserved and fits its 1-byte length field
pub fn validate_db_name(name: &[u8]) -> Result<()> {
    if !name.is_ascii() {
        return Err(FineError::Protocol(
            "Database name must be pure ASCII".to_string(),
        ));
    }

    if name.first() == Some(&RESERVED_DB_PREFIX) {
        return Err(FineError::Protocol(
            "Database name must not start with '_' (reserved for system databases)".to_string(),
        ));
    }

    if name.len() > MAX_DB_NAME_LENGTH {
        return Err(FineError::Protocol(format!(
            "Database name too long: {} bytes (max {})",
            name.len(),
            MAX_DB_NAME_LENGTH
        )));
    }

    Ok(())
}

fn data_length(value: &[u8]) -> Result<u32> {
    u32::try_from(value.len()).map_err(|_| {
        FineError::Protocol(format!(
            "Value too large: {} bytes (max {})",
            value.len(),
            u32::MAX
        ))
    })
}

// =============================================================================
// Request Encoding
// =============================================================================

/// Validate and encode a request frame
pub fn encode_request(request: &Request) -> Result<Bytes> {
    let header = header_byte(request.command_type(), request.flags());

    let frame = match request {
        Request::Ping => {
            let mut buf = BytesMut::with_capacity(1);
            buf.put_u8(header);
            buf
        }
        Request::Get { key } | Request::Del { key } => {
            validate_key(key)?;
            let mut buf = BytesMut::with_capacity(1 + KEY_LEN_SIZE + key.len());
            buf.put_u8(header);
            put_key(&mut buf, key);
            buf
        }
        Request::Put { key, value } => {
            validate_key(key)?;
            let value_len = data_length(value)?;
            let mut buf = BytesMut::with_capacity(
                1 + KEY_LEN_SIZE + key.len() + DATA_LEN_SIZE + value.len(),
            );
            buf.put_u8(header);
            put_key(&mut buf, key);
            buf.put_u32(value_len);
            buf.put_slice(value);
            buf
        }
        Request::SetDb { name: None } => {
            let mut buf = BytesMut::with_capacity(2);
            buf.put_u8(header);
            buf.put_u8(0);
            buf
        }
        Request::SetDb { name: Some(name) } => {
            validate_db_name(name)?;
            let mut buf = BytesMut::with_capacity(2 + name.len());
            buf.put_u8(header);
            buf.put_u8(name.len() as u8);
            buf.put_slice(name);
            buf
        }
    };

    Ok(frame.freeze())
}

fn put_key(buf: &mut BytesMut, key: &[u8]) {
    // Low two bytes of the 4-byte length; validate_key keeps the high two zero
    buf.put_u16(key.len() as u16);
    buf.put_slice(key);
}

/// Write a request to a stream
///
/// The request is fully validated before the first byte is written.
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Request Decoding
// =============================================================================

/// Decode exactly one request frame from bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let mut cursor = Cursor::new(bytes);

    let request = match read_request(&mut cursor) {
        Ok(request) => request,
        Err(FineError::Connection(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(FineError::Protocol(format!(
                "Incomplete request frame: {} bytes",
                bytes.len()
            )));
        }
        Err(e) => return Err(e),
    };

    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(FineError::Protocol(format!(
            "Trailing bytes after request: {} unused",
            bytes.len() - consumed
        )));
    }

    Ok(request)
}

/// Read a complete request from a stream
///
/// Blocks until a complete frame is received or an error occurs. Reserved
/// flag bits are ignored.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let header = read_u8(reader)?;
    let opcode = header & super::OPCODE_MASK;

    let command = CommandType::from_opcode(opcode).ok_or_else(|| {
        FineError::Protocol(format!("Unknown command opcode: 0x{:x}", opcode))
    })?;

    let flags = Flags::from_bits(header);
    tracing::trace!(?command, flags = flags.bits(), "decoding request");

    match command {
        CommandType::Ping => Ok(Request::Ping),
        CommandType::Get => Ok(Request::Get {
            key: read_key(reader)?,
        }),
        CommandType::Del => Ok(Request::Del {
            key: read_key(reader)?,
        }),
        CommandType::Put => {
            let key = read_key(reader)?;
            let value_len = read_u32(reader)? as usize;
            let value = read_bytes(reader, value_len)?;
            Ok(Request::Put { key, value })
        }
        CommandType::SetDb => {
            let name_len = read_u8(reader)? as usize;
            if name_len == 0 {
                return Ok(Request::SetDb { name: None });
            }
            let name = read_bytes(reader, name_len)?;
            validate_db_name(&name)?;
            Ok(Request::SetDb { name: Some(name) })
        }
        CommandType::Start | CommandType::Stop | CommandType::Admin | CommandType::Extra => {
            Err(FineError::Protocol(format!(
                "Command {:?} has no defined frame",
                command
            )))
        }
    }
}

fn read_key<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut len = [0u8; KEY_LEN_SIZE];
    reader.read_exact(&mut len)?;
    read_bytes(reader, u16::from_be_bytes(len) as usize)
}

// =============================================================================
// Response Encoding
// =============================================================================

/// Encode a status-only response (PING, PUT, DEL, SETDB)
pub fn encode_status(success: bool) -> Bytes {
    Bytes::copy_from_slice(&[Status::from_success(success).byte()])
}

/// Encode a GET response; `None` encodes a failure status with no payload
pub fn encode_value(value: Option<&[u8]>) -> Result<Bytes> {
    match value {
        Some(value) => {
            let len = data_length(value)?;
            let mut buf = BytesMut::with_capacity(1 + DATA_LEN_SIZE + value.len());
            buf.put_u8(Status::SUCCESS.byte());
            buf.put_u32(len);
            buf.put_slice(value);
            Ok(buf.freeze())
        }
        None => Ok(encode_status(false)),
    }
}

/// Write a status-only response to a stream
pub fn write_status<W: Write>(writer: &mut W, success: bool) -> Result<()> {
    writer.write_all(&encode_status(success))?;
    writer.flush()?;
    Ok(())
}

/// Write a GET response to a stream
pub fn write_value<W: Write>(writer: &mut W, value: Option<&[u8]>) -> Result<()> {
    let bytes = encode_value(value)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Read the single status byte that starts every response
pub fn read_status<R: Read>(reader: &mut R) -> Result<Status> {
    Ok(Status::from_byte(read_u8(reader)?))
}

/// Read a GET response
///
/// On success the length-prefixed value follows the status byte. On failure
/// nothing else is read and `None` is returned.
pub fn read_value<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let status = read_status(reader)?;
    if !status.is_success() {
        return Ok(None);
    }

    let len = read_u32(reader)? as usize;
    read_bytes(reader, len).map(Some)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; DATA_LEN_SIZE];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Read exactly `len` bytes
///
/// Grows the buffer as bytes arrive rather than trusting the length field for
/// a single up-front allocation.
fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(64 * 1024));
    reader.by_ref().take(len as u64).read_to_end(&mut buf)?;

    if buf.len() != len {
        return Err(FineError::Connection(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, stream ended after {}", len, buf.len()),
        )));
    }

    Ok(buf)
}
