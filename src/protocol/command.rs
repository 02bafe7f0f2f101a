//! Command definitions
//!
//! Opcodes, request flag bits, and the requests a client can send.

use std::ops::BitOr;

/// Command opcodes (low nibble of a request's first byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    Ping = 0x0,
    Get = 0x1,
    Del = 0x2,
    Put = 0x3,
    SetDb = 0x4,
    Start = 0x5,
    Stop = 0x6,
    Admin = 0xE,
    Extra = 0xF,
}

impl CommandType {
    /// Opcode value (fits in 4 bits)
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Map a low nibble back to its command, if one is assigned
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode & OPCODE_MASK {
            0x0 => Some(CommandType::Ping),
            0x1 => Some(CommandType::Get),
            0x2 => Some(CommandType::Del),
            0x3 => Some(CommandType::Put),
            0x4 => Some(CommandType::SetDb),
            0x5 => Some(CommandType::Start),
            0x6 => Some(CommandType::Stop),
            0xE => Some(CommandType::Admin),
            0xF => Some(CommandType::Extra),
            _ => None,
        }
    }
}

/// Mask selecting the opcode from byte 0
pub const OPCODE_MASK: u8 = 0x0F;

/// Mask selecting the flag bits from byte 0
pub const FLAGS_MASK: u8 = 0xF0;

// =============================================================================
// Flags
// =============================================================================

/// Request flag bits (high nibble of a request's first byte)
///
/// Only [`Flags::IS_SYNC`] is ever set by this client. The other bits are
/// reserved by the protocol and always sent as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(0);

    /// Request expects a response before the next one is sent
    pub const IS_SYNC: Flags = Flags(1 << 4);

    /// Reserved: payload is serialized
    pub const IS_SERIALIZED: Flags = Flags(1 << 5);

    /// Reserved: payload is compressed
    pub const IS_COMPRESSED: Flags = Flags(1 << 6);

    /// Reserved: server administration command
    pub const IS_SERVER_COMMAND: Flags = Flags(1 << 7);

    /// Flags from the high nibble of byte 0; the opcode bits are dropped
    pub fn from_bits(byte: u8) -> Self {
        Flags(byte & FLAGS_MASK)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

/// Build byte 0 of a request frame
pub fn header_byte(command: CommandType, flags: Flags) -> u8 {
    (command.opcode() & OPCODE_MASK) | flags.bits()
}

// =============================================================================
// Requests
// =============================================================================

/// A request frame's content
///
/// Keys and database names are held as the exact bytes that go on the wire;
/// length and character checks happen when the request is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Liveness check
    Ping,

    /// Fetch the value stored under a key
    Get { key: Vec<u8> },

    /// Remove a key
    Del { key: Vec<u8> },

    /// Store a value under a key
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Select a database; `None` selects the default one
    SetDb { name: Option<Vec<u8>> },
}

impl Request {
    pub fn get(key: &str) -> Self {
        Request::Get {
            key: key.as_bytes().to_vec(),
        }
    }

    pub fn del(key: &str) -> Self {
        Request::Del {
            key: key.as_bytes().to_vec(),
        }
    }

    pub fn put(key: &str, value: &[u8]) -> Self {
        Request::Put {
            key: key.as_bytes().to_vec(),
            value: value.to_vec(),
        }
    }

    pub fn set_db(name: Option<&str>) -> Self {
        Request::SetDb {
            name: name.map(|n| n.as_bytes().to_vec()),
        }
    }

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Request::Ping => CommandType::Ping,
            Request::Get { .. } => CommandType::Get,
            Request::Del { .. } => CommandType::Del,
            Request::Put { .. } => CommandType::Put,
            Request::SetDb { .. } => CommandType::SetDb,
        }
    }

    /// Flags sent with the request; every request is synchronous
    pub fn flags(&self) -> Flags {
        Flags::IS_SYNC
    }
}
