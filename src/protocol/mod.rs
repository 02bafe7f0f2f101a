//! Protocol Module
//!
//! Defines the FineDB wire protocol for client-server communication.
//!
//! ## Request Header (byte 0)
//! ```text
//! ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! │ 7 │ 6 │ 5 │ 4 │ 3 │ 2 │ 1 │ 0 │
//! └───┴───┴───┴───┴───┴───┴───┴───┘
//!  SRV CMP SER SYN └─── opcode ───┘
//! ```
//!
//! ### Opcodes
//! - 0x0: PING
//! - 0x1: GET   - Payload: key_len (2) + key
//! - 0x2: DEL   - Payload: key_len (2) + key
//! - 0x3: PUT   - Payload: key_len (2) + key + data_len (4) + data
//! - 0x4: SETDB - Payload: name_len (1) + name
//! - 0x5 START, 0x6 STOP, 0xE ADMIN, 0xF EXTRA: reserved, no frame defined
//!
//! ### Response
//! One status byte (bit 0 set = success). A successful GET follows it with
//! data_len (4) + data.

mod command;
mod response;
mod codec;

pub use command::{header_byte, CommandType, Flags, Request, FLAGS_MASK, OPCODE_MASK};
pub use response::{Status, SUCCESS_BIT};
pub use codec::{
    encode_request, read_status, read_value, validate_db_name, validate_key, write_request,
    MAX_DB_NAME_LENGTH, MAX_KEY_LENGTH, RESERVED_DB_PREFIX,
};

// Server side of the wire format, for in-process test servers and benches
#[doc(hidden)]
pub use codec::{
    decode_request, encode_status, encode_value, read_request, write_status, write_value,
};
