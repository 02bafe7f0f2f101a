//! Response definitions
//!
//! Every response starts with a single status byte.

/// Bit 0 of the status byte: set on success
pub const SUCCESS_BIT: u8 = 0x01;

/// Response status byte
///
/// Only bit 0 carries meaning; the remaining bits are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u8);

impl Status {
    pub const SUCCESS: Status = Status(SUCCESS_BIT);
    pub const FAILURE: Status = Status(0x00);

    pub fn from_byte(byte: u8) -> Self {
        Status(byte)
    }

    pub fn from_success(success: bool) -> Self {
        if success {
            Status::SUCCESS
        } else {
            Status::FAILURE
        }
    }

    /// Raw byte as received
    pub fn byte(self) -> u8 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 & SUCCESS_BIT != 0
    }
}
