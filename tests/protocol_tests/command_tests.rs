//! Command Tests
//!
//! Opcodes, flag bits, header bytes and status bits.

use finedb::protocol::{header_byte, CommandType, Flags, Request, Status};

#[test]
fn test_opcodes() {
    assert_eq!(CommandType::Ping.opcode(), 0x0);
    assert_eq!(CommandType::Get.opcode(), 0x1);
    assert_eq!(CommandType::Del.opcode(), 0x2);
    assert_eq!(CommandType::Put.opcode(), 0x3);
    assert_eq!(CommandType::SetDb.opcode(), 0x4);
    assert_eq!(CommandType::Start.opcode(), 0x5);
    assert_eq!(CommandType::Stop.opcode(), 0x6);
    assert_eq!(CommandType::Admin.opcode(), 0xE);
    assert_eq!(CommandType::Extra.opcode(), 0xF);
}

#[test]
fn test_from_opcode() {
    assert_eq!(CommandType::from_opcode(0x3), Some(CommandType::Put));
    // Flag bits are ignored
    assert_eq!(CommandType::from_opcode(0x13), Some(CommandType::Put));
    assert_eq!(CommandType::from_opcode(0xFE), Some(CommandType::Admin));

    for unassigned in 0x7..=0xD {
        assert_eq!(CommandType::from_opcode(unassigned), None);
    }
}

#[test]
fn test_flag_bits() {
    assert_eq!(Flags::IS_SYNC.bits(), 0x10);
    assert_eq!(Flags::IS_SERIALIZED.bits(), 0x20);
    assert_eq!(Flags::IS_COMPRESSED.bits(), 0x40);
    assert_eq!(Flags::IS_SERVER_COMMAND.bits(), 0x80);
    assert_eq!(Flags::default(), Flags::NONE);

    let combined = Flags::IS_SYNC | Flags::IS_COMPRESSED;
    assert!(combined.contains(Flags::IS_SYNC));
    assert!(combined.contains(Flags::IS_COMPRESSED));
    assert!(!combined.contains(Flags::IS_SERIALIZED));

    assert_eq!(Flags::from_bits(0x93), Flags::IS_SYNC | Flags::IS_SERVER_COMMAND);
}

#[test]
fn test_header_byte() {
    assert_eq!(header_byte(CommandType::Put, Flags::IS_SYNC), 0x13);
    assert_eq!(header_byte(CommandType::Ping, Flags::IS_SYNC), 0x10);
    assert_eq!(header_byte(CommandType::Extra, Flags::NONE), 0x0F);
}

#[test]
fn test_request_command_types() {
    assert_eq!(Request::Ping.command_type(), CommandType::Ping);
    assert_eq!(Request::get("k").command_type(), CommandType::Get);
    assert_eq!(Request::del("k").command_type(), CommandType::Del);
    assert_eq!(Request::put("k", b"v").command_type(), CommandType::Put);
    assert_eq!(Request::set_db(None).command_type(), CommandType::SetDb);
}

#[test]
fn test_every_request_is_sync() {
    for request in [Request::Ping, Request::get("k"), Request::set_db(Some("d"))] {
        assert_eq!(request.flags(), Flags::IS_SYNC);
    }
}

#[test]
fn test_status_bits() {
    assert!(Status::SUCCESS.is_success());
    assert!(!Status::FAILURE.is_success());
    assert!(Status::from_byte(0x03).is_success());
    assert!(!Status::from_byte(0x02).is_success());
    assert_eq!(Status::from_success(true), Status::SUCCESS);
    assert_eq!(Status::from_byte(0x80).byte(), 0x80);
}
