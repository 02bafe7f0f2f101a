//! Codec Tests
//!
//! Tests for request framing, validation and response parsing.

use std::io::{Cursor, ErrorKind};

use finedb::protocol::{
    decode_request, encode_request, encode_status, encode_value, read_request, read_status,
    read_value, validate_db_name, validate_key, write_request, write_value, Request,
    MAX_DB_NAME_LENGTH, MAX_KEY_LENGTH,
};
use finedb::FineError;

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_put() {
    let encoded = encode_request(&Request::put("abc", &[0x01, 0x02])).unwrap();

    // [0x13][0x00 0x03][a b c][0x00 0x00 0x00 0x02][0x01 0x02]
    //  op    key_len    key    data_len             data
    assert_eq!(
        &encoded[..],
        &[0x13, 0x00, 0x03, 0x61, 0x62, 0x63, 0x00, 0x00, 0x00, 0x02, 0x01, 0x02]
    );
}

#[test]
fn test_wire_format_ping() {
    let encoded = encode_request(&Request::Ping).unwrap();
    assert_eq!(&encoded[..], &[0x10]);
}

#[test]
fn test_wire_format_get() {
    let encoded = encode_request(&Request::get("test")).unwrap();
    assert_eq!(&encoded[..], &[0x11, 0x00, 0x04, b't', b'e', b's', b't']);
}

#[test]
fn test_wire_format_del() {
    let encoded = encode_request(&Request::del("k")).unwrap();
    assert_eq!(&encoded[..], &[0x12, 0x00, 0x01, b'k']);
}

#[test]
fn test_wire_format_setdb_default() {
    let encoded = encode_request(&Request::set_db(None)).unwrap();
    assert_eq!(&encoded[..], &[0x14, 0x00]);
}

#[test]
fn test_wire_format_setdb_named() {
    let encoded = encode_request(&Request::set_db(Some("users"))).unwrap();
    assert_eq!(&encoded[..], &[0x14, 0x05, b'u', b's', b'e', b'r', b's']);
}

#[test]
fn test_wire_format_empty_key_and_value() {
    let encoded = encode_request(&Request::put("", &[])).unwrap();
    assert_eq!(&encoded[..], &[0x13, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn test_key_length_counts_utf8_bytes() {
    // "é" is two bytes in UTF-8
    let encoded = encode_request(&Request::get("é")).unwrap();
    assert_eq!(&encoded[..], &[0x11, 0x00, 0x02, 0xC3, 0xA9]);
}

#[test]
fn test_reserved_flags_never_set() {
    let requests = [
        Request::Ping,
        Request::get("a"),
        Request::del("a"),
        Request::put("a", b"b"),
        Request::set_db(None),
        Request::set_db(Some("db")),
    ];

    for request in &requests {
        let encoded = encode_request(request).unwrap();
        assert_eq!(encoded[0] & 0xF0, 0x10, "{:?}", request);
    }
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_max_length_key_accepted() {
    let key = "k".repeat(MAX_KEY_LENGTH);
    let encoded = encode_request(&Request::get(&key)).unwrap();

    assert_eq!(&encoded[1..3], &[0xFF, 0xFF]);
    assert_eq!(encoded.len(), 3 + MAX_KEY_LENGTH);
}

#[test]
fn test_oversized_key_rejected() {
    let key = "k".repeat(MAX_KEY_LENGTH + 1);

    for request in [
        Request::get(&key),
        Request::del(&key),
        Request::put(&key, b"v"),
    ] {
        let err = encode_request(&request).unwrap_err();
        assert!(err.is_protocol());
        assert!(err.to_string().to_lowercase().contains("key too long"));
    }
}

#[test]
fn test_validate_key_bounds() {
    assert!(validate_key(&[]).is_ok());
    assert!(validate_key(&vec![0u8; MAX_KEY_LENGTH]).is_ok());
    assert!(validate_key(&vec![0u8; MAX_KEY_LENGTH + 1]).is_err());
}

#[test]
fn test_validate_db_name() {
    assert!(validate_db_name(b"").is_ok());
    assert!(validate_db_name(b"orders").is_ok());
    assert!(validate_db_name(b"a_b").is_ok());
    assert!(validate_db_name(&vec![b'x'; MAX_DB_NAME_LENGTH]).is_ok());

    assert!(validate_db_name(b"_system").is_err());
    assert!(validate_db_name("caf\u{e9}".as_bytes()).is_err());
    assert!(validate_db_name(&vec![b'x'; MAX_DB_NAME_LENGTH + 1]).is_err());
}

#[test]
fn test_invalid_db_name_messages() {
    let err = encode_request(&Request::set_db(Some("_internal"))).unwrap_err();
    assert!(err.to_string().contains("must not start with '_'"));

    let err = encode_request(&Request::set_db(Some("d\u{f6}b"))).unwrap_err();
    assert!(err.to_string().contains("ASCII"));

    let long = "n".repeat(256);
    let err = encode_request(&Request::set_db(Some(&long))).unwrap_err();
    assert!(err.to_string().contains("too long"));
}

#[test]
fn test_write_request_rejects_without_writing() {
    let mut buffer = Vec::new();
    let key = "k".repeat(MAX_KEY_LENGTH + 1);

    let result = write_request(&mut buffer, &Request::put(&key, b"value"));

    assert!(matches!(result, Err(FineError::Protocol(_))));
    assert!(buffer.is_empty());
}

// =============================================================================
// Request Decoding Tests
// =============================================================================

#[test]
fn test_decode_put_frame() {
    let bytes = [0x13, 0x00, 0x03, 0x61, 0x62, 0x63, 0x00, 0x00, 0x00, 0x02, 0x01, 0x02];
    let decoded = decode_request(&bytes).unwrap();

    assert_eq!(
        decoded,
        Request::Put {
            key: b"abc".to_vec(),
            value: vec![0x01, 0x02],
        }
    );
}

#[test]
fn test_decode_setdb_default() {
    assert_eq!(
        decode_request(&[0x14, 0x00]).unwrap(),
        Request::SetDb { name: None }
    );
}

#[test]
fn test_decode_ignores_reserved_flags() {
    // GET with sync, serialized and compressed bits set
    let decoded = decode_request(&[0x71, 0x00, 0x01, b'x']).unwrap();
    assert_eq!(decoded, Request::get("x"));
}

#[test]
fn test_decode_unknown_opcode() {
    let result = decode_request(&[0x17]);
    assert!(result.unwrap_err().to_string().contains("Unknown command opcode"));
}

#[test]
fn test_decode_undefined_frame_commands() {
    for byte in [0x15, 0x16, 0x1E, 0x1F] {
        let err = decode_request(&[byte]).unwrap_err();
        assert!(err.is_protocol());
        assert!(err.to_string().contains("no defined frame"));
    }
}

#[test]
fn test_decode_incomplete_frame() {
    // Key length says 4, only 2 key bytes present
    let result = decode_request(&[0x11, 0x00, 0x04, b'a', b'b']);
    let err = result.unwrap_err();
    assert!(err.is_protocol());
    assert!(err.to_string().contains("Incomplete"));
}

#[test]
fn test_decode_empty_input() {
    assert!(decode_request(&[]).unwrap_err().is_protocol());
}

#[test]
fn test_decode_trailing_bytes() {
    let result = decode_request(&[0x10, 0x10]);
    assert!(result.unwrap_err().to_string().contains("Trailing bytes"));
}

#[test]
fn test_decode_reserved_db_name() {
    let result = decode_request(&[0x14, 0x02, b'_', b'x']);
    assert!(result.unwrap_err().is_protocol());
}

#[test]
fn test_stream_multiple_requests() {
    let requests = vec![
        Request::Ping,
        Request::put("k1", b"v1"),
        Request::get("k1"),
        Request::del("k1"),
        Request::set_db(Some("other")),
    ];

    let mut buffer = Vec::new();
    for request in &requests {
        write_request(&mut buffer, request).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &requests {
        assert_eq!(&read_request(&mut cursor).unwrap(), expected);
    }
}

#[test]
fn test_read_request_truncated_is_connection_error() {
    let mut cursor = Cursor::new(vec![0x13, 0x00, 0x01, b'k', 0x00, 0x00, 0x00, 0x05, b'v']);
    let err = read_request(&mut cursor).unwrap_err();
    assert!(err.is_connection());
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_read_value_success() {
    let mut cursor = Cursor::new(vec![0x01, 0x00, 0x00, 0x00, 0x02, 0x01, 0x02]);
    let value = read_value(&mut cursor).unwrap();

    assert_eq!(value, Some(vec![0x01, 0x02]));
    assert_eq!(cursor.position(), 7);
}

#[test]
fn test_read_value_failure_consumes_only_status() {
    let mut cursor = Cursor::new(vec![0x00, 0xAA, 0xBB]);
    let value = read_value(&mut cursor).unwrap();

    assert_eq!(value, None);
    assert_eq!(cursor.position(), 1);
}

#[test]
fn test_read_value_empty_payload() {
    let mut cursor = Cursor::new(vec![0x01, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(read_value(&mut cursor).unwrap(), Some(vec![]));
}

#[test]
fn test_read_value_truncated_payload() {
    let mut cursor = Cursor::new(vec![0x01, 0x00, 0x00, 0x00, 0x08, 0x01]);
    let err = read_value(&mut cursor).unwrap_err();

    match err {
        FineError::Connection(e) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("Expected connection error, got {:?}", other),
    }
}

#[test]
fn test_read_value_huge_length_without_data() {
    // Length field claims ~4 GB; must fail on EOF rather than allocate it
    let mut cursor = Cursor::new(vec![0x01, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert!(read_value(&mut cursor).unwrap_err().is_connection());
}

#[test]
fn test_status_bit_zero_only() {
    assert!(read_status(&mut Cursor::new(vec![0x01])).unwrap().is_success());
    assert!(read_status(&mut Cursor::new(vec![0xFF])).unwrap().is_success());
    assert!(!read_status(&mut Cursor::new(vec![0x00])).unwrap().is_success());
    assert!(!read_status(&mut Cursor::new(vec![0xFE])).unwrap().is_success());
}

#[test]
fn test_read_status_eof() {
    let err = read_status(&mut Cursor::new(Vec::new())).unwrap_err();
    assert!(err.is_connection());
}

#[test]
fn test_encode_responses() {
    assert_eq!(&encode_status(true)[..], &[0x01]);
    assert_eq!(&encode_status(false)[..], &[0x00]);
    assert_eq!(&encode_value(None).unwrap()[..], &[0x00]);
    assert_eq!(
        &encode_value(Some(b"hi")).unwrap()[..],
        &[0x01, 0x00, 0x00, 0x00, 0x02, b'h', b'i']
    );
}

#[test]
fn test_stream_write_read_value() {
    let mut buffer = Vec::new();
    write_value(&mut buffer, Some(b"result")).unwrap();
    write_value(&mut buffer, None).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_value(&mut cursor).unwrap(), Some(b"result".to_vec()));
    assert_eq!(read_value(&mut cursor).unwrap(), None);
}
