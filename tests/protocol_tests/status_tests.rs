//! Error Taxonomy Tests
//!
//! Tests for mapping wire error codes to typed errors and classifying them.

use pyrokv::protocol::{KvError, CLIENT_CODE_BASE};
use pyrokv::PyroError;

// =============================================================================
// Mapping Tests
// =============================================================================

#[test]
fn test_documented_codes() {
    assert_eq!(KvError::from_code(0x01), KvError::KeyNotFound);
    assert_eq!(KvError::from_code(0x02), KvError::KeyExpired);
    assert_eq!(KvError::from_code(0x03), KvError::ValueTooLarge);
    assert_eq!(KvError::from_code(0x04), KvError::BadRequest);
    assert_eq!(KvError::from_code(0x05), KvError::InternalServer);
    assert_eq!(KvError::from_code(0xF1), KvError::ClientTimeout);
    assert_eq!(KvError::from_code(0xF2), KvError::ClientClosed);
}

#[test]
fn test_mapping_is_total() {
    let known = [0x01, 0x02, 0x03, 0x04, 0x05, 0xF1, 0xF2];

    for byte in 0..=u8::MAX {
        let kind = KvError::from_code(byte);
        if known.contains(&byte) {
            assert_eq!(kind.code(), byte, "code 0x{:02x} should round-trip", byte);
        } else {
            assert_eq!(kind, KvError::Unknown, "code 0x{:02x} should be unknown", byte);
        }
    }
}

#[test]
fn test_unknown_code_value() {
    assert_eq!(KvError::Unknown.code(), 0xFF);
    assert_eq!(KvError::from_code(0x00).message(), "unknown error");
}

#[test]
fn test_messages() {
    assert_eq!(KvError::KeyNotFound.message(), "key not found");
    assert_eq!(KvError::KeyExpired.message(), "key value expired");
    assert_eq!(KvError::ValueTooLarge.message(), "key value too large");
    assert_eq!(KvError::BadRequest.message(), "bad request");
    assert_eq!(KvError::InternalServer.message(), "internal server error");
    assert_eq!(KvError::ClientTimeout.message(), "client timeout");
    assert_eq!(KvError::ClientClosed.message(), "client closed");

    // Display matches message()
    for byte in 0..=u8::MAX {
        let kind = KvError::from_code(byte);
        assert_eq!(kind.to_string(), kind.message());
    }
}

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn test_server_and_client_origin() {
    for kind in [
        KvError::KeyNotFound,
        KvError::KeyExpired,
        KvError::ValueTooLarge,
        KvError::BadRequest,
        KvError::InternalServer,
    ] {
        assert!(kind.is_server_error());
        assert!(!kind.is_client_error());
        assert!(kind.code() < CLIENT_CODE_BASE);
    }

    for kind in [KvError::ClientTimeout, KvError::ClientClosed] {
        assert!(kind.is_client_error());
        assert!(!kind.is_server_error());
        assert!(kind.code() >= CLIENT_CODE_BASE);
    }

    assert!(!KvError::Unknown.is_server_error());
    assert!(!KvError::Unknown.is_client_error());
}

#[test]
fn test_error_predicates() {
    let err: PyroError = KvError::KeyNotFound.into();
    assert!(err.is_key_not_found());
    assert!(!err.is_timeout());
    assert_eq!(err.kv_error(), Some(KvError::KeyNotFound));
    assert_eq!(err.to_string(), "key not found");

    assert!(PyroError::from(KvError::KeyExpired).is_key_expired());
    assert!(PyroError::from(KvError::ValueTooLarge).is_value_too_large());
    assert!(PyroError::from(KvError::BadRequest).is_bad_request());
    assert!(PyroError::from(KvError::InternalServer).is_internal_server_error());
    assert!(PyroError::from(KvError::ClientTimeout).is_timeout());
    assert!(PyroError::from(KvError::ClientClosed).is_closed());
}

#[test]
fn test_predicates_on_other_errors() {
    let err = PyroError::Protocol("bad".to_string());
    assert_eq!(err.kv_error(), None);
    assert!(!err.is_key_not_found());
    assert!(!err.is_closed());
}
