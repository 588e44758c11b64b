//! Error taxonomy
//!
//! Maps the single error byte carried by an error-flagged response to a
//! typed value. Codes below `0xF0` originate on the server; codes at or
//! above `0xF0` are synthesized by the client and never sent on the wire.
//!
//! ### Codes
//! - 0x01: KEY_NOT_FOUND
//! - 0x02: KEY_EXPIRED
//! - 0x03: VALUE_TOO_LARGE
//! - 0x04: BAD_REQUEST
//! - 0x05: INTERNAL_SERVER_ERROR
//! - 0xF1: CLIENT_TIMEOUT
//! - 0xF2: CLIENT_CLOSED
//! - anything else: UNKNOWN (reported as 0xFF)

use thiserror::Error;

/// First code reserved for client-local conditions
pub const CLIENT_CODE_BASE: u8 = 0xF0;

/// A server-reported or client-local error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(u8)]
pub enum KvError {
    #[error("key not found")]
    KeyNotFound = 0x01,

    #[error("key value expired")]
    KeyExpired = 0x02,

    #[error("key value too large")]
    ValueTooLarge = 0x03,

    #[error("bad request")]
    BadRequest = 0x04,

    #[error("internal server error")]
    InternalServer = 0x05,

    #[error("client timeout")]
    ClientTimeout = 0xF1,

    #[error("client closed")]
    ClientClosed = 0xF2,

    #[error("unknown error")]
    Unknown = 0xFF,
}

impl KvError {
    /// Map any byte to its error kind. Unrecognized bytes become `Unknown`.
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => KvError::KeyNotFound,
            0x02 => KvError::KeyExpired,
            0x03 => KvError::ValueTooLarge,
            0x04 => KvError::BadRequest,
            0x05 => KvError::InternalServer,
            0xF1 => KvError::ClientTimeout,
            0xF2 => KvError::ClientClosed,
            _ => KvError::Unknown,
        }
    }

    /// Numeric code of this error
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable message
    pub fn message(self) -> &'static str {
        match self {
            KvError::KeyNotFound => "key not found",
            KvError::KeyExpired => "key value expired",
            KvError::ValueTooLarge => "key value too large",
            KvError::BadRequest => "bad request",
            KvError::InternalServer => "internal server error",
            KvError::ClientTimeout => "client timeout",
            KvError::ClientClosed => "client closed",
            KvError::Unknown => "unknown error",
        }
    }

    /// True for the kinds a server reports in-band
    pub fn is_server_error(self) -> bool {
        !matches!(self, KvError::Unknown) && self.code() < CLIENT_CODE_BASE
    }

    /// True for conditions raised locally by the client
    pub fn is_client_error(self) -> bool {
        matches!(self, KvError::ClientTimeout | KvError::ClientClosed)
    }
}
