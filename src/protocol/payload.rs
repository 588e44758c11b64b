//! Payload codecs
//!
//! Per-operation payload layouts. Every variable field is length-prefixed,
//! so keys and values may hold arbitrary bytes.
//!
//! ```text
//! SET family:        expiry (4) + key_len (4) + key + value_len (4) + value
//! GET/DELETE family: key_len (4) + key
//! Record (GET ok):   expiry (4) + key_len (4) + key + value_len (4) + value
//! ```
//!
//! Encoding does not enforce size limits; the server reports oversize
//! values through an error code.

use crate::error::{PyroError, Result};

/// Expiry value meaning "never expires"
pub const NO_EXPIRY: u32 = 0;

/// A key/value record as returned by a successful GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Unix timestamp in seconds, or [`NO_EXPIRY`]
    pub expiry: u32,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Record {
    pub fn expires(&self) -> bool {
        self.expiry != NO_EXPIRY
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a SET-family payload
pub fn encode_set_payload(key: &[u8], value: &[u8], expiry: u32) -> Vec<u8> {
    let mut payload = Vec::with_capacity(12 + key.len() + value.len());
    payload.extend_from_slice(&expiry.to_be_bytes());
    payload.extend_from_slice(&(key.len() as u32).to_be_bytes());
    payload.extend_from_slice(key);
    payload.extend_from_slice(&(value.len() as u32).to_be_bytes());
    payload.extend_from_slice(value);
    payload
}

/// Encode a GET/DELETE-family payload
pub fn encode_key_payload(key: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(4 + key.len());
    payload.extend_from_slice(&(key.len() as u32).to_be_bytes());
    payload.extend_from_slice(key);
    payload
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a record (the SET-family layout) from a response payload
///
/// Bytes past the declared value are ignored.
pub fn decode_record(payload: &[u8]) -> Result<Record> {
    let mut cursor = PayloadCursor::new(payload, "record");
    let expiry = cursor.read_u32("expiry")?;
    let key = cursor.read_prefixed("key")?.to_vec();
    let value = cursor.read_prefixed("value")?.to_vec();

    Ok(Record { expiry, key, value })
}

/// Decode a GET/DELETE-family payload, returning the key
pub fn decode_key_payload(payload: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = PayloadCursor::new(payload, "key payload");
    Ok(cursor.read_prefixed("key")?.to_vec())
}

/// Bounds-checked reader over a payload slice
struct PayloadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    context: &'static str,
}

impl<'a> PayloadCursor<'a> {
    fn new(buf: &'a [u8], context: &'static str) -> Self {
        Self {
            buf,
            pos: 0,
            context,
        }
    }

    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| {
                PyroError::Protocol(format!(
                    "{}: truncated {} (need {} bytes at offset {}, have {})",
                    self.context,
                    field,
                    len,
                    self.pos,
                    self.buf.len()
                ))
            })?;

        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self, field: &str) -> Result<u32> {
        let bytes = self.take(4, field)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_prefixed(&mut self, field: &str) -> Result<&'a [u8]> {
        let len = self.read_u32(field)? as usize;
        self.take(len, field)
    }
}
