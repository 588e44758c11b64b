//! Frame codec
//!
//! A frame is a header immediately followed by exactly `payload_len` bytes.
//!
//! ```text
//! ┌──────────────────────┬─────────────────────────────┐
//! │    Header (15)       │   Payload (payload_len)     │
//! └──────────────────────┴─────────────────────────────┘
//! ```
//!
//! There is no extra length prefix and no checksum. [`decode_frame`] reads
//! the first frame in a buffer and ignores anything after it; splitting a
//! byte stream into frames is the job of [`FrameReader`](super::FrameReader).

use std::io::{Read, Write};

use bytes::Bytes;

use super::header::{Flags, FrameType, Header, OpCode, HEADER_SIZE};
use super::status::KvError;
use crate::error::{PyroError, Result};

/// Maximum payload accepted from a stream by default (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Total encoded length of a frame declaring `payload_len` payload bytes
pub fn frame_len(payload_len: u32) -> Result<usize> {
    usize::try_from(payload_len)
        .ok()
        .and_then(|len| len.checked_add(HEADER_SIZE))
        .ok_or_else(|| {
            PyroError::Protocol(format!(
                "Frame length overflow: {} byte payload",
                payload_len
            ))
        })
}

/// One header plus its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: Header,
    pub payload: Bytes,
}

impl Frame {
    /// Pair a header with a payload as-is
    pub fn new(header: Header, payload: impl Into<Bytes>) -> Self {
        Self {
            header,
            payload: payload.into(),
        }
    }

    /// Build a request frame; `payload_len` is taken from the payload
    pub fn request(operation: OpCode, request_id: u32, payload: impl Into<Bytes>) -> Self {
        Self::build(operation, FrameType::Request, Flags::NONE, request_id, payload.into())
    }

    /// Build a successful response frame
    pub fn response(operation: OpCode, request_id: u32, payload: impl Into<Bytes>) -> Self {
        Self::build(operation, FrameType::Response, Flags::NONE, request_id, payload.into())
    }

    /// Build an error-flagged response carrying `error`'s code
    pub fn error_response(operation: OpCode, request_id: u32, error: KvError) -> Self {
        Self::build(
            operation,
            FrameType::Response,
            Flags::ERROR,
            request_id,
            Bytes::copy_from_slice(&[error.code()]),
        )
    }

    /// Build a server-initiated notification frame
    pub fn notification(operation: OpCode, request_id: u32, payload: impl Into<Bytes>) -> Self {
        Self::build(operation, FrameType::Notification, Flags::NONE, request_id, payload.into())
    }

    fn build(
        operation: OpCode,
        frame_type: FrameType,
        flags: Flags,
        request_id: u32,
        payload: Bytes,
    ) -> Self {
        let header = Header::new(operation, frame_type, flags, request_id, payload.len() as u32);
        Self { header, payload }
    }

    /// Total encoded size
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    pub fn encode(&self) -> Vec<u8> {
        encode_frame(&self.header, &self.payload)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_frame(bytes)
    }
}

// =============================================================================
// Frame Encoding/Decoding
// =============================================================================

/// Encode a header followed by the raw payload bytes
pub fn encode_frame(header: &Header, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.extend_from_slice(&header.encode());
    message.extend_from_slice(payload);
    message
}

/// Decode the first frame in `bytes`
pub fn decode_frame(bytes: &[u8]) -> Result<Frame> {
    let header_bytes: &[u8; HEADER_SIZE] = bytes
        .get(..HEADER_SIZE)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(PyroError::HeaderTooShort {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        })?;
    let header = Header::decode(header_bytes);

    let total_len = frame_len(header.payload_len)?;
    let payload_len = total_len - HEADER_SIZE;
    let available = bytes.len() - HEADER_SIZE;
    if available < payload_len {
        return Err(PyroError::PayloadTooShort {
            expected: payload_len,
            actual: available,
        });
    }

    let payload = Bytes::copy_from_slice(&bytes[HEADER_SIZE..total_len]);
    Ok(Frame { header, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read exactly one frame from a blocking stream
///
/// Blocks until the header and the full payload have arrived.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Frame> {
    let mut header_bytes = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header_bytes)?;
    let header = Header::decode(&header_bytes);

    if header.payload_len > MAX_PAYLOAD_SIZE {
        return Err(PyroError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            header.payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut payload = vec![0u8; header.payload_len as usize];
    if !payload.is_empty() {
        reader.read_exact(&mut payload)?;
    }

    Ok(Frame::new(header, payload))
}

/// Write a frame to a stream as one contiguous buffer and flush
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<()> {
    writer.write_all(&frame.encode())?;
    writer.flush()?;
    Ok(())
}
