//! Stream frame reader
//!
//! A byte stream gives no guarantee that one read returns one frame: a read
//! may end in the middle of a frame, or carry several frames back to back.
//! [`FrameReader`] buffers incoming bytes and hands each complete frame to
//! the frame codec, keeping any partial tail for the next read.

use bytes::{Buf, BytesMut};

use super::frame::{decode_frame, frame_len, Frame, MAX_PAYLOAD_SIZE};
use super::header::{Header, HEADER_SIZE};
use crate::error::{PyroError, Result};

/// Default initial buffer capacity (64 KB)
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Accumulates stream bytes and extracts complete frames
pub struct FrameReader {
    buffer: BytesMut,
    max_payload_size: u32,
}

impl FrameReader {
    pub fn new() -> Self {
        Self::with_max_payload(MAX_PAYLOAD_SIZE)
    }

    pub fn with_max_payload(max_payload_size: u32) -> Self {
        Self {
            buffer: BytesMut::with_capacity(DEFAULT_BUFFER_CAPACITY),
            max_payload_size,
        }
    }

    /// Append freshly read bytes and return every frame now complete
    ///
    /// An error means the stream declared a payload larger than allowed; the
    /// stream position can no longer be trusted after that.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Extract one complete frame if the buffer holds one
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        let header_bytes: &[u8; HEADER_SIZE] = match self
            .buffer
            .get(..HEADER_SIZE)
            .and_then(|slice| slice.try_into().ok())
        {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let payload_len = Header::decode(header_bytes).payload_len;
        if payload_len > self.max_payload_size {
            return Err(PyroError::Protocol(format!(
                "Payload too large: {} bytes (max {})",
                payload_len, self.max_payload_size
            )));
        }

        let frame_len = frame_len(payload_len)?;
        if self.buffer.len() < frame_len {
            // Grow in bounded steps; the declared length is not yet backed by data
            let missing = frame_len - self.buffer.len();
            self.buffer.reserve(missing.min(DEFAULT_BUFFER_CAPACITY));
            return Ok(None);
        }

        let frame = decode_frame(&self.buffer[..frame_len])?;
        self.buffer.advance(frame_len);
        Ok(Some(frame))
    }

    /// Number of buffered bytes not yet part of a complete frame
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop any buffered bytes
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}
