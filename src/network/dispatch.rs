//! Delivery loop
//!
//! The single reader of the connection. Reads raw bytes, cuts them into
//! frames with a [`FrameReader`], and routes each frame to the pending
//! request carrying the same correlation id.
//!
//! The loop ends when the read side fails or reaches EOF, or when the stream
//! declares a payload larger than allowed. Requests still pending are not
//! notified; they resolve through their own timeout.

use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::protocol::{Frame, FrameReader, HEADER_SIZE};

use super::pending::{Delivery, PendingRequests};

/// Everything the delivery loop needs, moved onto its thread
pub struct Dispatcher<R> {
    reader: R,
    frames: FrameReader,
    pending: Arc<PendingRequests>,
    connected: Arc<AtomicBool>,
    read_buffer_size: usize,
    peer_addr: String,
}

impl<R: Read> Dispatcher<R> {
    pub fn new(
        reader: R,
        pending: Arc<PendingRequests>,
        connected: Arc<AtomicBool>,
        max_payload_size: u32,
        read_buffer_size: usize,
        peer_addr: String,
    ) -> Self {
        Self {
            reader,
            frames: FrameReader::with_max_payload(max_payload_size),
            pending,
            connected,
            read_buffer_size: read_buffer_size.max(HEADER_SIZE),
            peer_addr,
        }
    }

    /// Run until the connection can no longer be read
    pub fn run(mut self) {
        let mut buf = vec![0u8; self.read_buffer_size];

        loop {
            let n = match self.reader.read(&mut buf) {
                Ok(0) => {
                    tracing::debug!("Connection to {} closed by peer", self.peer_addr);
                    break;
                }
                Ok(n) => n,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!("Read from {} failed: {}", self.peer_addr, e);
                    break;
                }
            };

            let frames = match self.frames.push(&buf[..n]) {
                Ok(frames) => frames,
                Err(e) => {
                    tracing::error!("Unrecoverable stream from {}: {}", self.peer_addr, e);
                    break;
                }
            };

            for frame in frames {
                self.route(frame);
            }
        }

        self.connected.store(false, Ordering::Release);
        tracing::debug!(
            "Delivery loop for {} stopped with {} request(s) pending",
            self.peer_addr,
            self.pending.len()
        );
    }

    fn route(&self, frame: Frame) {
        let header = frame.header;

        if header.payload_len as usize != frame.payload.len() {
            tracing::warn!(
                "Dropping frame {}: declared {} payload bytes, got {}",
                header.request_id,
                header.payload_len,
                frame.payload.len()
            );
            return;
        }

        if !header.is_known_protocol() {
            tracing::warn!(
                "Dropping frame {}: unexpected magic 0x{:04x} / version {}",
                header.request_id,
                header.magic,
                header.version
            );
            return;
        }

        match self.pending.deliver(frame) {
            Delivery::Delivered => {
                tracing::trace!("Delivered response for request {}", header.request_id);
            }
            Delivery::SlotFull => {
                tracing::debug!("Duplicate response for request {} dropped", header.request_id);
            }
            Delivery::NoWaiter => {
                tracing::debug!(
                    "No pending request {} (frame type {}), dropped",
                    header.request_id,
                    header.frame_type
                );
            }
        }
    }
}
