//! PyroKV Client
//!
//! Multiplexes any number of concurrent callers over one connection.
//!
//! ## Request Lifecycle
//! 1. Allocate a correlation id and register a response slot
//! 2. Encode the frame and write it under the write lock
//! 3. Wait on the slot until a response arrives or the timeout elapses
//! 4. Unregister the slot on every path (response, timeout, write failure)
//!
//! Responses may arrive in any order; the delivery loop matches them to
//! callers purely by correlation id.

use std::io::{BufWriter, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossbeam::channel::RecvTimeoutError;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{PyroError, Result};
use crate::protocol::{
    decode_record, encode_key_payload, encode_set_payload, write_frame, Frame, KvError, OpCode,
    Record, NO_EXPIRY,
};

use super::dispatch::Dispatcher;
use super::pending::PendingRequests;

/// A connection to a PyroKV server shared by concurrent callers
///
/// All operations take `&self`; wrap the client in an `Arc` to share it
/// between threads.
pub struct Client {
    /// Write half; one whole frame is written per lock
    writer: Mutex<Box<dyn Write + Send>>,

    /// Requests awaiting a response
    pending: Arc<PendingRequests>,

    /// Cleared by `close` or when the delivery loop stops
    connected: Arc<AtomicBool>,

    /// Socket handle used to tear the connection down
    socket: Option<TcpStream>,

    delivery_thread: Mutex<Option<JoinHandle<()>>>,

    config: ClientConfig,

    /// Peer address for logging
    peer_addr: String,
}

impl Client {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Dial the server named by `config` and start the delivery loop
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let addr = config.addr();
        let mut last_err = None;

        for sock_addr in addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&sock_addr, config.connect_timeout()) {
                Ok(stream) => return Self::from_tcp_stream(stream, config),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", sock_addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(e) => PyroError::Io(e),
            None => PyroError::Config(format!("{} did not resolve to any address", addr)),
        })
    }

    /// Dial using `MCQUEEN_HOST` / `MCQUEEN_PORT`
    pub fn connect_from_env() -> Result<Self> {
        Self::connect(ClientConfig::from_env()?)
    }

    /// Take over an established TCP connection
    pub fn from_tcp_stream(stream: TcpStream, config: ClientConfig) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(config.nodelay)?;
        stream.set_write_timeout(config.write_timeout())?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = BufWriter::new(stream.try_clone()?);

        Self::start(read_stream, write_stream, Some(stream), config, peer_addr)
    }

    /// Run over an arbitrary byte stream split into read and write halves
    ///
    /// The delivery loop stops when `reader` reports EOF or an error;
    /// [`Client::close`] cannot interrupt a blocked read on such a stream.
    pub fn from_parts<R, W>(reader: R, writer: W, config: ClientConfig) -> Result<Self>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        Self::start(reader, writer, None, config, "stream".to_string())
    }

    fn start<R, W>(
        reader: R,
        writer: W,
        socket: Option<TcpStream>,
        config: ClientConfig,
        peer_addr: String,
    ) -> Result<Self>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let pending = Arc::new(PendingRequests::new());
        let connected = Arc::new(AtomicBool::new(true));

        let dispatcher = Dispatcher::new(
            reader,
            Arc::clone(&pending),
            Arc::clone(&connected),
            config.max_payload_size,
            config.read_buffer_size,
            peer_addr.clone(),
        );
        let handle = thread::Builder::new()
            .name("pyrokv-delivery".to_string())
            .spawn(move || dispatcher.run())?;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            writer: Mutex::new(Box::new(writer)),
            pending,
            connected,
            socket,
            delivery_thread: Mutex::new(Some(handle)),
            config,
            peer_addr,
        })
    }

    // =========================================================================
    // Request Multiplexing
    // =========================================================================

    /// Send one request and wait for the frame answering it
    ///
    /// The returned frame has not been checked; see [`validate_response`].
    pub fn issue(&self, operation: OpCode, payload: Vec<u8>) -> Result<Frame> {
        if !self.is_connected() {
            return Err(KvError::ClientClosed.into());
        }

        // Register before writing so a fast response always finds its slot
        let (request_id, slot) = self.pending.register();
        let frame = Frame::request(operation, request_id, payload);

        if let Err(e) = self.send(&frame) {
            self.pending.remove(request_id);
            return Err(e);
        }
        tracing::trace!("Sent {:?} request {}", operation, request_id);

        let outcome = slot.recv_timeout(self.config.request_timeout());
        self.pending.remove(request_id);

        match outcome {
            Ok(response) => Ok(response),
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!("{:?} request {} timed out", operation, request_id);
                Err(KvError::ClientTimeout.into())
            }
            Err(RecvTimeoutError::Disconnected) => Err(KvError::ClientClosed.into()),
        }
    }

    fn send(&self, frame: &Frame) -> Result<()> {
        let mut writer = self.writer.lock();
        write_frame(&mut *writer, frame).map_err(|e| {
            // A partial frame leaves the stream unusable
            tracing::warn!("Write to {} failed: {}", self.peer_addr, e);
            self.connected.store(false, Ordering::Release);
            e
        })
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Store a value that never expires
    pub fn set(&self, key: impl AsRef<[u8]>, value: &[u8]) -> Result<()> {
        self.store(key.as_ref(), value, NO_EXPIRY)
    }

    /// Store a value that expires at `expires_at`
    pub fn set_with_expiry(
        &self,
        key: impl AsRef<[u8]>,
        value: &[u8],
        expires_at: SystemTime,
    ) -> Result<()> {
        self.store(key.as_ref(), value, unix_seconds(expires_at)?)
    }

    /// Store a value that expires `ttl` from now
    pub fn set_with_ttl(&self, key: impl AsRef<[u8]>, value: &[u8], ttl: Duration) -> Result<()> {
        self.set_with_expiry(key, value, SystemTime::now() + ttl)
    }

    fn store(&self, key: &[u8], value: &[u8], expiry: u32) -> Result<()> {
        let response = self.issue(OpCode::Set, encode_set_payload(key, value, expiry))?;
        validate_response(&response)
    }

    /// Fetch the raw bytes stored under `key`
    pub fn get_bytes(&self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        Ok(self.get_record(key)?.value)
    }

    /// Fetch the full record (expiry, key, value) stored under `key`
    pub fn get_record(&self, key: impl AsRef<[u8]>) -> Result<Record> {
        let response = self.issue(OpCode::Get, encode_key_payload(key.as_ref()))?;
        validate_response(&response)?;
        decode_record(&response.payload)
    }

    /// Remove `key`
    pub fn delete(&self, key: impl AsRef<[u8]>) -> Result<()> {
        let response = self.issue(OpCode::Delete, encode_key_payload(key.as_ref()))?;
        validate_response(&response)
    }

    // =========================================================================
    // Typed Values
    // =========================================================================

    /// Serialize `value` with bincode and store it
    pub fn set_value<T: Serialize + ?Sized>(&self, key: impl AsRef<[u8]>, value: &T) -> Result<()> {
        self.set(key, &encode_value(value)?)
    }

    /// Serialize `value` with bincode and store it for `ttl`
    pub fn set_value_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: impl AsRef<[u8]>,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        self.set_with_ttl(key, &encode_value(value)?, ttl)
    }

    /// Fetch and deserialize a value stored with [`Client::set_value`]
    pub fn get_value<T: DeserializeOwned>(&self, key: impl AsRef<[u8]>) -> Result<T> {
        let bytes = self.get_bytes(key)?;
        bincode::deserialize(&bytes).map_err(|e| PyroError::Serialization(e.to_string()))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close the connection and wait for the delivery loop to exit
    ///
    /// Later operations fail with [`KvError::ClientClosed`]. Requests still
    /// waiting resolve through their timeout.
    pub fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::Release);

        let Some(socket) = &self.socket else {
            return Ok(());
        };

        match socket.shutdown(Shutdown::Both) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotConnected => {}
            Err(e) => return Err(e.into()),
        }

        if let Some(handle) = self.delivery_thread.lock().take() {
            if handle.join().is_err() {
                tracing::warn!("Delivery thread for {} panicked", self.peer_addr);
            }
        }

        tracing::debug!("Closed connection to {}", self.peer_addr);
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// False once closed or once the server side of the stream is gone
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Number of requests currently awaiting a response
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if let Some(socket) = &self.socket {
            let _ = socket.shutdown(Shutdown::Both);
        }
    }
}

/// Check that `frame` is a successful response
///
/// A non-response frame is a bad request; an error-flagged frame yields the
/// error named by its first payload byte.
pub fn validate_response(frame: &Frame) -> Result<()> {
    if !frame.header.is_response() {
        return Err(KvError::BadRequest.into());
    }

    if frame.header.has_error() {
        let code = frame
            .payload
            .first()
            .copied()
            .unwrap_or(KvError::Unknown.code());
        return Err(KvError::from_code(code).into());
    }

    Ok(())
}

fn encode_value<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| PyroError::Serialization(e.to_string()))
}

fn unix_seconds(at: SystemTime) -> Result<u32> {
    let secs = at
        .duration_since(UNIX_EPOCH)
        .map_err(|_| PyroError::Protocol("expiry is before the Unix epoch".to_string()))?
        .as_secs();

    u32::try_from(secs)
        .map_err(|_| PyroError::Protocol(format!("expiry {} does not fit in 32 bits", secs)))
}
