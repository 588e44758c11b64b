//! # PyroKV
//!
//! Client for the PyroKV binary key-value protocol:
//! - Self-describing binary frames (fixed header + length-prefixed payload)
//! - Many concurrent callers multiplexed over one connection
//! - Responses matched to callers by correlation id, in any order
//! - Bounded per-request timeouts
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Caller Threads (many)                       │
//! │              set / get_bytes / delete / ...                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Client                                  │
//! │   register id ──► pending table (Mutex)    write lock        │
//! └──────────┬──────────────────────▲───────────────┬───────────┘
//!            │ wait (timeout)       │ deliver       │ frame bytes
//!            ▼                      │               ▼
//!   ┌─────────────────┐     ┌───────┴─────────┐   ┌──────────────┐
//!   │  one-slot chan  │◄────│  Delivery Loop  │◄──│  TCP stream  │
//!   └─────────────────┘     │  (FrameReader)  │   └──────────────┘
//!                           └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pyrokv::{Client, ClientConfig};
//!
//! # fn main() -> pyrokv::Result<()> {
//! let client = Client::connect(ClientConfig::from_env()?)?;
//! client.set("k1", &[0x01, 0x02])?;
//! assert_eq!(client.get_bytes("k1")?, vec![0x01, 0x02]);
//! client.delete("k1")?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PyroError, Result};
pub use config::ClientConfig;
pub use network::Client;
pub use protocol::{KvError, Record};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the PyroKV client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
