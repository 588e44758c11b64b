//! Protocol Module
//!
//! Defines the binary wire protocol spoken with a PyroKV server.
//!
//! ## Frame Format
//! ```text
//! ┌───────────┬─────────┬────────┬──────────┬───────────┬───────────┬───────────┬──────────┐
//! │ Magic (2) │ Ver (1) │ Op (1) │ Type (1) │ Flags (2) │ ReqID (4) │ Len (4)   │ Payload  │
//! └───────────┴─────────┴────────┴──────────┴───────────┴───────────┴───────────┴──────────┘
//! ```
//!
//! ### Operations
//! - 0x01: SET     - Payload: expiry (4) + key_len (4) + key + value_len (4) + value
//! - 0x02: GET     - Payload: key_len (4) + key
//! - 0x03: DELETE  - Payload: key_len (4) + key
//! - 0x04..0x06, 0x10, 0x11: reserved (MSET, MGET, EXISTS, PING, INFO)
//!
//! ### Frame Types
//! - 0: REQUEST
//! - 1: RESPONSE
//! - 2: NOTIFICATION
//!
//! ### Flags
//! - bit 0: ERROR (first payload byte is an error code)
//! - bit 1: BATCH
//! - bit 2: COMPRESSED

mod header;
mod payload;
mod frame;
mod reader;
mod status;

pub use header::{Flags, FrameType, Header, OpCode, HEADER_SIZE, MAGIC, VERSION};
pub use payload::{
    decode_key_payload, decode_record, encode_key_payload, encode_set_payload, Record, NO_EXPIRY,
};
pub use frame::{
    decode_frame, encode_frame, frame_len, read_frame, write_frame, Frame, MAX_PAYLOAD_SIZE,
};
pub use reader::FrameReader;
pub use status::{KvError, CLIENT_CODE_BASE};
