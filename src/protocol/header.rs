//! Frame header
//!
//! Fixed 15-byte header preceding every payload on the wire.
//!
//! ```text
//! ┌───────────┬─────────┬────────┬──────────┬───────────┬──────────────┬──────────────┐
//! │ Magic (2) │ Ver (1) │ Op (1) │ Type (1) │ Flags (2) │ ReqID (4)    │ PayloadLen(4)│
//! └───────────┴─────────┴────────┴──────────┴───────────┴──────────────┴──────────────┘
//! ```
//!
//! All multi-byte fields are big-endian. Decoding reconstructs the fields as
//! they are; checking magic and version is left to the caller.

/// Protocol identity ("MQ")
pub const MAGIC: u16 = 0x4D51;

/// Protocol version spoken by this client
pub const VERSION: u8 = 1;

/// Encoded header size in bytes
pub const HEADER_SIZE: usize = 15;

/// Operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    Set = 0x01,
    Get = 0x02,
    Delete = 0x03,
    MultiSet = 0x04,
    MultiGet = 0x05,
    Exists = 0x06,
    Ping = 0x10,
    Info = 0x11,
}

impl OpCode {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(OpCode::Set),
            0x02 => Some(OpCode::Get),
            0x03 => Some(OpCode::Delete),
            0x04 => Some(OpCode::MultiSet),
            0x05 => Some(OpCode::MultiGet),
            0x06 => Some(OpCode::Exists),
            0x10 => Some(OpCode::Ping),
            0x11 => Some(OpCode::Info),
            _ => None,
        }
    }
}

/// Frame direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    Request = 0,
    Response = 1,
    Notification = 2,
}

impl FrameType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(FrameType::Request),
            1 => Some(FrameType::Response),
            2 => Some(FrameType::Notification),
            _ => None,
        }
    }
}

/// Header flag bitfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(pub u16);

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// Payload starts with an error code
    pub const ERROR: Flags = Flags(1 << 0);
    pub const BATCH: Flags = Flags(1 << 1);
    pub const COMPRESSED: Flags = Flags(1 << 2);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn with(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }
}

/// Decoded frame header
///
/// `operation` and `frame_type` are kept as raw bytes so that any header
/// read off the wire can be represented; use [`Header::op_code`] and
/// [`Header::kind`] for the typed views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u16,
    pub version: u8,
    pub operation: u8,
    pub frame_type: u8,
    pub flags: Flags,
    /// Correlation id echoed back by the server
    pub request_id: u32,
    /// Number of payload bytes following the header
    pub payload_len: u32,
}

impl Header {
    /// Create a header for this protocol's magic and version
    pub fn new(
        operation: OpCode,
        frame_type: FrameType,
        flags: Flags,
        request_id: u32,
        payload_len: u32,
    ) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            operation: operation as u8,
            frame_type: frame_type as u8,
            flags,
            request_id,
            payload_len,
        }
    }

    /// Encode to the fixed wire layout
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..2].copy_from_slice(&self.magic.to_be_bytes());
        bytes[2] = self.version;
        bytes[3] = self.operation;
        bytes[4] = self.frame_type;
        bytes[5..7].copy_from_slice(&self.flags.bits().to_be_bytes());
        bytes[7..11].copy_from_slice(&self.request_id.to_be_bytes());
        bytes[11..15].copy_from_slice(&self.payload_len.to_be_bytes());
        bytes
    }

    /// Decode from the fixed wire layout (no validation)
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            magic: u16::from_be_bytes([bytes[0], bytes[1]]),
            version: bytes[2],
            operation: bytes[3],
            frame_type: bytes[4],
            flags: Flags(u16::from_be_bytes([bytes[5], bytes[6]])),
            request_id: u32::from_be_bytes([bytes[7], bytes[8], bytes[9], bytes[10]]),
            payload_len: u32::from_be_bytes([bytes[11], bytes[12], bytes[13], bytes[14]]),
        }
    }

    pub fn op_code(&self) -> Option<OpCode> {
        OpCode::from_u8(self.operation)
    }

    pub fn kind(&self) -> Option<FrameType> {
        FrameType::from_u8(self.frame_type)
    }

    pub fn is_response(&self) -> bool {
        self.kind() == Some(FrameType::Response)
    }

    pub fn has_error(&self) -> bool {
        self.flags.contains(Flags::ERROR)
    }

    /// Magic and version match what this client speaks
    pub fn is_known_protocol(&self) -> bool {
        self.magic == MAGIC && self.version == VERSION
    }
}
