//! Error types for PyroKV
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

use crate::protocol::KvError;

/// Result type alias using PyroError
pub type Result<T> = std::result::Result<T, PyroError>;

/// Unified error type for PyroKV operations
#[derive(Debug, Error)]
pub enum PyroError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Decode Errors
    // -------------------------------------------------------------------------
    #[error("Frame too short for header: expected {expected} bytes, got {actual}")]
    HeaderTooShort { expected: usize, actual: usize },

    #[error("Frame too short for payload: expected {expected} bytes, got {actual}")]
    PayloadTooShort { expected: usize, actual: usize },

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Server-reported and Client-local Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Kv(#[from] KvError),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PyroError {
    /// The taxonomy error carried by this value, if any
    pub fn kv_error(&self) -> Option<KvError> {
        match self {
            PyroError::Kv(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_key_not_found(&self) -> bool {
        self.kv_error() == Some(KvError::KeyNotFound)
    }

    pub fn is_key_expired(&self) -> bool {
        self.kv_error() == Some(KvError::KeyExpired)
    }

    pub fn is_value_too_large(&self) -> bool {
        self.kv_error() == Some(KvError::ValueTooLarge)
    }

    pub fn is_bad_request(&self) -> bool {
        self.kv_error() == Some(KvError::BadRequest)
    }

    pub fn is_internal_server_error(&self) -> bool {
        self.kv_error() == Some(KvError::InternalServer)
    }

    /// True if the request gave up waiting for its response
    pub fn is_timeout(&self) -> bool {
        self.kv_error() == Some(KvError::ClientTimeout)
    }

    /// True if the client was closed or its connection is gone
    pub fn is_closed(&self) -> bool {
        self.kv_error() == Some(KvError::ClientClosed)
    }
}
