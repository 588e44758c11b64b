//! Network Module
//!
//! The request multiplexer and its supporting pieces.
//!
//! ## Architecture
//! - Any number of caller threads issue requests through one [`Client`]
//! - Writes are serialized per frame behind a lock
//! - One delivery thread reads the connection and routes responses
//! - A single lock guards the pending table and the id counter

mod client;
mod dispatch;
mod pending;

pub use client::{validate_response, Client};
pub use pending::{Delivery, PendingRequests};
