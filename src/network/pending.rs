//! Pending request table
//!
//! Tracks requests that have been written but not yet answered. Each entry
//! maps a correlation id to a one-slot channel that receives exactly one
//! frame. The id counter lives under the same lock as the map, so handing
//! out an id and registering its slot is a single atomic step.

use std::collections::HashMap;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use crate::protocol::Frame;

/// Outcome of routing an inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the waiting caller
    Delivered,
    /// A frame was already waiting in the slot; this one was dropped
    SlotFull,
    /// No pending request with this id (timed out, or never issued)
    NoWaiter,
}

struct PendingState {
    next_id: u32,
    waiters: HashMap<u32, Sender<Frame>>,
}

/// Correlation id allocator plus the id → response slot map
pub struct PendingRequests {
    state: Mutex<PendingState>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start the id counter at `first_id`
    pub fn starting_at(first_id: u32) -> Self {
        Self {
            state: Mutex::new(PendingState {
                next_id: first_id,
                waiters: HashMap::new(),
            }),
        }
    }

    /// Allocate a fresh correlation id and register its response slot
    ///
    /// The counter wraps; ids still pending are skipped so no two live
    /// entries ever share an id.
    pub fn register(&self) -> (u32, Receiver<Frame>) {
        let (tx, rx) = channel::bounded(1);
        let mut state = self.state.lock();

        let mut id = state.next_id;
        while state.waiters.contains_key(&id) {
            id = id.wrapping_add(1);
        }
        state.next_id = id.wrapping_add(1);
        state.waiters.insert(id, tx);

        (id, rx)
    }

    /// Drop the entry for `id`. Returns false if it was already gone.
    pub fn remove(&self, id: u32) -> bool {
        self.state.lock().waiters.remove(&id).is_some()
    }

    /// Route a frame to the slot registered under its request id
    ///
    /// Never blocks: a full slot or a missing entry drops the frame.
    pub fn deliver(&self, frame: Frame) -> Delivery {
        let state = self.state.lock();
        let Some(slot) = state.waiters.get(&frame.header.request_id) else {
            return Delivery::NoWaiter;
        };

        match slot.try_send(frame) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(_)) => Delivery::SlotFull,
            Err(TrySendError::Disconnected(_)) => Delivery::NoWaiter,
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.state.lock().waiters.contains_key(&id)
    }

    /// Number of requests awaiting a response
    pub fn len(&self) -> usize {
        self.state.lock().waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PendingRequests {
    fn default() -> Self {
        Self::new()
    }
}
