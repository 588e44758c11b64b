//! Pending Request Table Tests
//!
//! These tests verify:
//! - Correlation ids are unique among live entries
//! - Frames reach the slot registered for their id
//! - Full slots and missing entries drop frames without blocking

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pyrokv::network::{Delivery, PendingRequests};
use pyrokv::protocol::{Frame, OpCode};

// =============================================================================
// Registration Tests
// =============================================================================

#[test]
fn test_register_allocates_increasing_ids() {
    let pending = PendingRequests::new();

    let (a, _rx_a) = pending.register();
    let (b, _rx_b) = pending.register();
    let (c, _rx_c) = pending.register();

    assert_eq!((a, b, c), (1, 2, 3));
    assert_eq!(pending.len(), 3);
}

#[test]
fn test_remove() {
    let pending = PendingRequests::new();
    let (id, _rx) = pending.register();

    assert!(pending.contains(id));
    assert!(pending.remove(id));
    assert!(!pending.remove(id));
    assert!(pending.is_empty());
}

#[test]
fn test_counter_wraps() {
    let pending = PendingRequests::starting_at(u32::MAX);

    let (max, _rx_max) = pending.register();
    let (zero, _rx_zero) = pending.register();
    assert_eq!(max, u32::MAX);
    assert_eq!(zero, 0);
}

#[test]
fn test_concurrent_registration_is_unique() {
    let pending = Arc::new(PendingRequests::new());
    let mut handles = Vec::new();

    for _ in 0..8 {
        let pending = Arc::clone(&pending);
        handles.push(thread::spawn(move || {
            (0..500).map(|_| pending.register()).collect::<Vec<_>>()
        }));
    }

    let mut ids = HashSet::new();
    let mut receivers = Vec::new();
    for handle in handles {
        for (id, rx) in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate id {}", id);
            receivers.push(rx);
        }
    }

    assert_eq!(ids.len(), 8 * 500);
    assert_eq!(pending.len(), 8 * 500);
}

// =============================================================================
// Delivery Tests
// =============================================================================

#[test]
fn test_deliver_to_matching_slot() {
    let pending = PendingRequests::new();
    let (id_a, rx_a) = pending.register();
    let (id_b, rx_b) = pending.register();

    let reply_b = Frame::response(OpCode::Get, id_b, b"for b".to_vec());
    let reply_a = Frame::response(OpCode::Get, id_a, b"for a".to_vec());

    assert_eq!(pending.deliver(reply_b.clone()), Delivery::Delivered);
    assert_eq!(pending.deliver(reply_a.clone()), Delivery::Delivered);

    assert_eq!(rx_a.recv_timeout(Duration::from_secs(1)).unwrap(), reply_a);
    assert_eq!(rx_b.recv_timeout(Duration::from_secs(1)).unwrap(), reply_b);
}

#[test]
fn test_deliver_without_waiter() {
    let pending = PendingRequests::new();
    let stray = Frame::response(OpCode::Get, 99, Vec::<u8>::new());

    assert_eq!(pending.deliver(stray), Delivery::NoWaiter);
}

#[test]
fn test_deliver_after_remove_is_dropped() {
    let pending = PendingRequests::new();
    let (id, rx) = pending.register();
    pending.remove(id);

    let late = Frame::response(OpCode::Get, id, b"late".to_vec());
    assert_eq!(pending.deliver(late), Delivery::NoWaiter);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_second_frame_for_same_id_is_dropped() {
    let pending = PendingRequests::new();
    let (id, rx) = pending.register();

    let first = Frame::response(OpCode::Get, id, b"first".to_vec());
    let second = Frame::response(OpCode::Get, id, b"second".to_vec());

    assert_eq!(pending.deliver(first.clone()), Delivery::Delivered);
    assert_eq!(pending.deliver(second), Delivery::SlotFull);

    assert_eq!(rx.try_recv().unwrap(), first);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_deliver_to_dropped_receiver() {
    let pending = PendingRequests::new();
    let (id, rx) = pending.register();
    drop(rx);

    let frame = Frame::response(OpCode::Get, id, Vec::<u8>::new());
    assert_eq!(pending.deliver(frame), Delivery::NoWaiter);
}
