//! Metrics for the peer ring.
//!
//! ## Available Metrics
//!
//! ### Counters
//! - `peer_ring_peers_added_total` - Peers inserted into the ring
//! - `peer_ring_peers_removed_total` - Peers removed (including remove-all)
//! - `peer_ring_add_rejected_total` - Adds rejected as duplicates
//! - `peer_ring_remove_rejected_total` - Removes rejected for unknown peers
//! - `peer_ring_selections_total` - Peers handed out by round-robin selection
//! - `peer_ring_empty_selections_total` - Selections on an empty ring
//!
//! ### Gauges
//! - `peer_ring_size` - Current number of peers in the ring

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Initialize metric descriptions.
///
/// Call this once at application startup to register all metric descriptions.
pub fn init_metrics() {
    describe_counter!(
        "peer_ring_peers_added_total",
        "Total number of peers added to the ring"
    );
    describe_counter!(
        "peer_ring_peers_removed_total",
        "Total number of peers removed from the ring"
    );
    describe_counter!(
        "peer_ring_add_rejected_total",
        "Total number of adds rejected because the peer was already present"
    );
    describe_counter!(
        "peer_ring_remove_rejected_total",
        "Total number of removes rejected because the peer was not present"
    );
    describe_counter!(
        "peer_ring_selections_total",
        "Total number of peers returned by round-robin selection"
    );
    describe_counter!(
        "peer_ring_empty_selections_total",
        "Total number of selections attempted on an empty ring"
    );
    describe_gauge!("peer_ring_size", "Current number of peers in the ring");
}

/// Record a peer being added.
pub fn record_peer_added() {
    counter!("peer_ring_peers_added_total").increment(1);
}

/// Record peers being removed.
pub fn record_peers_removed(count: usize) {
    counter!("peer_ring_peers_removed_total").increment(count as u64);
}

/// Record a rejected add.
pub fn record_add_rejected() {
    counter!("peer_ring_add_rejected_total").increment(1);
}

/// Record a rejected remove.
pub fn record_remove_rejected() {
    counter!("peer_ring_remove_rejected_total").increment(1);
}

/// Record a successful selection.
pub fn record_selection() {
    counter!("peer_ring_selections_total").increment(1);
}

/// Record a selection on an empty ring.
pub fn record_empty_selection() {
    counter!("peer_ring_empty_selections_total").increment(1);
}

/// Update ring size gauge.
pub fn set_ring_size(count: usize) {
    gauge!("peer_ring_size").set(count as f64);
}
