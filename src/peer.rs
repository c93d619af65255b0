//! Peer capability consumed by the ring.
//!
//! The ring never looks inside a peer. All it needs is a stable identifier
//! that is unique within one ring instance.

use std::sync::Arc;

/// A remote endpoint handle that can be handed out for outbound calls.
///
/// Implementations are usually cheap shared handles (`Arc<T>`) owned by the
/// peer list that feeds the ring.
pub trait Peer {
    /// Unique key of this peer within a ring.
    fn identifier(&self) -> &str;
}

impl<T: Peer + ?Sized> Peer for Arc<T> {
    fn identifier(&self) -> &str {
        (**self).identifier()
    }
}

impl<T: Peer + ?Sized> Peer for Box<T> {
    fn identifier(&self) -> &str {
        (**self).identifier()
    }
}

impl<T: Peer + ?Sized> Peer for &T {
    fn identifier(&self) -> &str {
        (**self).identifier()
    }
}

/// Default peer handle stored by [`PeerRing`](crate::PeerRing).
pub type SharedPeer = Arc<dyn Peer + Send + Sync>;
