//! Round-robin peer ring.
//!
//! A thread-safe circular collection of peers keyed by identifier. Callers
//! add and remove peers as membership changes and pull one peer per outbound
//! call with [`PeerRing::next`].
//!
//! ## Layout
//!
//! Nodes live in a slot arena and are linked by slot index:
//!
//! ```text
//!   index: "a" -> 0, "b" -> 2, "c" -> 1        cursor: Some(0)
//!
//!   slot    0      1      2      3
//!   peer   [a]    [c]    [b]    [ ]  <- free
//!   next    2      0      1
//!   prev    1      2      0
//!
//!   rotation from cursor: a -> b -> c -> a
//! ```
//!
//! Removed slots go on a free stack and are reused by later adds, so the
//! arena never grows past the peak ring size.
//!
//! ## Rotation
//!
//! - New peers are linked directly before the cursor, i.e. at the end of the
//!   current rotation. The cursor does not move.
//! - Removing the cursor peer moves the cursor to its successor first, so the
//!   next selection neither skips nor repeats a peer.
//! - [`PeerRing::next`] returns the cursor peer and advances the cursor.
//!
//! Every operation holds the ring's lock for its full duration and does only
//! constant-time pointer and map work ([`PeerRing::remove_all`] and the
//! snapshot views are linear in the ring size).

use parking_lot::Mutex;
use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    config::PeerRingConfig,
    error::{Error, Result},
    peer::{Peer, SharedPeer},
};

#[cfg(feature = "metrics")]
use crate::metrics;

/// Neighbor slots of a ring node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Link {
    prev: usize,
    next: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    added: u64,
    removed: u64,
    selections: u64,
    empty_selections: u64,
}

struct PeerRingInner<P> {
    /// Slot arena. `None` marks a free slot.
    peers: Vec<Option<P>>,
    /// Links for every slot. Entries of free slots are stale.
    links: Vec<Link>,
    /// Free slot stack.
    free: Vec<usize>,
    /// Identifier to slot.
    index: HashMap<String, usize>,
    /// Slot returned by the next selection.
    cursor: Option<usize>,
    counters: Counters,
}

impl<P: Peer + Clone> PeerRingInner<P> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            peers: Vec::with_capacity(capacity),
            links: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity),
            cursor: None,
            counters: Counters::default(),
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    /// Store a peer in a free slot, growing the arena only when none is left.
    fn alloc(&mut self, peer: P) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.peers[slot] = Some(peer);
                slot
            }
            None => {
                self.peers.push(Some(peer));
                self.links.push(Link::default());
                self.peers.len() - 1
            }
        }
    }

    fn insert(&mut self, peer: P) -> Result<usize> {
        if self.index.contains_key(peer.identifier()) {
            return Err(Error::DuplicatePeer(peer.identifier().to_owned()));
        }

        let id = peer.identifier().to_owned();
        let slot = self.alloc(peer);
        self.index.insert(id, slot);

        match self.cursor {
            None => {
                self.links[slot] = Link {
                    prev: slot,
                    next: slot,
                };
                self.cursor = Some(slot);
            }
            Some(cursor) => {
                // Link before the cursor: prev <-> slot <-> cursor
                let prev = self.links[cursor].prev;
                self.links[slot] = Link { prev, next: cursor };
                self.links[prev].next = slot;
                self.links[cursor].prev = slot;
            }
        }

        self.counters.added += 1;
        Ok(self.len())
    }

    fn remove(&mut self, id: &str) -> Result<P> {
        let slot = self
            .index
            .remove(id)
            .ok_or_else(|| Error::PeerNotFound(id.to_owned()))?;
        let peer = self
            .unlink(slot)
            .ok_or_else(|| Error::PeerNotFound(id.to_owned()))?;
        self.counters.removed += 1;
        Ok(peer)
    }

    /// Unlink a slot from the ring and release it. The caller owns the index
    /// entry.
    fn unlink(&mut self, slot: usize) -> Option<P> {
        let Link { prev, next } = self.links[slot];

        if next == slot {
            self.cursor = None;
        } else {
            if self.cursor == Some(slot) {
                self.cursor = Some(next);
            }
            self.links[prev].next = next;
            self.links[next].prev = prev;
        }

        self.free.push(slot);
        self.peers[slot].take()
    }

    fn remove_all(&mut self) -> Vec<P> {
        let mut removed = Vec::with_capacity(self.index.len());
        for (_, slot) in self.index.drain() {
            if let Some(peer) = self.peers[slot].take() {
                removed.push(peer);
            }
        }

        self.peers.clear();
        self.links.clear();
        self.free.clear();
        self.cursor = None;
        self.counters.removed += removed.len() as u64;
        removed
    }

    fn next(&mut self) -> Option<P> {
        let Some(cursor) = self.cursor else {
            self.counters.empty_selections += 1;
            return None;
        };

        self.cursor = Some(self.links[cursor].next);
        self.counters.selections += 1;
        self.peers[cursor].clone()
    }

    fn peek(&self) -> Option<P> {
        self.cursor.and_then(|cursor| self.peers[cursor].clone())
    }

    fn get(&self, id: &str) -> Option<P> {
        self.index
            .get(id)
            .and_then(|&slot| self.peers[slot].clone())
    }

    /// Peers in rotation order starting at the cursor.
    fn rotation(&self) -> Vec<P> {
        let mut peers = Vec::with_capacity(self.len());
        if let Some(start) = self.cursor {
            let mut slot = start;
            for _ in 0..self.len() {
                if let Some(peer) = &self.peers[slot] {
                    peers.push(peer.clone());
                }
                slot = self.links[slot].next;
            }
        }
        peers
    }

    fn check_invariants(&self) -> bool {
        let size = self.len();
        let slots = self.peers.len();

        if self.links.len() != slots || self.free.len() + size != slots {
            return false;
        }

        let mut free = vec![false; slots];
        for &slot in &self.free {
            if slot >= slots || free[slot] || self.peers[slot].is_some() {
                return false;
            }
            free[slot] = true;
        }

        // Map entries point at occupied slots holding the same identifier.
        for (id, &slot) in &self.index {
            match self.peers.get(slot) {
                Some(Some(peer)) if peer.identifier() == id => {}
                _ => return false,
            }
        }

        let Some(start) = self.cursor else {
            return size == 0;
        };
        if start >= slots || self.peers[start].is_none() {
            return false;
        }

        // Following `next` exactly `size` times visits every node once and
        // returns to the start.
        let mut seen = vec![false; slots];
        let mut slot = start;
        for _ in 0..size {
            if seen[slot] || self.peers[slot].is_none() {
                return false;
            }
            seen[slot] = true;

            let next = self.links[slot].next;
            if next >= slots || self.links[next].prev != slot {
                return false;
            }
            slot = next;
        }

        slot == start && self.index.values().all(|&slot| seen[slot])
    }

    fn stats(&self) -> PeerRingStats {
        PeerRingStats {
            peers: self.len(),
            slots: self.peers.len(),
            free_slots: self.free.len(),
            added: self.counters.added,
            removed: self.counters.removed,
            selections: self.counters.selections,
            empty_selections: self.counters.empty_selections,
        }
    }
}

/// Thread-safe round-robin ring of peers.
///
/// Peers are keyed by [`Peer::identifier`], which must be unique within the
/// ring. Handles returned by [`next`](Self::next) and
/// [`remove_all`](Self::remove_all) are clones of the stored handle; the ring
/// never mutates a peer.
///
/// # Example
///
/// ```
/// use peer_ring::{testing::MockPeer, Peer, PeerRing};
///
/// let ring = PeerRing::new(3);
/// ring.add(MockPeer::shared("a")).unwrap();
/// ring.add(MockPeer::shared("b")).unwrap();
///
/// assert_eq!(ring.next().unwrap().identifier(), "a");
/// assert_eq!(ring.next().unwrap().identifier(), "b");
/// assert_eq!(ring.next().unwrap().identifier(), "a");
///
/// ring.remove("a").unwrap();
/// assert_eq!(ring.next().unwrap().identifier(), "b");
/// ```
pub struct PeerRing<P = SharedPeer> {
    inner: Mutex<PeerRingInner<P>>,
    config: PeerRingConfig,
}

impl<P: Peer + Clone> PeerRing<P> {
    /// Create an empty ring with storage reserved for `capacity` peers.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(PeerRingConfig::with_capacity(capacity))
    }

    /// Create an empty ring from a configuration.
    pub fn with_config(config: PeerRingConfig) -> Self {
        Self {
            inner: Mutex::new(PeerRingInner::with_capacity(config.initial_capacity)),
            config,
        }
    }

    /// Get the configuration of this ring.
    pub fn config(&self) -> &PeerRingConfig {
        &self.config
    }

    /// Add a peer at the end of the current rotation.
    ///
    /// The first peer added to an empty ring becomes the next one selected.
    /// Fails with [`Error::DuplicatePeer`] if a peer with the same identifier
    /// is already present; the ring is left unchanged.
    pub fn add(&self, peer: P) -> Result<()> {
        let handle = peer.clone();
        let result = self.inner.lock().insert(peer);

        match result {
            Ok(size) => {
                tracing::trace!(peer = handle.identifier(), size, "peer added to ring");
                #[cfg(feature = "metrics")]
                {
                    if self.config.enable_metrics {
                        metrics::record_peer_added();
                        metrics::set_ring_size(size);
                    }
                }
                Ok(())
            }
            Err(err) => {
                tracing::debug!(peer = err.identifier(), "rejected add: {}", err);
                #[cfg(feature = "metrics")]
                {
                    if self.config.enable_metrics {
                        metrics::record_add_rejected();
                    }
                }
                Err(err)
            }
        }
    }

    /// Remove the peer with the given identifier and return its handle.
    ///
    /// If it was the next peer to be selected, selection continues with its
    /// successor. Fails with [`Error::PeerNotFound`] if no such peer is
    /// present; the ring is left unchanged.
    pub fn remove(&self, id: &str) -> Result<P> {
        let result = {
            let mut inner = self.inner.lock();
            inner.remove(id).map(|peer| (peer, inner.len()))
        };

        match result {
            Ok((peer, size)) => {
                tracing::trace!(peer = id, size, "peer removed from ring");
                #[cfg(feature = "metrics")]
                {
                    if self.config.enable_metrics {
                        metrics::record_peers_removed(1);
                        metrics::set_ring_size(size);
                    }
                }
                Ok(peer)
            }
            Err(err) => {
                tracing::debug!(peer = id, "rejected remove: {}", err);
                #[cfg(feature = "metrics")]
                {
                    if self.config.enable_metrics {
                        metrics::record_remove_rejected();
                    }
                }
                Err(err)
            }
        }
    }

    /// Remove a peer by its own identifier.
    ///
    /// Equivalent to `self.remove(peer.identifier())`.
    pub fn remove_peer<Q: Peer + ?Sized>(&self, peer: &Q) -> Result<P> {
        self.remove(peer.identifier())
    }

    /// Empty the ring and return every peer that was in it.
    ///
    /// The order of the returned peers is unspecified and is not the
    /// rotation order.
    pub fn remove_all(&self) -> Vec<P> {
        let removed = self.inner.lock().remove_all();

        tracing::trace!(count = removed.len(), "removed all peers from ring");
        #[cfg(feature = "metrics")]
        {
            if self.config.enable_metrics {
                metrics::record_peers_removed(removed.len());
                metrics::set_ring_size(0);
            }
        }

        removed
    }

    /// Return the next peer in rotation and advance past it.
    ///
    /// Returns `None` when the ring is empty, which is a normal condition
    /// (e.g. while the peer list warms up), not an error.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<P> {
        let peer = self.inner.lock().next();

        #[cfg(feature = "metrics")]
        {
            if self.config.enable_metrics {
                match peer {
                    Some(_) => metrics::record_selection(),
                    None => metrics::record_empty_selection(),
                }
            }
        }

        peer
    }

    /// Return the peer the next call to [`next`](Self::next) would return,
    /// without advancing.
    pub fn peek(&self) -> Option<P> {
        self.inner.lock().peek()
    }

    /// Get the peer with the given identifier.
    pub fn get(&self, id: &str) -> Option<P> {
        self.inner.lock().get(id)
    }

    /// Check if a peer with the given identifier is in the ring.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.lock().index.contains_key(id)
    }

    /// Number of peers in the ring.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the ring is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all peers in rotation order, starting with the peer the
    /// next selection would return.
    pub fn peers(&self) -> Vec<P> {
        self.inner.lock().rotation()
    }

    /// Get ring statistics.
    pub fn stats(&self) -> PeerRingStats {
        self.inner.lock().stats()
    }

    /// Verify the internal structure of the ring.
    ///
    /// Checks that the identifier map and the circular list are in 1:1
    /// correspondence, that the cursor points into the list exactly when the
    /// ring is non-empty, that following successors `len()` times returns to
    /// the start, and that the slot arena bookkeeping is consistent.
    pub fn check_invariants(&self) -> bool {
        self.inner.lock().check_invariants()
    }
}

impl<P: Peer + Clone> Default for PeerRing<P> {
    fn default() -> Self {
        Self::with_config(PeerRingConfig::default())
    }
}

impl<P> fmt::Debug for PeerRing<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("PeerRing")
            .field("len", &inner.index.len())
            .field("slots", &inner.peers.len())
            .field("cursor", &inner.cursor)
            .field("config", &self.config)
            .finish()
    }
}

/// Statistics about a peer ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeerRingStats {
    /// Number of peers currently in the ring.
    pub peers: usize,
    /// Number of arena slots, occupied or free.
    pub slots: usize,
    /// Number of free arena slots waiting for reuse.
    pub free_slots: usize,
    /// Peers added over the ring's lifetime.
    pub added: u64,
    /// Peers removed over the ring's lifetime, including remove-all.
    pub removed: u64,
    /// Peers handed out by selection.
    pub selections: u64,
    /// Selections attempted on an empty ring.
    pub empty_selections: u64,
}

/// Wrapper for thread-safe peer ring sharing.
pub type SharedPeerRing<P = SharedPeer> = Arc<PeerRing<P>>;
