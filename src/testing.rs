//! Test utilities for code built on the peer ring.
//!
//! - [`MockPeer`]: a minimal [`Peer`] for tests and examples
//! - [`RingModel`]: a sequential reference model of the ring's rotation
//!   semantics, for cross-checking a [`PeerRing`](crate::PeerRing) under
//!   randomized operation sequences
//!
//! ## Example
//!
//! ```
//! use peer_ring::testing::{MockPeer, RingModel};
//! use peer_ring::{Peer, PeerRing};
//!
//! let ring = PeerRing::new(4);
//! let mut model = RingModel::new();
//!
//! for id in ["a", "b", "c"] {
//!     ring.add(MockPeer::shared(id)).unwrap();
//!     model.add(id).unwrap();
//! }
//! ring.remove("a").unwrap();
//! model.remove("a").unwrap();
//!
//! assert_eq!(ring.next().map(|p| p.identifier().to_owned()), model.next());
//! ```

use std::{collections::VecDeque, sync::Arc};

use crate::{
    error::{Error, Result},
    peer::Peer,
};

/// A peer identified by a plain string, with an optional label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MockPeer {
    id: String,
    label: Option<String>,
}

impl MockPeer {
    /// Create a peer with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    /// Create a shared peer handle with the given identifier.
    pub fn shared(id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(id))
    }

    /// Attach a label, e.g. to tell apart two handles with the same identifier.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Peer for MockPeer {
    fn identifier(&self) -> &str {
        &self.id
    }
}

/// Sequential reference model of the ring.
///
/// Holds identifiers in rotation order with the cursor at the front of the
/// queue. Operations are linear time; the model exists only to state the
/// expected behavior plainly.
#[derive(Debug, Clone, Default)]
pub struct RingModel {
    rotation: VecDeque<String>,
}

impl RingModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier at the end of the current rotation.
    pub fn add(&mut self, id: &str) -> Result<()> {
        if self.contains(id) {
            return Err(Error::DuplicatePeer(id.to_owned()));
        }
        self.rotation.push_back(id.to_owned());
        Ok(())
    }

    /// Remove an identifier. Removing the front moves the cursor to its
    /// successor.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let pos = self
            .rotation
            .iter()
            .position(|p| p == id)
            .ok_or_else(|| Error::PeerNotFound(id.to_owned()))?;
        self.rotation.remove(pos);
        Ok(())
    }

    /// Remove every identifier, returned in rotation order.
    pub fn remove_all(&mut self) -> Vec<String> {
        self.rotation.drain(..).collect()
    }

    /// Return the cursor identifier and rotate past it.
    pub fn next(&mut self) -> Option<String> {
        let id = self.rotation.pop_front()?;
        self.rotation.push_back(id.clone());
        Some(id)
    }

    /// Check if an identifier is present.
    pub fn contains(&self, id: &str) -> bool {
        self.rotation.iter().any(|p| p == id)
    }

    /// Number of identifiers.
    pub fn len(&self) -> usize {
        self.rotation.len()
    }

    /// Check if the model is empty.
    pub fn is_empty(&self) -> bool {
        self.rotation.is_empty()
    }

    /// Identifiers in rotation order, starting at the cursor.
    pub fn rotation(&self) -> Vec<String> {
        self.rotation.iter().cloned().collect()
    }
}
