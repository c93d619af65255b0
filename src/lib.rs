//! # peer-ring
//!
//! Client-side peer selection core for an RPC transport: a thread-safe ring
//! of peers handed out in round-robin order.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Peer list                                │
//! │        (discovery / health events, one pick per call)           │
//! └───────────┬──────────────────────────────────────┬──────────────┘
//!             │ add() / remove() / remove_all()      │ next()
//! ┌───────────▼──────────────────────────────────────▼──────────────┐
//! │                          PeerRing                                │
//! │   Mutex ─┬─ identifier -> slot map                               │
//! │          ├─ slot arena (peer + prev/next links)                  │
//! │          └─ cursor                                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ring performs no I/O, never inspects peers beyond their
//! [`Peer::identifier`], and does not decide liveness: callers add and
//! remove peers as their view of membership changes.
//!
//! ## Example
//!
//! ```
//! use peer_ring::{testing::MockPeer, Error, Peer, PeerRing};
//!
//! let ring = PeerRing::new(8);
//! assert!(ring.next().is_none());
//!
//! ring.add(MockPeer::shared("10.0.0.1:4040")).unwrap();
//! ring.add(MockPeer::shared("10.0.0.2:4040")).unwrap();
//!
//! let err = ring.add(MockPeer::shared("10.0.0.1:4040")).unwrap_err();
//! assert!(matches!(err, Error::DuplicatePeer(_)));
//!
//! let picked = ring.next().unwrap();
//! assert_eq!(picked.identifier(), "10.0.0.1:4040");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

mod config;
mod error;
mod peer;
mod peer_ring;

pub mod testing;

#[cfg(feature = "metrics")]
#[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
pub mod metrics;

#[cfg(test)]
mod peer_ring_test;

// Re-export config types
pub use config::PeerRingConfig;

// Re-export error types
pub use error::{Error, Result};

// Re-export peer types
pub use peer::{Peer, SharedPeer};

// Re-export ring types
pub use peer_ring::{PeerRing, PeerRingStats, SharedPeerRing};
