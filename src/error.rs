//! Error types for peer ring operations.
//!
//! Both failures mean the caller's view of peer membership is stale, for
//! example a discovery event racing with a manual removal. Neither leaves
//! the ring modified.

use thiserror::Error;

/// Result type alias for peer ring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`PeerRing`](crate::PeerRing) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A peer with the same identifier is already in the ring.
    #[error("can't add peer {0:?} because it is already in the peer ring")]
    DuplicatePeer(String),

    /// No peer with this identifier is in the ring.
    #[error("can't remove peer {0:?} because it is not in the peer ring")]
    PeerNotFound(String),
}

impl Error {
    /// Identifier of the peer the failed operation referred to.
    pub fn identifier(&self) -> &str {
        match self {
            Error::DuplicatePeer(id) | Error::PeerNotFound(id) => id,
        }
    }

    /// Check if this is a rejected add.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::DuplicatePeer(_))
    }

    /// Check if this is a rejected remove.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PeerNotFound(_))
    }

    /// Check if this error signals a stale membership view.
    ///
    /// Every ring error is of this kind; callers should resync their view
    /// of the peer set instead of treating it as a systemic failure.
    pub fn is_stale_membership(&self) -> bool {
        match self {
            Error::DuplicatePeer(_) => true,
            Error::PeerNotFound(_) => true,
        }
    }
}
