//! Configuration for the peer ring.

/// Configuration options for a [`PeerRing`](crate::PeerRing).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PeerRingConfig {
    /// Number of peers to reserve storage for up front.
    ///
    /// This is only a hint. The ring grows past it as peers are added and
    /// reuses the slots of removed peers before growing.
    ///
    /// Default: 0
    pub initial_capacity: usize,

    /// Enable metrics collection.
    ///
    /// Requires the `metrics` feature.
    ///
    /// Default: true
    #[cfg(feature = "metrics")]
    pub enable_metrics: bool,
}

impl Default for PeerRingConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            #[cfg(feature = "metrics")]
            enable_metrics: true,
        }
    }
}

impl PeerRingConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration sized for an expected number of peers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::default().with_initial_capacity(capacity)
    }

    /// Set the initial capacity hint (builder pattern).
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Enable or disable metrics collection (builder pattern).
    #[cfg(feature = "metrics")]
    #[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
    pub const fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }
}
