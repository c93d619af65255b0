//! Fuzz target for PeerRing operations.
//!
//! Drives random sequences of add/remove/remove-all/next against the ring and
//! the sequential reference model, checking that both agree and that the
//! ring's structure stays consistent after every step.

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use peer_ring::testing::{MockPeer, RingModel};
use peer_ring::{Peer, PeerRing};

/// Operations that can be performed on the ring
#[derive(Debug, Arbitrary)]
enum RingOp {
    /// Add a peer
    Add { id: u8 },
    /// Remove a peer
    Remove { id: u8 },
    /// Empty the ring
    RemoveAll,
    /// Select the next peer
    Next,
    /// Look at the next peer without selecting it
    Peek,
}

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    ops: Vec<RingOp>,
}

fuzz_target!(|input: Input| {
    let ring: PeerRing<Arc<MockPeer>> = PeerRing::new(input.capacity as usize);
    let mut model = RingModel::new();

    for op in input.ops {
        match op {
            RingOp::Add { id } => {
                let id = id.to_string();
                let got = ring.add(MockPeer::shared(id.as_str()));
                assert_eq!(got, model.add(&id));
            }
            RingOp::Remove { id } => {
                let id = id.to_string();
                let got = ring.remove(&id).map(|p| p.identifier().to_owned());
                assert_eq!(got, model.remove(&id).map(|()| id.clone()));
            }
            RingOp::RemoveAll => {
                let mut got: Vec<String> = ring
                    .remove_all()
                    .iter()
                    .map(|p| p.identifier().to_owned())
                    .collect();
                let mut want = model.remove_all();
                got.sort();
                want.sort();
                assert_eq!(got, want);
            }
            RingOp::Next => {
                let got = ring.next().map(|p| p.identifier().to_owned());
                assert_eq!(got, model.next());
            }
            RingOp::Peek => {
                let got = ring.peek().map(|p| p.identifier().to_owned());
                assert_eq!(got, model.rotation().first().cloned());
            }
        }

        // Verify invariants after each operation
        assert!(ring.check_invariants(), "Invariant violated!");
        assert_eq!(ring.len(), model.len());
    }
});
