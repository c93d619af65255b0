mod tests {
    use crate::testing::{MockPeer, RingModel};
    use crate::{Error, Peer, PeerRing, PeerRingConfig, SharedPeer};
    use std::collections::HashSet;
    use std::sync::Arc;

    type TestRing = PeerRing<Arc<MockPeer>>;

    fn ring_with(ids: &[&str]) -> TestRing {
        let ring = TestRing::new(ids.len());
        for id in ids {
            ring.add(MockPeer::shared(*id)).unwrap();
        }
        ring
    }

    fn next_id(ring: &TestRing) -> Option<String> {
        ring.next().map(|p| p.identifier().to_owned())
    }

    fn ids(peers: &[Arc<MockPeer>]) -> Vec<String> {
        peers.iter().map(|p| p.identifier().to_owned()).collect()
    }

    #[test]
    fn test_new_ring_is_empty() {
        let ring = TestRing::new(16);
        assert_eq!(ring.len(), 0);
        assert!(ring.is_empty());
        assert!(ring.peek().is_none());
        assert!(ring.peers().is_empty());
        assert!(ring.check_invariants());
    }

    #[test]
    fn test_add_distinct_peers() {
        let names: Vec<String> = (0..50).map(|i| format!("peer-{}", i)).collect();
        let ring = TestRing::new(4);

        for (i, name) in names.iter().enumerate() {
            ring.add(MockPeer::shared(name.as_str())).unwrap();
            assert_eq!(ring.len(), i + 1);
            assert!(ring.check_invariants());
        }

        for name in &names {
            let removed = ring.remove(name).unwrap();
            assert_eq!(removed.identifier(), name);
            assert!(ring.check_invariants());
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        let ring = ring_with(&["a", "b"]);
        let before = ring.peers();

        let err = ring
            .add(Arc::new(MockPeer::new("a").with_label("second")))
            .unwrap_err();
        assert_eq!(err, Error::DuplicatePeer("a".to_string()));
        assert_eq!(ring.len(), 2);
        assert_eq!(ids(&ring.peers()), ids(&before));

        // The first handle is kept.
        assert_eq!(ring.get("a").unwrap().label(), None);
        assert!(ring.check_invariants());
    }

    #[test]
    fn test_remove_unknown_is_rejected() {
        let ring = ring_with(&["a", "b"]);

        let err = ring.remove("c").unwrap_err();
        assert_eq!(err, Error::PeerNotFound("c".to_string()));
        assert_eq!(ring.len(), 2);
        assert_eq!(next_id(&ring).as_deref(), Some("a"));

        let empty = TestRing::new(0);
        assert!(empty.remove("a").unwrap_err().is_not_found());
        assert!(empty.check_invariants());
    }

    #[test]
    fn test_add_then_remove_restores_ring() {
        let ring = ring_with(&["a", "b", "c"]);
        assert_eq!(next_id(&ring).as_deref(), Some("a"));

        let before = ids(&ring.peers());
        ring.add(MockPeer::shared("d")).unwrap();
        ring.remove("d").unwrap();

        assert_eq!(ring.len(), 3);
        assert_eq!(ids(&ring.peers()), before);
        assert_eq!(ring.peek().unwrap().identifier(), "b");

        let empty = TestRing::new(0);
        empty.add(MockPeer::shared("x")).unwrap();
        empty.remove("x").unwrap();
        assert!(empty.is_empty());
        assert!(empty.peek().is_none());
        assert!(empty.check_invariants());
    }

    #[test]
    fn test_rotation_is_complete() {
        let ring = ring_with(&["A", "B", "C"]);

        let picks: Vec<String> = (0..4).map(|_| next_id(&ring).unwrap()).collect();
        let first_cycle: HashSet<&str> = picks[..3].iter().map(String::as_str).collect();

        assert_eq!(first_cycle, HashSet::from(["A", "B", "C"]));
        assert_eq!(picks[3], picks[0]);
        assert_eq!(picks, vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_added_peer_joins_end_of_rotation() {
        let ring = ring_with(&["a", "b", "c"]);
        assert_eq!(next_id(&ring).as_deref(), Some("a"));

        // Cursor is on b; d goes before b, i.e. after a.
        ring.add(MockPeer::shared("d")).unwrap();
        let picks: Vec<String> = (0..4).map(|_| next_id(&ring).unwrap()).collect();
        assert_eq!(picks, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_remove_non_cursor_keeps_cursor() {
        let ring = ring_with(&["A", "B", "C"]);
        assert_eq!(ring.peek().unwrap().identifier(), "A");

        ring.remove("C").unwrap();
        assert_eq!(next_id(&ring).as_deref(), Some("A"));
        assert_eq!(next_id(&ring).as_deref(), Some("B"));
        assert_eq!(next_id(&ring).as_deref(), Some("A"));
        assert!(ring.check_invariants());
    }

    #[test]
    fn test_remove_cursor_advances_to_successor() {
        let ring = ring_with(&["A", "B", "C"]);
        assert_eq!(ring.peek().unwrap().identifier(), "A");

        let removed = ring.remove("A").unwrap();
        assert_eq!(removed.identifier(), "A");
        assert_eq!(next_id(&ring).as_deref(), Some("B"));
        assert_eq!(next_id(&ring).as_deref(), Some("C"));
        assert_eq!(next_id(&ring).as_deref(), Some("B"));
        assert!(ring.check_invariants());
    }

    #[test]
    fn test_remove_all() {
        let ring = ring_with(&["A", "B"]);

        let removed: HashSet<String> = ring
            .remove_all()
            .iter()
            .map(|p| p.identifier().to_owned())
            .collect();
        assert_eq!(removed, HashSet::from(["A".to_string(), "B".to_string()]));
        assert!(ring.is_empty());
        assert!(ring.check_invariants());

        for _ in 0..3 {
            assert!(ring.next().is_none());
        }

        ring.add(MockPeer::shared("C")).unwrap();
        assert_eq!(next_id(&ring).as_deref(), Some("C"));
    }

    #[test]
    fn test_remove_all_on_empty_ring() {
        let ring = TestRing::new(0);
        assert!(ring.remove_all().is_empty());
        assert!(ring.check_invariants());
    }

    #[test]
    fn test_singleton_always_returns_same_peer() {
        let ring = ring_with(&["A"]);
        for _ in 0..10 {
            assert_eq!(next_id(&ring).as_deref(), Some("A"));
        }
        assert!(ring.check_invariants());

        ring.remove("A").unwrap();
        assert!(ring.next().is_none());
    }

    #[test]
    fn test_remove_down_to_one_peer() {
        let ring = ring_with(&["a", "b"]);
        ring.remove("a").unwrap();
        assert_eq!(next_id(&ring).as_deref(), Some("b"));
        assert_eq!(next_id(&ring).as_deref(), Some("b"));
        assert!(ring.check_invariants());
    }

    #[test]
    fn test_slots_are_reused() {
        let ring = ring_with(&["a", "b", "c", "d"]);
        ring.remove("b").unwrap();
        ring.remove("c").unwrap();

        let stats = ring.stats();
        assert_eq!(stats.peers, 2);
        assert_eq!(stats.slots, 4);
        assert_eq!(stats.free_slots, 2);

        ring.add(MockPeer::shared("e")).unwrap();
        ring.add(MockPeer::shared("f")).unwrap();
        ring.add(MockPeer::shared("g")).unwrap();

        let stats = ring.stats();
        assert_eq!(stats.peers, 5);
        assert_eq!(stats.slots, 5);
        assert_eq!(stats.free_slots, 0);
        assert!(ring.check_invariants());
    }

    #[test]
    fn test_stats_counters() {
        let ring = ring_with(&["a", "b", "c"]);
        ring.next();
        ring.next();
        ring.remove("a").unwrap();
        let _ = ring.remove("a");
        let _ = ring.add(MockPeer::shared("b"));
        ring.remove_all();
        ring.next();

        let stats = ring.stats();
        assert_eq!(stats.added, 3);
        assert_eq!(stats.removed, 3);
        assert_eq!(stats.selections, 2);
        assert_eq!(stats.empty_selections, 1);
        assert_eq!(stats.peers, 0);
    }

    #[test]
    fn test_lookup_views() {
        let ring = ring_with(&["a", "b", "c"]);
        assert!(ring.contains("b"));
        assert!(!ring.contains("z"));
        assert_eq!(ring.get("c").unwrap().identifier(), "c");
        assert!(ring.get("z").is_none());

        ring.next();
        assert_eq!(ids(&ring.peers()), vec!["b", "c", "a"]);
        // Snapshots do not advance the cursor.
        assert_eq!(ring.peek().unwrap().identifier(), "b");
        assert_eq!(next_id(&ring).as_deref(), Some("b"));
    }

    #[test]
    fn test_remove_peer_by_handle() {
        let ring = ring_with(&["a", "b"]);
        let peer = MockPeer::new("a");
        ring.remove_peer(&peer).unwrap();
        assert!(!ring.contains("a"));
        assert!(ring.remove_peer(&peer).unwrap_err().is_not_found());
    }

    #[test]
    fn test_dyn_peer_handles() {
        struct Endpoint {
            addr: String,
        }

        impl Peer for Endpoint {
            fn identifier(&self) -> &str {
                &self.addr
            }
        }

        let ring: PeerRing = PeerRing::new(2);
        ring.add(Arc::new(MockPeer::new("mock"))).unwrap();
        let endpoint: SharedPeer = Arc::new(Endpoint {
            addr: "10.1.1.1:9000".into(),
        });
        ring.add(endpoint).unwrap();

        assert_eq!(ring.next().unwrap().identifier(), "mock");
        assert_eq!(ring.next().unwrap().identifier(), "10.1.1.1:9000");
    }

    #[test]
    fn test_with_config() {
        let ring: TestRing = PeerRing::with_config(PeerRingConfig::with_capacity(32));
        assert_eq!(ring.config().initial_capacity, 32);
        assert!(ring.is_empty());

        let ring = TestRing::default();
        assert_eq!(ring.config(), &PeerRingConfig::default());
    }

    #[test]
    fn test_debug_output() {
        let ring = ring_with(&["a"]);
        let debug = format!("{:?}", ring);
        assert!(debug.contains("PeerRing"));
        assert!(debug.contains("len: 1"));
    }

    #[test]
    fn test_matches_model_over_mixed_operations() {
        let ring = TestRing::new(0);
        let mut model = RingModel::new();

        // Deterministic mixed sequence exercising slot reuse and cursor moves.
        for step in 0u32..2000 {
            let id = format!("p{}", (step.wrapping_mul(7919)) % 13);
            match step % 5 {
                0 | 1 => {
                    assert_eq!(
                        ring.add(MockPeer::shared(id.as_str())).is_ok(),
                        model.add(&id).is_ok()
                    );
                }
                2 => {
                    assert_eq!(ring.remove(&id).is_ok(), model.remove(&id).is_ok());
                }
                _ => {
                    assert_eq!(next_id(&ring), model.next());
                }
            }
            if step % 499 == 0 {
                let mut got = ids(&ring.remove_all());
                let mut want = model.remove_all();
                got.sort();
                want.sort();
                assert_eq!(got, want);
            }

            assert!(ring.check_invariants());
            assert_eq!(ring.len(), model.len());
            assert_eq!(ids(&ring.peers()), model.rotation());
        }
    }
}
