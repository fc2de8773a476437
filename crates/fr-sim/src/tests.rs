//! Unit and scenario tests for fr-sim.

use fr_core::{NodeId, Position, RoutingConfig, SimConfig, SimTime};
use fr_routing::MessageId;

use crate::{DeliveryStats, Sim, SimBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn pts(coords: &[(f64, f64)]) -> Vec<Position> {
    coords.iter().map(|&(x, y)| Position::planar(x, y)).collect()
}

fn sim(coords: &[(f64, f64)], range: f64) -> Sim {
    sim_with(coords, range, RoutingConfig::default())
}

fn sim_with(coords: &[(f64, f64)], range: f64, routing: RoutingConfig) -> Sim {
    let config = SimConfig::default().with_radio_range(range).with_routing(routing);
    SimBuilder::new(config, pts(coords)).build().unwrap()
}

/// Route one message `from → to` and return the run's statistics.
fn route(sim: &mut Sim, from: u32, to: u32) -> DeliveryStats {
    sim.originate(SimTime::ZERO, NodeId(from), NodeId(to)).unwrap();
    let mut stats = DeliveryStats::new();
    sim.run(&mut stats).unwrap();
    stats
}

fn first_from(origin: u32) -> MessageId {
    MessageId { origin: NodeId(origin), seq: 0 }
}

const STAR:   [(f64, f64); 5] = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 5.0)];
const ZIGZAG: [(f64, f64); 5] = [(0.0, 0.0), (8.0, 6.0), (16.0, -4.0), (24.0, 4.0), (30.0, 0.0)];
const RING:   [(f64, f64); 4] = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_queue {
    use fr_core::{EventHandle, SimTime};

    use crate::EventQueue;

    #[test]
    fn pops_by_time_then_insertion() {
        let mut q = EventQueue::new();
        q.push(SimTime(20), 'c');
        q.push(SimTime(10), 'a');
        q.push(SimTime(20), 'd');
        q.push(SimTime(10), 'b');
        assert_eq!(q.next_time(), Some(SimTime(10)));
        let order: Vec<char> = std::iter::from_fn(|| q.pop().map(|(_, _, e)| e)).collect();
        assert_eq!(order, vec!['a', 'b', 'c', 'd']);
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = EventQueue::new();
        let a = q.push(SimTime(5), 1);
        let b = q.push(SimTime(6), 2);
        assert!(q.is_pending(a));
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert!(!q.is_pending(a));
        assert!(!q.cancel(EventHandle(999)));
        assert_eq!(q.len(), 1);

        let (_, popped, _) = q.pop().unwrap();
        assert_eq!(popped, b);
        assert!(!q.cancel(b), "fired events cannot be cancelled");
    }
}

// ── RadioMedium ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod medium {
    use fr_core::{NodeId, Position};

    use super::{STAR, pts};
    use crate::RadioMedium;

    #[test]
    fn range_query_excludes_self_and_is_sorted() {
        let m = RadioMedium::new(12.0, &pts(&STAR));
        assert_eq!(m.in_range(NodeId(0), Position::planar(0.0, 0.0)), vec![NodeId(1), NodeId(3), NodeId(4)]);
        assert_eq!(m.in_range(NodeId(4), Position::planar(5.0, 5.0)).len(), 4);
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let m = RadioMedium::new(10.0, &pts(&STAR));
        assert!(m.reachable(Position::planar(0.0, 0.0), Position::planar(10.0, 0.0)));
        assert!(!m.reachable(Position::planar(0.0, 0.0), Position::planar(10.0, 10.0)));
        assert_eq!(m.range(), 10.0);
    }
}

// ── Topology ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod topology {
    use std::io::Write;

    use fr_core::{Position, SimRng};

    use crate::SimError;
    use crate::topology::{grid, load_topology_csv, load_topology_reader, random_uniform};

    #[test]
    fn loads_csv_file_in_any_row_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "node_id,x,y,z").unwrap();
        writeln!(file, "1,10.0,0.0,").unwrap();
        writeln!(file, "0,0.0,0.0,2.5").unwrap();
        writeln!(file, "2,10.0,10.0,0.0").unwrap();
        file.flush().unwrap();

        let positions = load_topology_csv(file.path()).unwrap();
        assert_eq!(
            positions,
            vec![
                Position::new(0.0, 0.0, 2.5),
                Position::new(10.0, 0.0, 0.0),
                Position::new(10.0, 10.0, 0.0),
            ]
        );
    }

    #[test]
    fn z_column_is_optional() {
        let csv = "node_id,x,y\n0,1.0,2.0\n1,3.0,4.0\n";
        let positions = load_topology_reader(csv.as_bytes()).unwrap();
        assert_eq!(positions[1], Position::planar(3.0, 4.0));
    }

    #[test]
    fn rejects_gaps_in_ids() {
        let csv = "node_id,x,y,z\n0,0,0,0\n2,1,1,0\n";
        assert!(matches!(load_topology_reader(csv.as_bytes()), Err(SimError::Parse(_))));
    }

    #[test]
    fn rejects_bad_numbers_and_missing_files() {
        let csv = "node_id,x,y,z\n0,abc,0,0\n";
        assert!(matches!(load_topology_reader(csv.as_bytes()), Err(SimError::Csv(_))));
        let csv = "node_id,x,y,z\n0,NaN,0,0\n";
        assert!(matches!(load_topology_reader(csv.as_bytes()), Err(SimError::Config(_))));
        let missing = std::path::Path::new("/nonexistent/topology.csv");
        assert!(matches!(load_topology_csv(missing), Err(SimError::Io(_))));
    }

    #[test]
    fn grid_is_row_major() {
        let g = grid(3, 2, 10.0);
        assert_eq!(g.len(), 6);
        assert_eq!(g[1], Position::planar(10.0, 0.0));
        assert_eq!(g[3], Position::planar(0.0, 10.0));
    }

    #[test]
    fn random_placement_is_seeded_and_bounded() {
        let a = random_uniform(50, 100.0, 40.0, &mut SimRng::new(9));
        let b = random_uniform(50, 100.0, 40.0, &mut SimRng::new(9));
        assert_eq!(a, b);
        assert!(a.iter().all(|p| (0.0..100.0).contains(&p.x) && (0.0..40.0).contains(&p.y)));
    }
}

// ── Bootstrap ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bootstrap {
    use fr_core::{NodeId, SimConfig, SimTime};

    use super::{STAR, pts, sim};
    use crate::{DeliveryStats, SimBuilder, SimError};

    #[test]
    fn two_rounds_build_mutual_face_graphs() {
        let mut s = sim(&STAR, 15.0);
        let mut stats = DeliveryStats::new();
        s.run(&mut stats).unwrap();

        assert_eq!(stats.hellos, 10);
        assert_eq!(stats.transmissions, 0);
        assert_eq!(s.pending_events(), 0);

        let centre = s.router(NodeId(4)).unwrap();
        assert!(centre.is_bootstrapped());
        assert_eq!(centre.face_graph().len(), 4);
        assert!(centre.neighbors().iter().all(|n| n.heard_us));

        let corner: Vec<_> = s.router(NodeId(0)).unwrap().face_graph().iter().map(|d| d.id).collect();
        assert_eq!(corner, vec![NodeId(4)]);
    }

    #[test]
    fn rejects_bad_input() {
        let err = SimBuilder::new(SimConfig::default().with_radio_range(0.0), pts(&STAR)).build();
        assert!(matches!(err, Err(SimError::Config(_))));

        let mut positions = pts(&STAR);
        positions[2].y = f64::INFINITY;
        assert!(SimBuilder::new(SimConfig::default(), positions).build().is_err());

        let mut s = sim(&STAR, 15.0);
        assert!(matches!(
            s.originate(SimTime::ZERO, NodeId(0), NodeId(9)),
            Err(SimError::UnknownNode(NodeId(9)))
        ));
        assert!(s.position_of(NodeId(5)).is_err());
        assert_eq!(s.node_count(), 5);
    }
}

// ── Routing scenarios ─────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use std::cell::RefCell;
    use std::rc::Rc;

    use fr_core::{ForwardingMode, NodeId, RoutingConfig, SimConfig, SimTime};
    use fr_routing::{DropReason, PacketHeader, UpBinding};

    use fr_core::{Position, SimRng};

    use super::{RING, STAR, ZIGZAG, first_from, pts, route, sim, sim_with};
    use crate::topology::{grid, random_uniform};
    use crate::{DeliveryStats, SimBuilder};

    #[test]
    fn star_delivers_through_the_centre() {
        let mut s = sim(&STAR, 15.0);
        let stats = route(&mut s, 0, 2);

        assert_eq!(stats.originated, 1);
        assert_eq!(stats.hops_of(first_from(0)), Some(2));
        assert_eq!(stats.transmissions, 2);
        assert!(stats.hops_of(first_from(0)).unwrap() as usize <= 2 * s.node_count());
        assert_eq!(stats.delivery_ratio(), 1.0);
    }

    #[test]
    fn face_change_on_a_zigzag() {
        let mut s = sim(&ZIGZAG, 13.0);
        let stats = route(&mut s, 0, 4);
        assert_eq!(stats.hops_of(first_from(0)), Some(4));
        assert_eq!(stats.transmissions, 4);
    }

    #[test]
    fn ring_delivers_once_from_both_sides() {
        let mut s = sim(&RING, 12.0);
        let stats = route(&mut s, 0, 2);
        assert_eq!(stats.hops_of(first_from(0)), Some(2));
        assert_eq!(stats.transmissions, 4);
        assert_eq!(stats.drops_of(DropReason::Duplicate), 1);
    }

    #[test]
    fn unreachable_destination_terminates() {
        let mut coords = RING.to_vec();
        coords.push((100.0, 5.0));
        let mut s = sim(&coords, 12.0);
        let stats = route(&mut s, 0, 4);

        assert!(stats.delivered.is_empty());
        assert_eq!(s.pending_events(), 0);
        assert!(stats.transmissions < 64);
        assert!(stats.drops_of(DropReason::Mated) + stats.drops_of(DropReason::Duplicate) >= 1);
        assert!(stats.ended_at.is_some());
    }

    #[test]
    fn lone_pair_reflection_stops_on_the_used_edge() {
        let mut s = sim(&[(0.0, 0.0), (10.0, 0.0), (100.0, 100.0)], 12.0);
        let stats = route(&mut s, 0, 2);
        assert!(stats.delivered.is_empty());
        assert_eq!(stats.transmissions, 2);
        assert_eq!(stats.drops_of(DropReason::Duplicate), 1);
        assert_eq!(stats.drops_of(DropReason::Mated), 0);
        assert_eq!(s.pending_events(), 0);
    }

    #[test]
    fn isolated_source_fails_at_origin() {
        let mut s = sim(&[(0.0, 0.0), (100.0, 0.0)], 12.0);
        let stats = route(&mut s, 0, 1);
        assert_eq!(stats.originated, 0);
        assert_eq!(stats.failed_origins, 1);
        assert_eq!(stats.transmissions, 0);
    }

    #[test]
    fn hop_limit_stops_transit() {
        let mut s = sim_with(&STAR, 15.0, RoutingConfig::default().with_max_hops(1));
        let stats = route(&mut s, 0, 2);
        assert!(stats.delivered.is_empty());
        assert_eq!(stats.drops_of(DropReason::HopLimit), 1);
    }

    #[test]
    fn greedy_follows_decreasing_distance() {
        let greedy = RoutingConfig::default().with_mode(ForwardingMode::Greedy);
        let mut s = sim_with(&ZIGZAG, 13.0, greedy);
        let stats = route(&mut s, 0, 4);
        assert_eq!(stats.hops_of(first_from(0)), Some(4));
    }

    #[test]
    fn greedy_escapes_local_minimum_by_face_sweep() {
        // S(0,0) has only U(0,10), which is farther from T(20,0).
        let coords = [(0.0, 0.0), (0.0, 10.0), (12.0, 10.0), (20.0, 0.0)];
        let greedy = RoutingConfig::default().with_mode(ForwardingMode::Greedy);
        let mut s = sim_with(&coords, 13.0, greedy);
        let stats = route(&mut s, 0, 3);
        assert_eq!(stats.hops_of(first_from(0)), Some(3));
    }

    #[test]
    fn grid_delivery_within_twice_node_count() {
        let config = SimConfig::default().with_radio_range(12.0);
        let mut s = SimBuilder::new(config, grid(5, 5, 10.0)).build().unwrap();
        let stats = route(&mut s, 0, 19);
        let hops = stats.hops_of(first_from(0)).expect("delivered");
        assert!(hops >= 7);
        assert!(hops as usize <= 2 * s.node_count());
    }

    #[test]
    fn grid_delivers_in_both_directions() {
        let config = SimConfig::default().with_radio_range(12.0);
        let mut s = SimBuilder::new(config, grid(5, 5, 10.0)).build().unwrap();
        for (from, to) in [(0, 19), (19, 0), (4, 15), (15, 4), (20, 9), (9, 20)] {
            s.originate(SimTime::ZERO, NodeId(from), NodeId(to)).unwrap();
        }
        let mut stats = DeliveryStats::new();
        s.run(&mut stats).unwrap();
        assert_eq!(stats.delivered.len(), 6, "{:?}", stats.drops);
        assert_eq!(stats.delivery_ratio(), 1.0);
    }

    #[test]
    fn random_connected_graphs_always_deliver() {
        let range = 25.0;
        let mut checked = 0;
        for seed in 0..80 {
            let positions = random_uniform(30, 100.0, 100.0, &mut SimRng::new(seed));
            if !connected(&positions, range) {
                continue;
            }
            checked += 1;
            let config = SimConfig::default().with_radio_range(range).with_seed(seed);
            let mut s = SimBuilder::new(config, positions).build().unwrap();
            let stats = route(&mut s, 0, 29);
            assert_eq!(stats.delivery_ratio(), 1.0, "seed {seed}: {:?}", stats.drops);
            let hops = stats.hops_of(first_from(0)).unwrap();
            assert!(hops as usize <= 2 * s.node_count(), "seed {seed}: {hops} hops");
        }
        assert!(checked > 0);
    }

    #[test]
    fn runs_are_reproducible() {
        let run = || {
            let config = SimConfig::default().with_radio_range(12.0).with_seed(7);
            let mut s = SimBuilder::new(config, grid(4, 4, 10.0)).build().unwrap();
            s.originate(SimTime::ZERO, NodeId(0), NodeId(15)).unwrap();
            s.originate(SimTime::from_secs(3), NodeId(12), NodeId(3)).unwrap();
            let mut stats = DeliveryStats::new();
            s.run(&mut stats).unwrap();
            stats
        };
        assert_eq!(run(), run());
    }

    struct Counter(Rc<RefCell<Vec<NodeId>>>);

    impl UpBinding for Counter {
        fn on_deliver(&mut self, at: NodeId, _header: PacketHeader) {
            self.0.borrow_mut().push(at);
        }
    }

    #[test]
    fn deliveries_reach_every_binding() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let config = SimConfig::default().with_radio_range(15.0);
        let mut s = SimBuilder::new(config, pts(&STAR))
            .binding(Box::new(Counter(Rc::clone(&seen))))
            .build()
            .unwrap();
        s.add_binding(Box::new(Counter(Rc::clone(&seen))));

        route(&mut s, 0, 2);
        assert_eq!(*seen.borrow(), vec![NodeId(2), NodeId(2)]);
    }

    /// Unit-disk graph over `positions` is connected.
    fn connected(positions: &[Position], range: f64) -> bool {
        let mut seen = vec![false; positions.len()];
        let mut stack = vec![0];
        seen[0] = true;
        while let Some(i) = stack.pop() {
            for (j, p) in positions.iter().enumerate() {
                if !seen[j] && positions[i].distance(*p) <= range {
                    seen[j] = true;
                    stack.push(j);
                }
            }
        }
        seen.into_iter().all(|s| s)
    }
}
