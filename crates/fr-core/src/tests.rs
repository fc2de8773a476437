//! Unit tests for fr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EventHandle, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(EventHandle(100) > EventHandle(99));
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Crossing, Position, Precision, Side, SimRng, cross_sign, segments_intersect};

    const P: Precision = Precision::DEFAULT;

    fn pt(x: f64, y: f64) -> Position {
        Position::planar(x, y)
    }

    #[test]
    fn planar_distance_ignores_z() {
        let a = Position::new(0.0, 0.0, 100.0);
        let b = Position::new(3.0, 4.0, -50.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn midpoint() {
        assert_eq!(pt(0.0, 0.0).midpoint(pt(10.0, 4.0)), pt(5.0, 2.0));
    }

    #[test]
    fn try_new_rejects_nan() {
        assert!(Position::try_new(f64::NAN, 0.0, 0.0).is_err());
        assert!(Position::try_new(0.0, f64::INFINITY, 0.0).is_err());
        assert!(Position::try_new(1.0, 2.0, 3.0).is_ok());
    }

    #[test]
    fn quantize_rounds_to_scale() {
        assert_eq!(Precision(10).quantize(0.26), 3);
        assert_eq!(Precision(10).quantize(-0.26), -3);
        assert!(P.same_point(pt(1.0, 1.0), pt(1.0 + 1e-10, 1.0 - 1e-10)));
        assert!(!P.same_point(pt(1.0, 1.0), pt(1.0 + 1e-6, 1.0)));
    }

    #[test]
    fn cross_sign_orientation() {
        let a = pt(0.0, 0.0);
        let b = pt(10.0, 0.0);
        assert_eq!(cross_sign(a, b, pt(5.0, 1.0), P), Side::Left);
        assert_eq!(cross_sign(a, b, pt(5.0, -1.0), P), Side::Right);
        assert_eq!(cross_sign(a, b, pt(20.0, 0.0), P), Side::Zero);
        // Below the precision floor counts as on the line.
        assert_eq!(cross_sign(a, b, pt(5.0, 1e-12), P), Side::Zero);
    }

    #[test]
    fn proper_crossing_is_intersection() {
        let v = segments_intersect(pt(0.0, 0.0), pt(30.0, 0.0), pt(8.0, 6.0), pt(16.0, -4.0), P);
        assert_eq!(v, Crossing::Intersection);
    }

    #[test]
    fn edges_touching_segment_endpoints_never_count() {
        let s = pt(0.0, 0.0);
        let d = pt(30.0, 0.0);
        assert_eq!(segments_intersect(s, d, s, pt(5.0, -5.0), P), Crossing::None);
        assert_eq!(segments_intersect(s, d, pt(25.0, 5.0), d, P), Crossing::None);
    }

    #[test]
    fn crossing_at_edge_endpoint_is_collinear() {
        let v = segments_intersect(pt(0.0, 0.0), pt(20.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0), P);
        assert_eq!(v, Crossing::Collinear);
    }

    #[test]
    fn edge_on_the_segment_is_collinear() {
        let v = segments_intersect(pt(0.0, 0.0), pt(20.0, 0.0), pt(5.0, 0.0), pt(8.0, 0.0), P);
        assert_eq!(v, Crossing::Collinear);
    }

    #[test]
    fn same_side_and_parallel_edges_do_not_cross() {
        let s = pt(0.0, 0.0);
        let d = pt(20.0, 0.0);
        assert_eq!(segments_intersect(s, d, pt(5.0, 1.0), pt(8.0, 3.0), P), Crossing::None);
        assert_eq!(segments_intersect(s, d, pt(5.0, 1.0), pt(8.0, 1.0), P), Crossing::None);
    }

    #[test]
    fn crossing_beyond_segment_end_is_none() {
        let v = segments_intersect(pt(0.0, 0.0), pt(20.0, 0.0), pt(25.0, -1.0), pt(25.0, 1.0), P);
        assert_eq!(v, Crossing::None);
    }

    #[test]
    fn intersection_on_line_extension_is_none() {
        // Edge endpoint (10,10) sits on the line through (0,0)-(5,5) but past its end.
        let v = segments_intersect(pt(0.0, 0.0), pt(5.0, 5.0), pt(10.0, 0.0), pt(10.0, 10.0), P);
        assert_eq!(v, Crossing::None);
    }

    #[test]
    fn verdict_ignores_edge_orientation() {
        let mut rng = SimRng::new(7);
        for _ in 0..2_000 {
            // Snap half of the cases to a coarse grid to provoke collinear edges.
            let snap = rng.gen_range(0..2) == 0;
            let mut draw = || {
                let x: f64 = rng.gen_range(-50.0..50.0);
                let y: f64 = rng.gen_range(-50.0..50.0);
                if snap { pt(x.round(), y.round()) } else { pt(x, y) }
            };
            let (s, d, a, b) = (draw(), draw(), draw(), draw());
            assert_eq!(
                segments_intersect(s, d, a, b, P),
                segments_intersect(s, d, b, a, P),
                "s={s} d={d} a={a} b={b}"
            );
        }
    }
}

#[cfg(test)]
mod sweep {
    use crate::{Sweep, Turn};

    #[test]
    fn union_and_cover() {
        assert_eq!(Sweep::Right.union(Sweep::Left), Sweep::Both);
        assert_eq!(Sweep::Right.union(Sweep::Right), Sweep::Right);
        assert_eq!(Sweep::None.union(Sweep::Left), Sweep::Left);
        assert!(Sweep::Both.covers(Sweep::Left));
        assert!(!Sweep::Both.covers(Sweep::None));
        assert!(!Sweep::Right.covers(Sweep::Left));
    }

    #[test]
    fn singles_and_turns() {
        assert!(Sweep::Left.is_single());
        assert!(!Sweep::Both.is_single());
        assert!(!Sweep::None.is_sweep());
        assert_eq!(Turn::Right.sweep(), Sweep::Right);
    }

    #[test]
    fn display() {
        assert_eq!(Sweep::Both.to_string(), "both");
        assert_eq!(Sweep::default(), Sweep::None);
    }
}

#[cfg(test)]
mod time {
    use crate::SimTime;

    #[test]
    fn arithmetic() {
        let t = SimTime::from_millis(1_500);
        assert_eq!(t + SimTime::from_micros(5), SimTime(1_500_005));
        assert_eq!(t.offset(10), SimTime(1_500_010));
        assert_eq!(SimTime::from_secs(2) - t, 500_000);
        assert_eq!(SimTime::from_secs(1) * 3, SimTime::from_secs(3));
        assert_eq!(SimTime::ZERO.saturating_sub(t), SimTime::ZERO);
    }

    #[test]
    fn display() {
        assert_eq!(SimTime::from_millis(1_500).to_string(), "1.500000s");
    }
}

#[cfg(test)]
mod rng {
    use crate::{NodeId, NodeRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = NodeRng::new(12345, NodeId(0));
        let mut r2 = NodeRng::new(12345, NodeId(0));
        for _ in 0..100 {
            let a: u64 = r1.gen_range(0..1_000_000);
            let b: u64 = r2.gen_range(0..1_000_000);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_nodes_differ() {
        let mut r0 = NodeRng::new(1, NodeId(0));
        let mut r1 = NodeRng::new(1, NodeId(1));
        let a: Vec<u64> = (0..8).map(|_| r0.gen_range(0..u64::MAX)).collect();
        let b: Vec<u64> = (0..8).map(|_| r1.gen_range(0..u64::MAX)).collect();
        assert_ne!(a, b, "seeds for adjacent nodes should diverge");
    }
}

#[cfg(test)]
mod config {
    use crate::{Precision, RoutingConfig, SimConfig, SimTime};

    #[test]
    fn defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
        assert_eq!(SimConfig::default().routing_start(), SimTime::from_secs(2));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(SimConfig::default().with_radio_range(-1.0).validate().is_err());
        assert!(SimConfig::default().with_radio_range(f64::NAN).validate().is_err());
        let routing = RoutingConfig::default().with_precision(Precision(0));
        assert!(SimConfig::default().with_routing(routing).validate().is_err());
        assert!(RoutingConfig::default().with_max_hops(0).validate().is_err());
    }
}
