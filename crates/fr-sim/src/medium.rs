//! Unit-disk radio medium.
//!
//! Node positions are indexed in an R-tree (via `rstar`) so that a hello
//! broadcast costs a range query instead of a scan over every node.  Two
//! nodes hear each other iff their planar distance is at most the radio
//! range.

use fr_core::{NodeId, Position};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodePoint {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RadioMedium ───────────────────────────────────────────────────────────────

pub struct RadioMedium {
    range: f64,
    tree:  RTree<NodePoint>,
}

impl RadioMedium {
    /// Index `positions`; node `i` gets `NodeId(i)`.
    pub fn new(range: f64, positions: &[Position]) -> Self {
        let entries = positions
            .iter()
            .enumerate()
            .map(|(i, p)| NodePoint { point: [p.x, p.y], id: NodeId(i as u32) })
            .collect();
        Self { range, tree: RTree::bulk_load(entries) }
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    /// Every node other than `node` within range of `pos`, ascending by id.
    pub fn in_range(&self, node: NodeId, pos: Position) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .tree
            .locate_within_distance([pos.x, pos.y], self.range * self.range)
            .map(|e| e.id)
            .filter(|&id| id != node)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn reachable(&self, a: Position, b: Position) -> bool {
        a.distance(b) <= self.range
    }
}
