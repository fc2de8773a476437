//! Gabriel-graph planarization.
//!
//! For self `S` and neighbour `N`, let `M` be the midpoint of `S`–`N` and
//! `r = |M − S|`.  `N` is kept iff no other known neighbour `W` lies within
//! or on the circle `(M, r)`.  In a unit-disk graph every such witness is in
//! range of both endpoints, so with complete hellos the result is symmetric
//! and the union over all nodes is planar.
//!
//! Cost is O(k²) per node for `k` one-hop neighbours, run once per
//! bootstrap (or per observation when incremental planarization is on).

use fr_core::{Destination, NodeId, PlanarPolicy, Position, Precision};

use crate::NeighborTable;

// ── FaceGraph ─────────────────────────────────────────────────────────────────

/// The planar subset of a node's neighbour table, in first-heard order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceGraph {
    members: Vec<Destination>,
}

impl FaceGraph {
    pub fn new(members: Vec<Destination>) -> Self {
        Self { members }
    }

    pub fn get(&self, id: NodeId) -> Option<&Destination> {
        self.members.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> + '_ {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ── Planarizer ────────────────────────────────────────────────────────────────

/// Build the face graph of the node at `me` from its neighbour table.
///
/// Neighbours sitting exactly on `me` are skipped as candidates and as
/// witnesses: no circle can be drawn through them.  Under
/// [`PlanarPolicy::Mutual`] a candidate must also have reported hearing us.
pub fn planarize(
    me:        Position,
    table:     &NeighborTable,
    policy:    PlanarPolicy,
    precision: Precision,
) -> FaceGraph {
    let usable = |pos: Position| !precision.same_point(pos, me);

    let members = table
        .iter()
        .filter(|n| usable(n.dest.pos))
        .filter(|n| policy == PlanarPolicy::Local || n.heard_us)
        .filter(|n| {
            let center = me.midpoint(n.dest.pos);
            let radius = me.distance(center);
            !table.iter().any(|w| {
                w.dest.id != n.dest.id
                    && usable(w.dest.pos)
                    && precision.le(w.dest.pos.distance(center), radius)
            })
        })
        .map(|n| n.dest)
        .collect();

    FaceGraph::new(members)
}
