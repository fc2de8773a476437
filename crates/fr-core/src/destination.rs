//! `Destination` — a node identity paired with the position it was observed at.

use std::fmt;

use crate::{NodeId, Position};

/// A node and the position it had when last observed.
///
/// Equality is exact on both fields: a neighbour that moves between two
/// hellos produces two distinct `Destination` values.  Use
/// [`is_same_node`](Self::is_same_node) to compare identities only.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    pub id:  NodeId,
    pub pos: Position,
}

impl Destination {
    #[inline]
    pub const fn new(id: NodeId, pos: Position) -> Self {
        Self { id, pos }
    }

    #[inline]
    pub fn is_same_node(&self, other: &Destination) -> bool {
        self.id == other.id
    }

    /// Planar distance between the two snapshots.
    #[inline]
    pub fn distance(&self, other: &Destination) -> f64 {
        self.pos.distance(other.pos)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.pos)
    }
}
