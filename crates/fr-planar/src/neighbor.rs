//! Per-node one-hop neighbour table.
//!
//! Entries are kept in first-heard order and are unique by `NodeId`.  The
//! table never shrinks during a run: a later hello from a known neighbour
//! overwrites its entry in place.

use fr_core::{Destination, NodeId};

/// What the table knows about one neighbour.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    /// Identity and last announced position.
    pub dest: Destination,
    /// The neighbour's latest hello listed this node as heard.
    pub heard_us: bool,
}

/// Result of feeding one hello into the table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Observation {
    /// First hello from this neighbour.
    New,
    /// Known neighbour announced a different position.
    Moved,
    /// Known neighbour, same position.
    Refreshed,
}

#[derive(Clone, Debug, Default)]
pub struct NeighborTable {
    entries: Vec<Neighbor>,
}

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hello from `dest`.
    pub fn observe(&mut self, dest: Destination, heard_us: bool) -> Observation {
        match self.entries.iter_mut().find(|n| n.dest.id == dest.id) {
            Some(entry) => {
                let moved = entry.dest != dest;
                entry.dest     = dest;
                entry.heard_us = heard_us;
                if moved { Observation::Moved } else { Observation::Refreshed }
            }
            None => {
                self.entries.push(Neighbor { dest, heard_us });
                Observation::New
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Neighbor> {
        self.entries.iter().find(|n| n.dest.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Neighbours in first-heard order.
    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> + '_ {
        self.entries.iter()
    }

    /// Ids in first-heard order (the content of an outgoing hello).
    pub fn ids(&self) -> Vec<NodeId> {
        self.entries.iter().map(|n| n.dest.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
