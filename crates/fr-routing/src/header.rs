//! Routing header carried by every packet.

use std::fmt;

use fr_core::{Destination, NodeId, Sweep};

// ── MessageId ─────────────────────────────────────────────────────────────────

/// Identity of one application message.  All sweep copies share it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageId {
    pub origin: NodeId,
    pub seq:    u32,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.origin.0, self.seq)
    }
}

// ── PacketKind ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PacketKind {
    /// Neighbour discovery beacon.  Broadcast, never routed.
    Hello,
    /// Payload being routed (greedy or face sweep).
    Data,
    /// Final hop to a destination that is a direct planar neighbour.
    LastMile,
}

// ── PacketHeader ──────────────────────────────────────────────────────────────

/// Routing header.
///
/// `sender` and `next_hop` are rewritten at every hop; `anchor` is the start
/// of the reference line used for face-change detection and only moves when
/// a greedy packet falls back to face routing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PacketHeader {
    pub kind:        PacketKind,
    pub message:     MessageId,
    pub source:      Destination,
    /// `None` only for hellos.
    pub destination: Option<Destination>,
    pub anchor:      Destination,
    /// Last hop, with the position it announced.
    pub sender:      Destination,
    /// `None` means broadcast.
    pub next_hop:    Option<NodeId>,
    pub direction:   Sweep,
    pub hops:        u16,
}

impl PacketHeader {
    /// A hello beacon from `me`.
    pub fn hello(me: Destination, seq: u32) -> Self {
        Self {
            kind:        PacketKind::Hello,
            message:     MessageId { origin: me.id, seq },
            source:      me,
            destination: None,
            anchor:      me,
            sender:      me,
            next_hop:    None,
            direction:   Sweep::None,
            hops:        0,
        }
    }

    /// A fresh data packet at its source, not yet addressed to a next hop.
    pub fn data(message: MessageId, source: Destination, destination: Destination) -> Self {
        Self {
            kind:        PacketKind::Data,
            message,
            source,
            destination: Some(destination),
            anchor:      source,
            sender:      source,
            next_hop:    None,
            direction:   Sweep::None,
            hops:        0,
        }
    }

    #[inline]
    pub fn is_hello(&self) -> bool {
        self.kind == PacketKind::Hello
    }

    /// `true` for data packets taking part in a face sweep.
    #[inline]
    pub fn is_sweeping(&self) -> bool {
        self.kind == PacketKind::Data && self.direction.is_sweep()
    }
}

impl fmt::Display for PacketHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {} {} -> ", self.kind, self.message, self.sender.id)?;
        match self.next_hop {
            Some(id) => write!(f, "{id}")?,
            None     => f.write_str("*")?,
        }
        write!(f, " [{}] hops={}", self.direction, self.hops)
    }
}

// ── Wire size ─────────────────────────────────────────────────────────────────

const ID_BYTES:          usize = 4;
const POSITION_BYTES:    usize = 3 * 8;
const DESTINATION_BYTES: usize = ID_BYTES + POSITION_BYTES;

/// Bytes the routing header adds to every data packet: kind, message id,
/// four destination records, next hop, direction and hop count.
pub const HEADER_OVERHEAD_BYTES: usize =
    1 + (ID_BYTES + 4) + 4 * DESTINATION_BYTES + ID_BYTES + 1 + 2;

#[inline]
pub const fn header_overhead_bytes() -> usize {
    HEADER_OVERHEAD_BYTES
}
