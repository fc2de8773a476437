use std::fmt;

use fr_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RoutingError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("malformed packet: {0}")]
    Malformed(String),
}

pub type RoutingResult<T> = Result<T, RoutingError>;

/// Why a packet copy was discarded.  Drops are reported through
/// [`Link::dropped`](crate::Link::dropped), never as errors: routing is
/// best effort.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropReason {
    /// No viable next hop.
    NoRoute,
    /// Hop count reached `RoutingConfig::max_hops`.
    HopLimit,
    /// Already delivered here, or already queued on the same edge.
    Duplicate,
    /// Consumed by the rendezvous protocol.
    Mated,
    /// Missing destination or otherwise unusable header.
    Malformed,
    /// Next hop was outside radio range at transmission time.
    OutOfRange,
}

impl DropReason {
    pub const ALL: [DropReason; 6] = [
        DropReason::NoRoute,
        DropReason::HopLimit,
        DropReason::Duplicate,
        DropReason::Mated,
        DropReason::Malformed,
        DropReason::OutOfRange,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DropReason::NoRoute    => "no-route",
            DropReason::HopLimit   => "hop-limit",
            DropReason::Duplicate  => "duplicate",
            DropReason::Mated      => "mated",
            DropReason::Malformed  => "malformed",
            DropReason::OutOfRange => "out-of-range",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
