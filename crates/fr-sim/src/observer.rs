//! Simulation observer trait and a statistics collector.

use std::collections::BTreeMap;

use fr_core::{NodeId, SimTime};
use fr_routing::{DropReason, MessageId, PacketHeader, RoutingError};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] as packets move.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: delivery printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SimObserver for Printer {
///     fn on_deliver(&mut self, at: SimTime, node: NodeId, header: &PacketHeader) {
///         println!("{at}: {} reached {node} after {} hops", header.message, header.hops);
///     }
/// }
/// ```
pub trait SimObserver {
    /// A message was accepted for routing at its source.
    fn on_originate(&mut self, _at: SimTime, _node: NodeId, _message: MessageId) {}

    /// A source refused to route a message.
    fn on_origin_failed(&mut self, _at: SimTime, _node: NodeId, _error: &RoutingError) {}

    /// A frame went on the air (hellos included).
    fn on_transmit(&mut self, _at: SimTime, _header: &PacketHeader) {}

    fn on_deliver(&mut self, _at: SimTime, _node: NodeId, _header: &PacketHeader) {}

    fn on_drop(&mut self, _at: SimTime, _node: NodeId, _header: &PacketHeader, _reason: DropReason) {}

    /// Called once when the run stops.
    fn on_sim_end(&mut self, _at: SimTime) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Counts what happened to routed traffic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeliveryStats {
    pub originated:     usize,
    pub failed_origins: usize,
    /// Data and last-mile transmissions.
    pub transmissions:  usize,
    pub hellos:         usize,
    /// Hop count of each delivered message.
    pub delivered:      BTreeMap<MessageId, u16>,
    pub drops:          BTreeMap<DropReason, usize>,
    pub per_message:    BTreeMap<MessageId, usize>,
    pub ended_at:       Option<SimTime>,
}

impl DeliveryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hops_of(&self, message: MessageId) -> Option<u16> {
        self.delivered.get(&message).copied()
    }

    pub fn drops_of(&self, reason: DropReason) -> usize {
        self.drops.get(&reason).copied().unwrap_or(0)
    }

    /// Transmissions spent on one message.
    pub fn transmissions_of(&self, message: MessageId) -> usize {
        self.per_message.get(&message).copied().unwrap_or(0)
    }

    /// Delivered / originated, or 0 when nothing was originated.
    pub fn delivery_ratio(&self) -> f64 {
        if self.originated == 0 {
            0.0
        } else {
            self.delivered.len() as f64 / self.originated as f64
        }
    }
}

impl SimObserver for DeliveryStats {
    fn on_originate(&mut self, _at: SimTime, _node: NodeId, _message: MessageId) {
        self.originated += 1;
    }

    fn on_origin_failed(&mut self, _at: SimTime, _node: NodeId, _error: &RoutingError) {
        self.failed_origins += 1;
    }

    fn on_transmit(&mut self, _at: SimTime, header: &PacketHeader) {
        if header.is_hello() {
            self.hellos += 1;
        } else {
            self.transmissions += 1;
            *self.per_message.entry(header.message).or_default() += 1;
        }
    }

    fn on_deliver(&mut self, _at: SimTime, _node: NodeId, header: &PacketHeader) {
        self.delivered.insert(header.message, header.hops);
    }

    fn on_drop(&mut self, _at: SimTime, _node: NodeId, _header: &PacketHeader, reason: DropReason) {
        *self.drops.entry(reason).or_default() += 1;
    }

    fn on_sim_end(&mut self, at: SimTime) {
        self.ended_at = Some(at);
    }
}
