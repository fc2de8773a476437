//! Collaborator seams between a router and the world around it.

use fr_core::{EventHandle, NodeId, SimTime};

use crate::{DropReason, PacketHeader};

/// The scheduler and transport as seen by one node's router.
///
/// Implemented by the simulation harness; tests use small in-memory fakes.
pub trait Link {
    /// Current simulated time.
    fn now(&self) -> SimTime;

    /// Queue `header` for transmission and return a handle that can revoke
    /// it until it fires.  The harness calls
    /// [`FaceRouter::on_send_fired`](crate::FaceRouter::on_send_fired) with
    /// the handle when the send event comes due.
    ///
    /// `header` is a snapshot taken at queue time.  The rendezvous rules may
    /// still rewrite the buffered entry (widen it to BOTH, narrow it to a
    /// single direction) before it fires; the header to transmit is the one
    /// `on_send_fired` returns, never this snapshot.
    fn schedule_send(&mut self, header: &PacketHeader) -> EventHandle;

    /// Revoke a queued send.  Idempotent: `false` if the handle already
    /// fired, was already revoked, or is unknown.
    fn cancel(&mut self, handle: EventHandle) -> bool;

    /// Hand a packet addressed to this node to the layers above.
    fn deliver(&mut self, header: PacketHeader);

    /// A packet copy was discarded.
    fn dropped(&mut self, _header: &PacketHeader, _reason: DropReason) {}
}

/// Consumer of delivered packets (the application layer, a statistics
/// collector, ...).
pub trait UpBinding {
    fn on_deliver(&mut self, at: NodeId, header: PacketHeader);
}

/// Hand `header` to every binding, cloning for all but the last.
pub fn fan_out(bindings: &mut [Box<dyn UpBinding>], at: NodeId, header: PacketHeader) {
    if let Some((last, rest)) = bindings.split_last_mut() {
        for binding in rest {
            binding.on_deliver(at, header.clone());
        }
        last.on_deliver(at, header);
    }
}
