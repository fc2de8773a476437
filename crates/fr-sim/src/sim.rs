//! The `Sim` struct and its event loop.

use fr_core::{Destination, EventHandle, NodeId, NodeRng, Position, SimConfig, SimTime};
use fr_planar::FaceGraph;
use fr_routing::{DropReason, FaceRouter, Link, PacketHeader, UpBinding, fan_out};
use tracing::{debug, trace, warn};

use crate::{EventQueue, RadioMedium, SimError, SimObserver, SimResult};

// ── Events ────────────────────────────────────────────────────────────────────

/// What travels over the air.
#[derive(Clone, Debug)]
pub(crate) enum Frame {
    /// A hello plus the ids its sender has heard so far.
    Hello { header: PacketHeader, heard: Vec<NodeId> },
    Data(PacketHeader),
}

#[derive(Clone, Debug)]
pub(crate) enum Event {
    /// `node` broadcasts its hello for discovery `round`.
    Hello { node: NodeId, round: u8 },
    /// Every node closes discovery `round`.
    Bootstrap { round: u8 },
    /// A send queued by `node` came due; the event's own handle names it.
    SendFired { node: NodeId },
    Receive { node: NodeId, frame: Frame },
    Originate { node: NodeId, to: NodeId },
}

// ── SimLink ───────────────────────────────────────────────────────────────────

/// One node's view of the harness while its router handles a single event.
struct SimLink<'a, O: SimObserver + ?Sized> {
    now:      SimTime,
    node:     NodeId,
    jitter:   SimTime,
    queue:    &'a mut EventQueue<Event>,
    rng:      &'a mut NodeRng,
    bindings: &'a mut [Box<dyn UpBinding>],
    observer: &'a mut O,
}

impl<O: SimObserver + ?Sized> Link for SimLink<'_, O> {
    fn now(&self) -> SimTime {
        self.now
    }

    fn schedule_send(&mut self, header: &PacketHeader) -> EventHandle {
        let delay = self.rng.gen_range(0..=self.jitter.as_micros());
        let handle = self.queue.push(self.now.offset(delay), Event::SendFired { node: self.node });
        trace!(node = %self.node, msg = %header.message, ?handle, delay_us = delay, "send scheduled");
        handle
    }

    fn cancel(&mut self, handle: EventHandle) -> bool {
        self.queue.cancel(handle)
    }

    fn deliver(&mut self, header: PacketHeader) {
        self.observer.on_deliver(self.now, self.node, &header);
        fan_out(&mut *self.bindings, self.node, header);
    }

    fn dropped(&mut self, header: &PacketHeader, reason: DropReason) {
        self.observer.on_drop(self.now, self.node, header, reason);
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The discrete-event simulation runner.
///
/// Holds one [`FaceRouter`] per node and drives them from a single event
/// queue.  Node `i` is `NodeId(i)`.  Create via
/// [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: SimConfig,

    pub(crate) now:       SimTime,
    pub(crate) positions: Vec<Position>,
    pub(crate) routers:   Vec<FaceRouter>,
    pub(crate) rngs:      Vec<NodeRng>,
    pub(crate) medium:    RadioMedium,
    pub(crate) queue:     EventQueue<Event>,
    pub(crate) bindings:  Vec<Box<dyn UpBinding>>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn node_count(&self) -> usize {
        self.routers.len()
    }

    /// Ground-truth position of `node`, used to address destinations.
    pub fn position_of(&self, node: NodeId) -> SimResult<Position> {
        self.positions.get(node.index()).copied().ok_or(SimError::UnknownNode(node))
    }

    pub fn router(&self, node: NodeId) -> SimResult<&FaceRouter> {
        self.routers.get(node.index()).ok_or(SimError::UnknownNode(node))
    }

    pub fn routers(&self) -> &[FaceRouter] {
        &self.routers
    }

    pub fn add_binding(&mut self, binding: Box<dyn UpBinding>) {
        self.bindings.push(binding);
    }

    /// Events still queued.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Schedule `from` to originate a message to `to` at `at`.
    ///
    /// Requests before the end of the hello bootstrap are moved to the
    /// instant routing starts.
    pub fn originate(&mut self, at: SimTime, from: NodeId, to: NodeId) -> SimResult<()> {
        self.position_of(from)?;
        self.position_of(to)?;
        let at = at.max(self.config.routing_start());
        self.queue.push(at, Event::Originate { node: from, to });
        Ok(())
    }

    /// Run until the queue drains or `config.end_time` is reached.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_time;
        self.run_until(end, observer)?;
        observer.on_sim_end(self.now);
        Ok(())
    }

    /// Process every event scheduled at or before `until`.
    pub fn run_until<O: SimObserver>(&mut self, until: SimTime, observer: &mut O) -> SimResult<()> {
        while self.queue.next_time().is_some_and(|t| t <= until) {
            let Some((at, handle, event)) = self.queue.pop() else {
                break;
            };
            self.now = at;
            self.process(handle, event, observer)?;
        }
        Ok(())
    }

    // ── Event processing ──────────────────────────────────────────────────

    fn process<O: SimObserver>(
        &mut self,
        handle:   EventHandle,
        event:    Event,
        observer: &mut O,
    ) -> SimResult<()> {
        match event {
            Event::Hello { node, round }   => self.broadcast_hello(node, round, observer),
            Event::SendFired { node }      => self.transmit(node, handle, observer),
            Event::Receive { node, frame } => self.receive(node, frame, observer),
            Event::Originate { node, to }  => self.start_message(node, to, observer),
            Event::Bootstrap { round }     => {
                self.bootstrap(round);
                Ok(())
            }
        }
    }

    fn broadcast_hello<O: SimObserver>(&mut self, node: NodeId, round: u8, observer: &mut O) -> SimResult<()> {
        let router = self.router(node)?;
        let me     = router.me();
        let heard  = if round >= 2 { router.neighbors().ids() } else { Vec::new() };
        let header = PacketHeader::hello(me, u32::from(round));

        observer.on_transmit(self.now, &header);
        let arrive = self.now + self.config.link_delay;
        for to in self.medium.in_range(node, me.pos) {
            let frame = Frame::Hello { header: header.clone(), heard: heard.clone() };
            self.queue.push(arrive, Event::Receive { node: to, frame });
        }
        Ok(())
    }

    fn bootstrap(&mut self, round: u8) {
        if round < 2 {
            for router in &mut self.routers {
                router.bootstrap(round);
            }
            return;
        }

        #[cfg(not(feature = "parallel"))]
        let faces: Vec<FaceGraph> = self.routers.iter().map(FaceRouter::compute_face_graph).collect();

        #[cfg(feature = "parallel")]
        let faces: Vec<FaceGraph> = {
            use rayon::prelude::*;
            self.routers.par_iter().map(FaceRouter::compute_face_graph).collect()
        };

        for (router, face) in self.routers.iter_mut().zip(faces) {
            router.install_face_graph(face);
            router.set_bootstrapped();
        }
        debug!(at = %self.now, nodes = self.routers.len(), "bootstrap complete");
    }

    /// A queued send came due: put it on the air if it was not revoked.
    fn transmit<O: SimObserver>(&mut self, node: NodeId, handle: EventHandle, observer: &mut O) -> SimResult<()> {
        let from = self.position_of(node)?;
        let Some(header) = self.routers[node.index()].on_send_fired(handle) else {
            trace!(%node, ?handle, "send revoked before firing");
            return Ok(());
        };

        let Some(to) = header.next_hop else {
            warn!(%node, msg = %header.message, "data frame without next hop");
            observer.on_drop(self.now, node, &header, DropReason::Malformed);
            return Ok(());
        };
        let to_pos = self.position_of(to)?;

        observer.on_transmit(self.now, &header);
        if self.medium.reachable(from, to_pos) {
            let arrive = self.now + self.config.link_delay;
            self.queue.push(arrive, Event::Receive { node: to, frame: Frame::Data(header) });
        } else {
            debug!(%node, %to, msg = %header.message, "next hop out of range");
            observer.on_drop(self.now, node, &header, DropReason::OutOfRange);
        }
        Ok(())
    }

    fn receive<O: SimObserver>(&mut self, node: NodeId, frame: Frame, observer: &mut O) -> SimResult<()> {
        let i = node.index();
        if i >= self.routers.len() {
            return Err(SimError::UnknownNode(node));
        }
        match frame {
            Frame::Hello { header, heard } => {
                self.routers[i].observe_neighbor(header.source, heard.contains(&node));
            }
            Frame::Data(header) => {
                let mut link = SimLink {
                    now:      self.now,
                    node,
                    jitter:   self.config.send_jitter,
                    queue:    &mut self.queue,
                    rng:      &mut self.rngs[i],
                    bindings: &mut self.bindings,
                    observer,
                };
                self.routers[i].on_receive(header, &mut link);
            }
        }
        Ok(())
    }

    fn start_message<O: SimObserver>(&mut self, node: NodeId, to: NodeId, observer: &mut O) -> SimResult<()> {
        let destination = Destination::new(to, self.position_of(to)?);
        let i = node.index();
        if i >= self.routers.len() {
            return Err(SimError::UnknownNode(node));
        }

        let mut link = SimLink {
            now:      self.now,
            node,
            jitter:   self.config.send_jitter,
            queue:    &mut self.queue,
            rng:      &mut self.rngs[i],
            bindings: &mut self.bindings,
            observer: &mut *observer,
        };
        match self.routers[i].on_originate(destination, &mut link) {
            Ok(message) => observer.on_originate(self.now, node, message),
            Err(e) => {
                warn!(%node, %to, error = %e, "origination failed");
                observer.on_origin_failed(self.now, node, &e);
            }
        }
        Ok(())
    }
}
