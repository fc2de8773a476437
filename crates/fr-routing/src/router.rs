//! `FaceRouter` — one node's forwarding and splitting state machine.
//!
//! # Receive pipeline
//!
//! ```text
//! hello                         → ignored (discovery is fed separately)
//! no destination                → drop (malformed)
//! next_hop ≠ me                 → ignored (overheard)
//! destination == me             → deliver once per message
//! purge expired buffer entries
//! hops ≥ max_hops               → drop (hop limit)
//! rendezvous                    → absorbed / annihilated / inherit direction
//! forward
//! ```
//!
//! # Forwarding
//!
//! | Situation                             | Action                                  |
//! |---------------------------------------|-----------------------------------------|
//! | destination is a planar neighbour     | last-mile straight to it                |
//! | direction `None`, face mode           | start a sweep: Right and Left from the destination ray |
//! | direction `None`, greedy mode         | closest strictly-better neighbour, else start a sweep |
//! | single direction `d`                  | next edge by `d` from the arrival edge  |
//! | `Both`                                | next edge each way; one edge → single `Both` copy |
//!
//! Every chosen edge is tested against the anchor–destination line: a
//! proper crossing turns the copy into `Both`, touching the line at a node
//! sprays `Both` copies to every planar neighbour but the arrival one.

use std::collections::BTreeSet;

use fr_core::{
    Crossing, Destination, EventHandle, ForwardingMode, NodeId, RoutingConfig, Sweep, Turn,
};
use fr_planar::{FaceGraph, NeighborTable, Observation, detect_face_change, next_on_face, planarize};
use tracing::{debug, trace, warn};

use crate::{
    BufferEntry, Combine, DropReason, Link, Mate, MessageId, OutboundBuffer, PacketHeader,
    PacketKind, RoutingError, RoutingResult, combine, resolve_mate,
};

pub struct FaceRouter {
    me:           Destination,
    config:       RoutingConfig,
    neighbors:    NeighborTable,
    face:         FaceGraph,
    buffer:       OutboundBuffer,
    delivered:    BTreeSet<MessageId>,
    next_seq:     u32,
    bootstrapped: bool,
}

impl FaceRouter {
    pub fn new(me: Destination, config: RoutingConfig) -> Self {
        Self {
            me,
            config,
            neighbors:    NeighborTable::new(),
            face:         FaceGraph::default(),
            buffer:       OutboundBuffer::new(),
            delivered:    BTreeSet::new(),
            next_seq:     0,
            bootstrapped: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> NodeId {
        self.me.id
    }

    #[inline]
    pub fn me(&self) -> Destination {
        self.me
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    pub fn face_graph(&self) -> &FaceGraph {
        &self.face
    }

    pub fn buffer(&self) -> &OutboundBuffer {
        &self.buffer
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    pub fn has_delivered(&self, message: MessageId) -> bool {
        self.delivered.contains(&message)
    }

    // ── Discovery ─────────────────────────────────────────────────────────

    /// Feed one hello.  `heard_us` is whether the hello listed this node.
    ///
    /// Once bootstrapped, with incremental planarization on, a new or moved
    /// neighbour rebuilds the face graph.  Hellos from this node itself are
    /// ignored and return `None`.
    pub fn observe_neighbor(&mut self, neighbor: Destination, heard_us: bool) -> Option<Observation> {
        if neighbor.is_same_node(&self.me) {
            return None;
        }
        let seen = self.neighbors.observe(neighbor, heard_us);
        if self.bootstrapped && self.config.incremental && seen != Observation::Refreshed {
            self.planarize();
        }
        Some(seen)
    }

    /// Discovery round barrier.  Round 1 only closes the first hello
    /// exchange; round 2 (and later) builds the face graph.
    pub fn bootstrap(&mut self, round: u8) {
        if round < 2 {
            debug!(node = %self.me.id, round, neighbors = self.neighbors.len(), "discovery round closed");
            return;
        }
        self.planarize();
        self.bootstrapped = true;
    }

    /// Face graph from the current neighbour table, without installing it.
    pub fn compute_face_graph(&self) -> FaceGraph {
        planarize(self.me.pos, &self.neighbors, self.config.planar_policy, self.config.precision)
    }

    pub fn install_face_graph(&mut self, face: FaceGraph) {
        debug!(
            node      = %self.me.id,
            neighbors = self.neighbors.len(),
            planar    = face.len(),
            "face graph rebuilt"
        );
        self.face = face;
    }

    pub fn planarize(&mut self) {
        let face = self.compute_face_graph();
        self.install_face_graph(face);
    }

    /// Mark the router as bootstrapped after the harness installed face
    /// graphs itself.
    pub fn set_bootstrapped(&mut self) {
        self.bootstrapped = true;
    }

    // ── Origin ────────────────────────────────────────────────────────────

    /// Start routing a new message to `destination`.
    ///
    /// Fails without sending anything if the destination is unusable or
    /// this node has no planar neighbours.
    pub fn on_originate<L: Link + ?Sized>(
        &mut self,
        destination: Destination,
        link:        &mut L,
    ) -> RoutingResult<MessageId> {
        if !destination.pos.is_finite() {
            warn!(node = %self.me.id, to = %destination.id, "destination has a non-finite position");
            return Err(RoutingError::Malformed(format!(
                "destination {} has a non-finite position",
                destination.id
            )));
        }
        if destination.id == self.me.id || self.face.is_empty() {
            warn!(node = %self.me.id, to = %destination.id, "no route");
            return Err(RoutingError::NoRoute { from: self.me.id, to: destination.id });
        }

        self.buffer.purge(link.now(), self.config.buffer_ttl);

        let message = MessageId { origin: self.me.id, seq: self.next_seq };
        self.next_seq = self.next_seq.wrapping_add(1);

        debug!(node = %self.me.id, msg = %message, to = %destination, "originate");
        self.forward(PacketHeader::data(message, self.me, destination), link);
        Ok(message)
    }

    // ── Receive ───────────────────────────────────────────────────────────

    pub fn on_receive<L: Link + ?Sized>(&mut self, mut header: PacketHeader, link: &mut L) {
        if header.is_hello() {
            return;
        }
        let Some(destination) = header.destination else {
            warn!(node = %self.me.id, msg = %header.message, "data packet without destination");
            link.dropped(&header, DropReason::Malformed);
            return;
        };
        if header.next_hop != Some(self.me.id) {
            return;
        }

        if destination.id == self.me.id {
            if self.delivered.insert(header.message) {
                debug!(node = %self.me.id, msg = %header.message, hops = header.hops, "delivered");
                header.kind = PacketKind::LastMile;
                link.deliver(header);
            } else {
                trace!(node = %self.me.id, msg = %header.message, "duplicate delivery");
                link.dropped(&header, DropReason::Duplicate);
            }
            return;
        }

        self.buffer.purge(link.now(), self.config.buffer_ttl);

        if header.hops >= self.config.max_hops {
            debug!(node = %self.me.id, msg = %header.message, hops = header.hops, "hop limit");
            link.dropped(&header, DropReason::HopLimit);
            return;
        }

        match resolve_mate(&mut self.buffer, self.me.id, &header) {
            Mate::None => {}
            Mate::Absorbed => {
                trace!(node = %self.me.id, msg = %header.message, from = %header.sender.id, "absorbed by pending sweep");
                link.dropped(&header, DropReason::Mated);
                return;
            }
            Mate::Inherit { direction, revoke } => {
                trace!(node = %self.me.id, msg = %header.message, %direction, "inherits mate direction");
                revoke_send(link, revoke);
                header.direction = direction;
            }
            Mate::Annihilate { revoke } => {
                trace!(node = %self.me.id, msg = %header.message, from = %header.sender.id, "sweeps met");
                revoke_send(link, revoke);
                link.dropped(&header, DropReason::Mated);
                return;
            }
        }

        self.forward(header, link);
    }

    /// The send queued under `handle` came due.  Returns the header to put
    /// on the air, or `None` if the send was revoked in the meantime.
    pub fn on_send_fired(&mut self, handle: EventHandle) -> Option<PacketHeader> {
        self.buffer.mark_sent(handle)
    }

    // ── Forwarding ────────────────────────────────────────────────────────

    fn forward<L: Link + ?Sized>(&mut self, mut header: PacketHeader, link: &mut L) {
        let Some(destination) = header.destination else {
            link.dropped(&header, DropReason::Malformed);
            return;
        };

        if let Some(hop) = self.face.get(destination.id).copied() {
            header.kind = PacketKind::LastMile;
            self.emit(header, hop, Sweep::None, link);
            return;
        }

        if self.config.mode == ForwardingMode::Greedy
            && header.direction.is_sweep()
            && self.closer_than_anchor(&header, &destination)
        {
            trace!(node = %self.me.id, msg = %header.message, "sweep back to greedy");
            header.direction = Sweep::None;
        }

        match header.direction {
            Sweep::None => match self.config.mode {
                ForwardingMode::Greedy => self.greedy(header, destination, link),
                ForwardingMode::Face   => self.start_sweep(header, destination, link),
            },
            Sweep::Right => self.sweep_single(header, destination, Turn::Right, link),
            Sweep::Left  => self.sweep_single(header, destination, Turn::Left, link),
            Sweep::Both  => self.sweep_both(header, destination, link),
        }
    }

    fn closer_than_anchor(&self, header: &PacketHeader, destination: &Destination) -> bool {
        self.config
            .precision
            .lt(self.me.distance(destination), header.anchor.distance(destination))
    }

    fn greedy<L: Link + ?Sized>(&mut self, header: PacketHeader, destination: Destination, link: &mut L) {
        let p = self.config.precision;
        let here = self.me.distance(&destination);
        let best = self
            .neighbors
            .iter()
            .map(|n| n.dest)
            .filter(|n| p.lt(n.distance(&destination), here))
            .min_by_key(|n| (p.quantize(n.distance(&destination)), n.id));

        match best {
            Some(hop) => self.emit(header, hop, Sweep::None, link),
            None => {
                debug!(node = %self.me.id, msg = %header.message, "local minimum, starting face sweep");
                self.start_sweep(header, destination, link);
            }
        }
    }

    /// Right and Left first edges from the ray towards the destination,
    /// with this node as the new anchor.
    fn start_sweep<L: Link + ?Sized>(&mut self, mut header: PacketHeader, destination: Destination, link: &mut L) {
        header.anchor = self.me;
        let mut sent = false;
        for turn in Turn::BOTH {
            let next = next_on_face(self.me.pos, &destination, turn, &self.face, self.config.precision);
            if let Some(hop) = next {
                self.emit(header.clone(), hop, turn.sweep(), link);
                sent = true;
            }
        }
        if !sent {
            self.no_route(&header, link);
        }
    }

    fn sweep_single<L: Link + ?Sized>(
        &mut self,
        header:      PacketHeader,
        destination: Destination,
        turn:        Turn,
        link:        &mut L,
    ) {
        match next_on_face(self.me.pos, &header.sender, turn, &self.face, self.config.precision) {
            Some(hop) => self.take_edge(header, destination, hop, turn.sweep(), link),
            None      => self.no_route(&header, link),
        }
    }

    fn sweep_both<L: Link + ?Sized>(&mut self, header: PacketHeader, destination: Destination, link: &mut L) {
        let p = self.config.precision;
        let right = next_on_face(self.me.pos, &header.sender, Turn::Right, &self.face, p);
        let left  = next_on_face(self.me.pos, &header.sender, Turn::Left, &self.face, p);

        match (right, left) {
            (Some(r), Some(l)) if r.id == l.id => {
                self.take_edge(header, destination, r, Sweep::Both, link);
            }
            (None, None) => self.no_route(&header, link),
            (right, left) => {
                for (turn, hop) in [(Turn::Right, right), (Turn::Left, left)] {
                    if let Some(hop) = hop {
                        self.take_edge(header.clone(), destination, hop, turn.sweep(), link);
                    }
                }
            }
        }
    }

    /// Send along `self → hop`, applying the face-change rule.
    fn take_edge<L: Link + ?Sized>(
        &mut self,
        header:      PacketHeader,
        destination: Destination,
        hop:         Destination,
        direction:   Sweep,
        link:        &mut L,
    ) {
        let crossing =
            detect_face_change(&header.anchor, &destination, &self.me, &hop, self.config.precision);
        match crossing {
            Crossing::None         => self.emit(header, hop, direction, link),
            Crossing::Intersection => {
                trace!(node = %self.me.id, msg = %header.message, to = %hop.id, "face change");
                self.emit(header, hop, Sweep::Both, link);
            }
            Crossing::Collinear    => self.spray(header, link),
        }
    }

    /// `Both` copies to every planar neighbour except the one the packet
    /// arrived from.
    fn spray<L: Link + ?Sized>(&mut self, header: PacketHeader, link: &mut L) {
        let arrival = header.sender.id;
        let targets: Vec<Destination> =
            self.face.iter().filter(|n| n.id != arrival).copied().collect();
        if targets.is_empty() {
            self.no_route(&header, link);
            return;
        }
        trace!(node = %self.me.id, msg = %header.message, fan = targets.len(), "spray");
        for hop in targets {
            self.emit(header.clone(), hop, Sweep::Both, link);
        }
    }

    fn emit<L: Link + ?Sized>(
        &mut self,
        mut header: PacketHeader,
        to:         Destination,
        direction:  Sweep,
        link:       &mut L,
    ) {
        header.sender    = self.me;
        header.next_hop  = Some(to.id);
        header.direction = direction;
        header.hops      = header.hops.saturating_add(1);

        match combine(&mut self.buffer, &header) {
            Combine::Fresh => {
                trace!(node = %self.me.id, msg = %header.message, to = %to.id, %direction, "queued");
                let handle = link.schedule_send(&header);
                self.buffer.push(BufferEntry::pending(header, handle, link.now()));
            }
            Combine::Merged => {
                trace!(node = %self.me.id, msg = %header.message, to = %to.id, "merged into pending sweep");
            }
            Combine::Duplicate => {
                trace!(node = %self.me.id, msg = %header.message, to = %to.id, "already on this edge");
                link.dropped(&header, DropReason::Duplicate);
            }
        }
    }

    fn no_route<L: Link + ?Sized>(&self, header: &PacketHeader, link: &mut L) {
        debug!(node = %self.me.id, msg = %header.message, "no next hop");
        link.dropped(header, DropReason::NoRoute);
    }
}

fn revoke_send<L: Link + ?Sized>(link: &mut L, handle: Option<EventHandle>) {
    if let Some(handle) = handle {
        if !link.cancel(handle) {
            trace!(?handle, "send already gone");
        }
    }
}
