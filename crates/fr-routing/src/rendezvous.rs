//! Rendezvous protocol: how sweep copies of one message meet and die.
//!
//! # Mate on receive
//!
//! A sweep packet P arriving at X from `s` mates with the first buffered,
//! not-yet-mated entry Q of the same message that X sent (or is about to
//! send) back over the same edge, i.e. `Q.next_hop == s`:
//!
//! | Q       | P       | Outcome                                              |
//! |---------|---------|------------------------------------------------------|
//! | BOTH    | single  | Q takes P's direction and is marked mated; P is spent |
//! | single  | BOTH    | P takes Q's direction and goes on; Q is revoked       |
//! | d       | ¬d      | both spent (Q revoked)                                |
//! | d       | d       | not mates: they travel different faces                |
//! | BOTH    | BOTH    | the copy from the smaller node id goes on as BOTH     |
//!
//! The outcome is the same whether Q is still pending or already in flight:
//! in the latter case the neighbour applies the mirror row when Q arrives.
//! Two BOTH copies crossing one edge therefore leave exactly one survivor.
//!
//! A BOTH packet that is the echo of Q itself (Q already sent, same anchor,
//! one hop further) was reflected by a neighbour with no other planar edge.
//! It is not a mate: it carries on around the face.
//!
//! # Combine on enqueue
//!
//! Before queuing packet P on edge X→n, entries of the same message on the
//! same edge are checked.  If their directions already cover P's, P is a
//! duplicate.  Otherwise a pending, unmated sweep entry is widened to BOTH
//! and absorbs P.  Otherwise P goes out on its own.

use fr_core::{EventHandle, NodeId, Sweep};

use crate::{OutboundBuffer, PacketHeader, PacketKind};

// ── Mate on receive ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mate {
    /// No buffered packet mates with the arrival.
    None,
    /// A buffered BOTH packet took over the arrival's direction.
    Absorbed,
    /// The arrival continues with `direction`; its mate was removed and, if
    /// still queued, must be revoked through `revoke`.
    Inherit { direction: Sweep, revoke: Option<EventHandle> },
    /// Both packets are spent.
    Annihilate { revoke: Option<EventHandle> },
}

/// Match `incoming` against the buffer of node `me` and apply the outcome
/// to the buffer.  Revoking the scheduled send is left to the caller.
pub fn resolve_mate(buffer: &mut OutboundBuffer, me: NodeId, incoming: &PacketHeader) -> Mate {
    if !incoming.is_sweeping() {
        return Mate::None;
    }
    let p = incoming.direction;

    let found = buffer.read().iter().enumerate().find_map(|(i, q)| {
        let candidate = !q.mated
            && q.header.is_sweeping()
            && q.header.message == incoming.message
            && q.header.sender.id == me
            && q.header.next_hop == Some(incoming.sender.id);
        let d = q.header.direction;
        let same_single = d.is_single() && d == p;
        let echo = d == Sweep::Both
            && p == Sweep::Both
            && !q.is_pending()
            && q.header.anchor.is_same_node(&incoming.anchor)
            && incoming.hops == q.header.hops.saturating_add(1);
        (candidate && !same_single && !echo).then_some((i, d))
    });
    let Some((index, q)) = found else {
        return Mate::None;
    };

    match (q, p) {
        (Sweep::Both, Sweep::Both) if incoming.sender.id < me => {
            let revoke = buffer.remove(index).handle();
            Mate::Inherit { direction: Sweep::Both, revoke }
        }
        // Also BOTH meeting BOTH from a larger id: Q goes on unchanged.
        (Sweep::Both, single) => {
            if let Some(entry) = buffer.get_mut(index) {
                entry.header.direction = single;
                entry.mated = true;
            }
            Mate::Absorbed
        }
        (single, Sweep::Both) => {
            let revoke = buffer.remove(index).handle();
            Mate::Inherit { direction: single, revoke }
        }
        // Opposite singles.
        _ => {
            let revoke = buffer.remove(index).handle();
            Mate::Annihilate { revoke }
        }
    }
}

// ── Combine on enqueue ────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Combine {
    /// Nothing on this edge yet; queue the packet.
    Fresh,
    /// Folded into a pending entry, which now sweeps BOTH.
    Merged,
    /// Already covered by what is on this edge.
    Duplicate,
}

/// Decide what to do with `outgoing` (already addressed: `sender` is this
/// node, `next_hop` set) given what the buffer holds for the same edge.
pub fn combine(buffer: &mut OutboundBuffer, outgoing: &PacketHeader) -> Combine {
    let same_edge: Vec<usize> = buffer
        .read()
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.header.kind == outgoing.kind
                && e.header.message == outgoing.message
                && e.header.sender.id == outgoing.sender.id
                && e.header.next_hop == outgoing.next_hop
        })
        .map(|(i, _)| i)
        .collect();

    if same_edge.is_empty() {
        return Combine::Fresh;
    }

    let covered = same_edge
        .iter()
        .fold(Sweep::None, |acc, &i| acc.union(buffer.read()[i].header.direction));
    if covered.covers(outgoing.direction) {
        return Combine::Duplicate;
    }

    if outgoing.kind == PacketKind::Data && outgoing.direction.is_sweep() {
        let widen = same_edge.iter().copied().find(|&i| {
            let e = &buffer.read()[i];
            !e.mated && e.is_pending() && e.header.direction.is_sweep()
        });
        if let Some(entry) = widen.and_then(|i| buffer.get_mut(i)) {
            entry.header.direction = Sweep::Both;
            return Combine::Merged;
        }
    }

    Combine::Fresh
}
