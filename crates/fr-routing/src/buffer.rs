//! Per-node outbound buffer.
//!
//! Every packet a node emits is recorded here, first as `Pending` while its
//! send event is still revocable, then as `Sent`.  The rendezvous protocol
//! scans the buffer on every receive and before every enqueue; sent entries
//! are kept until `RoutingConfig::buffer_ttl` so that a late opposite sweep
//! can still find its mate.

use fr_core::{EventHandle, SimTime};

use crate::PacketHeader;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SendState {
    /// Queued; the send event can still be revoked through `Link::cancel`.
    Pending(EventHandle),
    Sent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BufferEntry {
    pub header:    PacketHeader,
    pub state:     SendState,
    /// Already consumed one mate; never matched again.
    pub mated:     bool,
    pub queued_at: SimTime,
}

impl BufferEntry {
    pub fn pending(header: PacketHeader, handle: EventHandle, queued_at: SimTime) -> Self {
        Self { header, state: SendState::Pending(handle), mated: false, queued_at }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, SendState::Pending(_))
    }

    #[inline]
    pub fn handle(&self) -> Option<EventHandle> {
        match self.state {
            SendState::Pending(h) => Some(h),
            SendState::Sent       => None,
        }
    }
}

/// Insertion-ordered list of [`BufferEntry`]s.
#[derive(Clone, Debug, Default)]
pub struct OutboundBuffer {
    entries: Vec<BufferEntry>,
}

impl OutboundBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> &[BufferEntry] {
        &self.entries
    }

    /// Swap in a new entry list wholesale.
    pub fn replace(&mut self, entries: Vec<BufferEntry>) {
        self.entries = entries;
    }

    pub fn push(&mut self, entry: BufferEntry) {
        self.entries.push(entry);
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BufferEntry> {
        self.entries.get_mut(index)
    }

    pub fn remove(&mut self, index: usize) -> BufferEntry {
        self.entries.remove(index)
    }

    /// Flip the entry queued under `handle` to `Sent` and return its header.
    /// `None` if no pending entry owns the handle (it was revoked).
    pub fn mark_sent(&mut self, handle: EventHandle) -> Option<PacketHeader> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.state == SendState::Pending(handle))?;
        entry.state = SendState::Sent;
        Some(entry.header.clone())
    }

    /// Drop sent entries queued more than `ttl` before `now`.  Returns the
    /// number removed.
    pub fn purge(&mut self, now: SimTime, ttl: SimTime) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.is_pending() || now.saturating_sub(e.queued_at) <= ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
