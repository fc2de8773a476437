//! `EventQueue` — time-ordered event queue with revocable handles.
//!
//! Events are keyed by `(SimTime, EventHandle)`.  Handles are handed out in
//! increasing order, so events at the same instant pop in the order they
//! were pushed.  A side index maps each live handle to its time so that
//! [`cancel`](EventQueue::cancel) is O(log n) without scanning.
//!
//! Cancelling is idempotent: a handle that already fired, was already
//! cancelled, or was never issued returns `false`.

use std::collections::BTreeMap;

use fr_core::{EventHandle, SimTime};

#[cfg(feature = "fx-hash")]
type HandleIndex = rustc_hash::FxHashMap<EventHandle, SimTime>;
#[cfg(not(feature = "fx-hash"))]
type HandleIndex = std::collections::HashMap<EventHandle, SimTime>;

pub struct EventQueue<E> {
    events: BTreeMap<(SimTime, EventHandle), E>,
    index:  HandleIndex,
    next:   u64,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            events: BTreeMap::new(),
            index:  HandleIndex::default(),
            next:   0,
        }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at `at`.
    pub fn push(&mut self, at: SimTime, event: E) -> EventHandle {
        let handle = EventHandle(self.next);
        self.next += 1;
        self.events.insert((at, handle), event);
        self.index.insert(handle, at);
        handle
    }

    /// Revoke a scheduled event.  `true` iff it was still pending.
    pub fn cancel(&mut self, handle: EventHandle) -> bool {
        match self.index.remove(&handle) {
            Some(at) => self.events.remove(&(at, handle)).is_some(),
            None     => false,
        }
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<(SimTime, EventHandle, E)> {
        let ((at, handle), event) = self.events.pop_first()?;
        self.index.remove(&handle);
        Some((at, handle, event))
    }

    /// Time of the earliest pending event.
    pub fn next_time(&self) -> Option<SimTime> {
        self.events.keys().next().map(|&(at, _)| at)
    }

    pub fn is_pending(&self, handle: EventHandle) -> bool {
        self.index.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
