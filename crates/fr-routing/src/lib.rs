//! `fr-routing` — the per-node concurrent face-routing state machine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`header`]     | `PacketHeader`, `PacketKind`, `MessageId`, header overhead    |
//! | [`buffer`]     | `OutboundBuffer` of queued / sent packets                     |
//! | [`rendezvous`] | Mate-on-receive and combine-on-enqueue rules                  |
//! | [`link`]       | `Link` (scheduler + transport seam), `UpBinding`, `fan_out`   |
//! | [`router`]     | `FaceRouter` — origin, receive, forward, split, spray         |
//! | [`error`]      | `RoutingError`, `RoutingResult<T>`, `DropReason`              |
//!
//! # Design notes
//!
//! A router owns only its own tables.  Everything it needs from the outside
//! world (the clock, a way to queue a revocable send, a way to hand packets
//! up) comes through the [`Link`] passed into each call, so the state machine
//! is driven identically by the discrete-event harness in `fr-sim` and by the
//! fake links in this crate's tests.
//!
//! Every packet copy of one application message carries the same
//! [`MessageId`].  Sweeps of the same message that meet on an edge cancel
//! or merge (see [`rendezvous`]), which bounds the number of copies in
//! flight.

pub mod buffer;
pub mod error;
pub mod header;
pub mod link;
pub mod rendezvous;
pub mod router;


pub use buffer::{BufferEntry, OutboundBuffer, SendState};
pub use error::{DropReason, RoutingError, RoutingResult};
pub use header::{HEADER_OVERHEAD_BYTES, MessageId, PacketHeader, PacketKind, header_overhead_bytes};
pub use link::{Link, UpBinding, fan_out};
pub use rendezvous::{Combine, Mate, combine, resolve_mate};
pub use router::FaceRouter;
