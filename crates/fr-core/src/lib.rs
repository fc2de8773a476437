//! `fr-core` — foundational types for the `rust_fr` face-routing framework.
//!
//! This crate is a dependency of every other `fr-*` crate.  It intentionally
//! has no `fr-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EventHandle`                                   |
//! | [`geo`]         | `Position`, `Precision`, `Side`, `Crossing`, intersection |
//! | [`destination`] | `Destination` (id + observed position)                    |
//! | [`sweep`]       | `Sweep` direction of a face traversal, `Turn`             |
//! | [`time`]        | `SimTime`                                                 |
//! | [`rng`]         | `NodeRng` (per-node), `SimRng` (global)                   |
//! | [`config`]      | `RoutingConfig`, `SimConfig`, policy enums                |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod destination;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod sweep;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ForwardingMode, PlanarPolicy, RoutingConfig, SimConfig};
pub use destination::Destination;
pub use error::{CoreError, CoreResult};
pub use geo::{Crossing, Position, Precision, Side, cross_sign, segments_intersect};
pub use ids::{EventHandle, NodeId};
pub use rng::{NodeRng, SimRng};
pub use sweep::{Sweep, Turn};
pub use time::SimTime;
