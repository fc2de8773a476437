//! `fr-sim` — discrete-event harness for the rust_fr framework.
//!
//! # Event loop
//!
//! ```text
//! t = 0 .. period/2          round-1 hellos (jittered)
//! t = period                 barrier 1: discovery round closed
//! t = period .. 1.5·period   round-2 hellos, carrying the ids each node heard
//! t = 2·period               barrier 2: every node planarizes
//!                            (parallel with the `parallel` feature)
//! t ≥ 2·period               originations; each queued send fires after a
//!                            random jitter unless revoked first, then
//!                            arrives one link delay later
//! ```
//!
//! Events at the same instant are processed in scheduling order, so a run
//! is fully determined by its configuration and seed.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Planarizes all nodes on Rayon's thread pool.           |
//! | `fx-hash`  | FxHash for the event-handle index.                     |
//! | `serde`    | Serde derives on core and routing value types.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fr_core::{NodeId, SimConfig, SimTime};
//! use fr_sim::{DeliveryStats, SimBuilder, topology};
//!
//! let config = SimConfig::default().with_radio_range(12.0);
//! let mut sim = SimBuilder::new(config, topology::grid(5, 5, 10.0)).build()?;
//! sim.originate(SimTime::ZERO, NodeId(0), NodeId(24))?;
//!
//! let mut stats = DeliveryStats::new();
//! sim.run(&mut stats)?;
//! ```

pub mod builder;
pub mod error;
pub mod event_queue;
pub mod medium;
pub mod observer;
pub mod sim;
pub mod topology;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use event_queue::EventQueue;
pub use medium::RadioMedium;
pub use observer::{DeliveryStats, NoopObserver, SimObserver};
pub use sim::Sim;
