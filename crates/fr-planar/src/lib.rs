//! `fr-planar` — neighbour tables, planarization, and face navigation.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`neighbor`]   | `NeighborTable`, `Neighbor`, `Observation`                |
//! | [`planarizer`] | `FaceGraph`, `planarize` (Gabriel witness test)           |
//! | [`navigator`]  | `next_on_face` (rotation rule over the face graph)        |
//! | [`face`]       | `detect_face_change` (edge vs. anchor–destination line)   |
//!
//! Everything here is a pure function of one node's local tables: nothing
//! reaches into another node's state.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod face;
pub mod navigator;
pub mod neighbor;
pub mod planarizer;


pub use face::detect_face_change;
pub use navigator::next_on_face;
pub use neighbor::{Neighbor, NeighborTable, Observation};
pub use planarizer::{FaceGraph, planarize};
