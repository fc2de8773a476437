//! Node placement: CSV loader and synthetic generators.
//!
//! # CSV format
//!
//! One row per node.  Ids must be dense from 0 (in any row order); `z` is
//! optional and defaults to 0.
//!
//! ```csv
//! node_id,x,y,z
//! 0,0.0,0.0,0.0
//! 1,10.0,0.0,
//! 2,10.0,10.0,0.0
//! ```

use std::io::Read;
use std::path::Path;

use fr_core::{Position, SimRng};
use serde::Deserialize;

use crate::{SimError, SimResult};

#[derive(Deserialize)]
struct NodeRecord {
    node_id: u32,
    x:       f64,
    y:       f64,
    #[serde(default)]
    z:       Option<f64>,
}

/// Load node positions from a CSV file.  Index `i` of the result is the
/// position of `NodeId(i)`.
pub fn load_topology_csv(path: &Path) -> SimResult<Vec<Position>> {
    let file = std::fs::File::open(path)?;
    load_topology_reader(file)
}

/// Like [`load_topology_csv`] but accepts any `Read` source.
pub fn load_topology_reader<R: Read>(reader: R) -> SimResult<Vec<Position>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows: Vec<NodeRecord> = Vec::new();
    for result in csv_reader.deserialize::<NodeRecord>() {
        rows.push(result?);
    }
    rows.sort_by_key(|r| r.node_id);

    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            if r.node_id as usize != i {
                return Err(SimError::Parse(format!(
                    "node ids must be dense from 0: expected {i}, found {}",
                    r.node_id
                )));
            }
            Ok(Position::try_new(r.x, r.y, r.z.unwrap_or(0.0))?)
        })
        .collect()
}

/// `cols × rows` lattice with `spacing` metres between neighbours, row-major
/// from the origin.
pub fn grid(cols: usize, rows: usize, spacing: f64) -> Vec<Position> {
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| Position::planar(c as f64 * spacing, r as f64 * spacing)))
        .collect()
}

/// `n` positions drawn uniformly from `[0, width) × [0, height)`.
pub fn random_uniform(n: usize, width: f64, height: f64, rng: &mut SimRng) -> Vec<Position> {
    (0..n)
        .map(|_| Position::planar(rng.gen_range(0.0..width), rng.gen_range(0.0..height)))
        .collect()
}
