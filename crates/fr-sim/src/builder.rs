//! Fluent builder for constructing a [`Sim`].

use fr_core::{CoreError, Destination, NodeId, NodeRng, Position, SimConfig, SimTime};
use fr_routing::{FaceRouter, UpBinding};

use crate::sim::Event;
use crate::{EventQueue, RadioMedium, Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, radio range, hello period, jitter, end time, …
/// - node positions: index `i` is `NodeId(i)`; see [`crate::topology`]
///
/// # Optional inputs
///
/// | Method         | Default        |
/// |----------------|----------------|
/// | `.binding(b)`  | no up-bindings |
///
/// # Example
///
/// ```rust,ignore
/// let positions = topology::grid(5, 5, 10.0);
/// let mut sim = SimBuilder::new(config, positions).build()?;
/// sim.originate(SimTime::ZERO, NodeId(0), NodeId(24))?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    positions: Vec<Position>,
    bindings:  Vec<Box<dyn UpBinding>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, positions: Vec<Position>) -> Self {
        Self { config, positions, bindings: Vec::new() }
    }

    /// Add a consumer of delivered packets.
    pub fn binding(mut self, binding: Box<dyn UpBinding>) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Validate inputs, create one router per node, and schedule the two
    /// hello rounds and their barriers.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        if let Some(p) = self.positions.iter().find(|p| !p.is_finite()) {
            return Err(CoreError::NonFinitePosition { x: p.x, y: p.y, z: p.z }.into());
        }

        let n = self.positions.len();
        let routers: Vec<FaceRouter> = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                FaceRouter::new(Destination::new(NodeId(i as u32), pos), self.config.routing.clone())
            })
            .collect();
        let mut rngs: Vec<NodeRng> =
            (0..n).map(|i| NodeRng::new(self.config.seed, NodeId(i as u32))).collect();

        // ── Hello bootstrap ───────────────────────────────────────────────
        //
        // Barriers go in first so they precede any hello landing on the
        // same instant.
        let period = self.config.hello_period;
        let half   = (period.as_micros() / 2).max(1);

        let mut queue = EventQueue::new();
        queue.push(period, Event::Bootstrap { round: 1 });
        queue.push(period * 2, Event::Bootstrap { round: 2 });

        for (round, start) in [(1u8, SimTime::ZERO), (2u8, period)] {
            for (i, rng) in rngs.iter_mut().enumerate() {
                let at = start.offset(rng.gen_range(0..half));
                queue.push(at, Event::Hello { node: NodeId(i as u32), round });
            }
        }

        let medium = RadioMedium::new(self.config.radio_range, &self.positions);

        Ok(Sim {
            config:    self.config,
            now:       SimTime::ZERO,
            positions: self.positions,
            routers,
            rngs,
            medium,
            queue,
            bindings:  self.bindings,
        })
    }
}
