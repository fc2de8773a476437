//! Routing and simulation configuration.
//!
//! Both structs have sensible `Default`s and chainable `with_*` setters.
//! With the `serde` feature they can be loaded from any serde format by the
//! application crate; call [`SimConfig::validate`] afterwards.

use crate::{CoreError, CoreResult, Precision, SimTime};

// ── Policies ──────────────────────────────────────────────────────────────────

/// Admission rule for planar (face-graph) edges.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanarPolicy {
    /// Gabriel test on local knowledge only.  One-sided discovery can leave
    /// an edge usable from one end but not the other.
    Local,
    /// Gabriel test plus mutual confirmation: a neighbour is admitted only if
    /// its latest hello listed this node as heard.
    #[default]
    Mutual,
}

/// How data packets are forwarded between face sweeps.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForwardingMode {
    /// Concurrent face routing from the source onwards.
    #[default]
    Face,
    /// Greedy towards the destination; face sweeps only to escape local
    /// minima (greedy-face-greedy).
    Greedy,
}

// ── RoutingConfig ─────────────────────────────────────────────────────────────

/// Per-node routing parameters.  Every router in a run shares one copy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingConfig {
    /// Scale for all geometric comparisons.  Default: 10^7.
    pub precision: Precision,

    /// Face-graph admission rule.  Default: `Mutual`.
    pub planar_policy: PlanarPolicy,

    /// Default: `Face`.
    pub mode: ForwardingMode,

    /// Packets that have already travelled this many hops are dropped on
    /// receipt.  Default: 64.
    pub max_hops: u16,

    /// Sent outbound-buffer entries older than this are purged.  Default: 5 s.
    pub buffer_ttl: SimTime,

    /// Rebuild the face graph on every new or moved neighbour after
    /// bootstrap.  Default: `false` (static topology).
    pub incremental: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            precision:     Precision::DEFAULT,
            planar_policy: PlanarPolicy::default(),
            mode:          ForwardingMode::default(),
            max_hops:      64,
            buffer_ttl:    SimTime::from_secs(5),
            incremental:   false,
        }
    }
}

impl RoutingConfig {
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_planar_policy(mut self, policy: PlanarPolicy) -> Self {
        self.planar_policy = policy;
        self
    }

    pub fn with_mode(mut self, mode: ForwardingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_hops(mut self, max_hops: u16) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_buffer_ttl(mut self, ttl: SimTime) -> Self {
        self.buffer_ttl = ttl;
        self
    }

    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.precision.0 == 0 {
            return Err(CoreError::Config("precision scale must be positive".into()));
        }
        if self.max_hops == 0 {
            return Err(CoreError::Config("max_hops must be at least 1".into()));
        }
        Ok(())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Unit-disk radio range in metres.  Default: 250 m.
    pub radio_range: f64,

    /// Hello broadcast period; routing starts after two periods.
    /// Default: 1 s.
    pub hello_period: SimTime,

    /// Propagation + transmission delay of one hop.  Default: 1 ms.
    pub link_delay: SimTime,

    /// Upper bound of the random delay between queuing a packet and its
    /// transmission.  This is the window in which a queued send can still be
    /// revoked by the rendezvous protocol.  Default: 10 ms.
    pub send_jitter: SimTime,

    /// Events scheduled after this instant are not processed.  Default: 60 s.
    pub end_time: SimTime,

    pub routing: RoutingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:         42,
            radio_range:  250.0,
            hello_period: SimTime::from_secs(1),
            link_delay:   SimTime::from_millis(1),
            send_jitter:  SimTime::from_millis(10),
            end_time:     SimTime::from_secs(60),
            routing:      RoutingConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_radio_range(mut self, range: f64) -> Self {
        self.radio_range = range;
        self
    }

    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_end_time(mut self, end: SimTime) -> Self {
        self.end_time = end;
        self
    }

    /// The instant at which both bootstrap rounds have completed.
    #[inline]
    pub fn routing_start(&self) -> SimTime {
        self.hello_period * 2
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(self.radio_range.is_finite() && self.radio_range > 0.0) {
            return Err(CoreError::Config(format!(
                "radio_range must be positive and finite, got {}",
                self.radio_range
            )));
        }
        if self.hello_period == SimTime::ZERO {
            return Err(CoreError::Config("hello_period must be non-zero".into()));
        }
        self.routing.validate()
    }
}
