//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing count of simulated **microseconds**
//! wrapped in `SimTime`.  Integer time keeps event ordering exact (no
//! floating-point drift between nodes) and comparisons O(1).  The event
//! scheduler in `fr-sim` orders by `SimTime` first and scheduling order
//! second, so equal timestamps are still processed deterministically.

use std::fmt;

/// An absolute (or relative) simulated instant, in microseconds.
///
/// Stored as `u64`: at 1 µs resolution a run can last ~584,000 years.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub const MICROS_PER_SEC: u64 = 1_000_000;

    #[inline]
    pub const fn from_micros(us: u64) -> SimTime {
        SimTime(us)
    }

    #[inline]
    pub const fn from_millis(ms: u64) -> SimTime {
        SimTime(ms * 1_000)
    }

    #[inline]
    pub const fn from_secs(s: u64) -> SimTime {
        SimTime(s * Self::MICROS_PER_SEC)
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / Self::MICROS_PER_SEC as f64
    }

    /// Return the instant `us` microseconds after `self`.
    #[inline]
    pub fn offset(self, us: u64) -> SimTime {
        SimTime(self.0 + us)
    }

    /// `self − other`, clamped at zero.
    #[inline]
    pub fn saturating_sub(self, other: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(other.0))
    }
}

impl std::ops::Add for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl std::ops::Mul<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn mul(self, rhs: u64) -> SimTime {
        SimTime(self.0 * rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s", self.as_secs_f64())
    }
}
