//! Planar geometry kernel.
//!
//! Positions are stored as `f64` triples, but every equality or sign test is
//! made on values scaled by a [`Precision`] factor and rounded to an integer.
//! Two nodes evaluating the "same" geometric fact through different roundoff
//! paths therefore reach the same verdict.  Routing only ever looks at
//! `x`/`y`; `z` is carried along untouched.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Position ──────────────────────────────────────────────────────────────────

/// A node position in simulation coordinates (metres).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position on the `z = 0` plane.
    #[inline]
    pub const fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Like [`new`](Self::new) but rejects NaN and infinite coordinates.
    pub fn try_new(x: f64, y: f64, z: f64) -> CoreResult<Self> {
        let p = Self { x, y, z };
        if p.is_finite() {
            Ok(p)
        } else {
            Err(CoreError::NonFinitePosition { x, y, z })
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Planar Euclidean distance.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Midpoint of the segment `self`–`other` (z averaged as well).
    #[inline]
    pub fn midpoint(self, other: Position) -> Position {
        Position::new(
            (self.x + other.x) * 0.5,
            (self.y + other.y) * 0.5,
            (self.z + other.z) * 0.5,
        )
    }

    /// Planar vector from `self` to `other`.
    #[inline]
    pub fn vector_to(self, other: Position) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// ── Precision ─────────────────────────────────────────────────────────────────

/// Fixed-point scale used for every geometric comparison.
///
/// `Precision(10_000_000)` compares at 1e-7 resolution.  Scaled values are
/// rounded to the nearest integer; the `as` cast saturates, so coordinates
/// beyond ~9e11 at the default scale clamp instead of wrapping.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Precision(pub u64);

impl Precision {
    pub const DEFAULT: Precision = Precision(10_000_000);

    /// Scale `v` and round it to an integer.
    #[inline]
    pub fn quantize(self, v: f64) -> i64 {
        (v * self.0 as f64).round() as i64
    }

    /// Quantized planar key of a position, used for ordering and equality.
    #[inline]
    pub fn key(self, p: Position) -> (i64, i64) {
        (self.quantize(p.x), self.quantize(p.y))
    }

    /// `true` if `a` and `b` are the same planar point at this precision.
    #[inline]
    pub fn same_point(self, a: Position, b: Position) -> bool {
        self.key(a) == self.key(b)
    }

    /// `a <= b` at this precision.
    #[inline]
    pub fn le(self, a: f64, b: f64) -> bool {
        self.quantize(a) <= self.quantize(b)
    }

    /// `a < b` at this precision.
    #[inline]
    pub fn lt(self, a: f64, b: f64) -> bool {
        self.quantize(a) < self.quantize(b)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── Orientation ───────────────────────────────────────────────────────────────

/// Which side of a directed line a point falls on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Side {
    /// Counter-clockwise of the line direction.
    Left,
    /// Clockwise of the line direction.
    Right,
    /// On the line (at the configured precision).
    Zero,
}

/// Twice the signed area of triangle `a`-`b`-`c`: `(b − a) × (c − a)`.
#[inline]
pub fn cross(a: Position, b: Position, c: Position) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Side of `c` relative to the directed line `a → b`.
pub fn cross_sign(a: Position, b: Position, c: Position, precision: Precision) -> Side {
    match precision.quantize(cross(a, b, c)).signum() {
        1 => Side::Left,
        -1 => Side::Right,
        _ => Side::Zero,
    }
}

// ── Segment intersection ──────────────────────────────────────────────────────

/// Verdict of testing an edge against the source–destination segment.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Crossing {
    /// The edge does not cross the segment (or touches one of its endpoints).
    None,
    /// The crossing point is one of the edge's own endpoints, or the edge
    /// lies on the segment.
    Collinear,
    /// The edge properly crosses the segment.
    Intersection,
}

/// Classify edge `cur`–`next` against segment `src`–`dst`.
///
/// Edges touching `src` or `dst` never count.  The edge's endpoints are put
/// in canonical order first, so swapping `cur` and `next` cannot change the
/// verdict.
pub fn segments_intersect(
    src:       Position,
    dst:       Position,
    cur:       Position,
    next:      Position,
    precision: Precision,
) -> Crossing {
    let touches = |p: Position| precision.same_point(p, src) || precision.same_point(p, dst);
    if touches(cur) || touches(next) {
        return Crossing::None;
    }

    let (cur, next) = if precision.key(cur) <= precision.key(next) {
        (cur, next)
    } else {
        (next, cur)
    };

    let side_cur  = cross_sign(src, dst, cur, precision);
    let side_next = cross_sign(src, dst, next, precision);
    if side_cur != Side::Zero && side_cur == side_next {
        return Crossing::None;
    }

    // src + t·r = cur + u·s, solved for t by Cramer's rule.
    let (rx, ry) = src.vector_to(dst);
    let (sx, sy) = cur.vector_to(next);
    let det = rx * sy - ry * sx;

    if precision.quantize(det) == 0 {
        let on_line = side_cur == Side::Zero && side_next == Side::Zero;
        if on_line
            && (on_segment(cur, src, dst, precision) || on_segment(next, src, dst, precision))
        {
            return Crossing::Collinear;
        }
        return Crossing::None;
    }

    let (qx, qy) = src.vector_to(cur);
    let t = (qx * sy - qy * sx) / det;
    let p = Position::new(src.x + t * rx, src.y + t * ry, src.z);

    if !on_segment(p, src, dst, precision) || !on_segment(p, cur, next, precision) {
        return Crossing::None;
    }
    if precision.same_point(p, cur) || precision.same_point(p, next) {
        Crossing::Collinear
    } else {
        Crossing::Intersection
    }
}

/// `p` lies on segment `a`–`b` iff `|a−p| + |p−b| == |a−b|` at `precision`.
fn on_segment(p: Position, a: Position, b: Position, precision: Precision) -> bool {
    precision.quantize(a.distance(p) + p.distance(b)) == precision.quantize(a.distance(b))
}
