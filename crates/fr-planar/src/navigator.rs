//! The face navigator: "which edge comes next when rotating from here?"
//!
//! Rotating from the ray `start → reference`, clockwise for [`Turn::Right`]
//! and counter-clockwise for [`Turn::Left`], the first face-graph member hit
//! is the next edge of the face being traversed.  Each candidate is
//! classified by the side of the reference ray it falls on and by its angle
//! `θ = arccos(r̂ · ĉ)` to the ray:
//!
//! - **primary**: on the turning side, or exactly along the ray (θ = 0).
//!   Smallest θ wins.
//! - **fallback**: on the other side, or exactly opposite (θ = π).  Reached
//!   only after sweeping past the back of the ray, so largest θ wins.
//!
//! Equal quantized angles go to the smaller `NodeId`.

use fr_core::{Destination, NodeId, Position, Precision, Side, Turn, cross_sign};

use crate::FaceGraph;

/// Best candidate seen so far on one side: (quantized angle, id, member).
type Pick = Option<(i64, NodeId, Destination)>;

/// Return the next face-graph member after `reference` when rotating from
/// `start` in the `turn` direction.
///
/// - Empty face graph → `None`.
/// - No candidate on either side → `reference` itself if it is a face-graph
///   member (a degree-1 node reflects the packet back), else `None`.
///
/// Zero-length vectors (a candidate, or the reference, sitting on `start`)
/// make the angle undefined; such candidates are skipped instead of failing.
pub fn next_on_face(
    start:     Position,
    reference: &Destination,
    turn:      Turn,
    face:      &FaceGraph,
    precision: Precision,
) -> Option<Destination> {
    if face.is_empty() {
        return None;
    }

    let wanted = match turn {
        Turn::Right => Side::Right,
        Turn::Left  => Side::Left,
    };

    let (rx, ry) = start.vector_to(reference.pos);
    let ref_len  = rx.hypot(ry);

    let mut primary:  Pick = None;
    let mut fallback: Pick = None;

    if precision.quantize(ref_len) != 0 {
        for cand in face.iter().filter(|c| c.id != reference.id) {
            let (cx, cy) = start.vector_to(cand.pos);
            let len = cx.hypot(cy);
            if precision.quantize(len) == 0 {
                continue;
            }

            let cos   = ((rx * cx + ry * cy) / (ref_len * len)).clamp(-1.0, 1.0);
            let angle = precision.quantize(cos.acos());
            let side  = cross_sign(start, reference.pos, cand.pos, precision);

            if side == wanted || (side == Side::Zero && cos > 0.0) {
                let better = match primary {
                    None               => true,
                    Some((a, id, _))   => angle < a || (angle == a && cand.id < id),
                };
                if better {
                    primary = Some((angle, cand.id, *cand));
                }
            } else {
                let better = match fallback {
                    None               => true,
                    Some((a, id, _))   => angle > a || (angle == a && cand.id < id),
                };
                if better {
                    fallback = Some((angle, cand.id, *cand));
                }
            }
        }
    }

    primary
        .or(fallback)
        .map(|(_, _, dest)| dest)
        .or_else(|| face.get(reference.id).copied())
}
