//! Face-change detection.
//!
//! A packet changes face when the edge it is about to traverse crosses the
//! straight line from its anchor (the source, or the node where the current
//! face sweep started) to its destination.

use fr_core::{Crossing, Destination, Precision, segments_intersect};

/// Classify edge `current → next` against the `anchor`–`destination` line.
///
/// Edges incident to the anchor or to the destination (by id) never signal
/// a face change; everything else is decided by
/// [`segments_intersect`] on the positions.
pub fn detect_face_change(
    anchor:      &Destination,
    destination: &Destination,
    current:     &Destination,
    next:        &Destination,
    precision:   Precision,
) -> Crossing {
    let incident = |d: &Destination| d.id == anchor.id || d.id == destination.id;
    if incident(current) || incident(next) {
        return Crossing::None;
    }
    segments_intersect(anchor.pos, destination.pos, current.pos, next.pos, precision)
}
