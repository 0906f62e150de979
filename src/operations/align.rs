use crate::error::{ArgumentError, Result};
use crate::math::distance_2d::endpoint_pairing_distances;
use crate::topology::{OutlineStore, VertexId};

/// Returns `true` if the vertex runs `a` and `b` point the same way.
///
/// Runs sharing both endpoints in the same order are aligned, runs sharing
/// them in reverse order are not. Otherwise the runs are aligned if pairing
/// start with start and end with end moves the endpoints no further than
/// the crossed pairing; ties count as aligned. This is a heuristic for runs
/// that don't touch yet, not a topological test.
///
/// # Errors
///
/// Returns an error if a sequence is empty or an endpoint vertex is unknown.
pub fn are_direction_aligned(store: &OutlineStore, a: &[VertexId], b: &[VertexId]) -> Result<bool> {
    let (Some(&a_start), Some(&a_end)) = (a.first(), a.last()) else {
        return Err(ArgumentError::SequenceTooShort(a.len()).into());
    };
    let (Some(&b_start), Some(&b_end)) = (b.first(), b.last()) else {
        return Err(ArgumentError::SequenceTooShort(b.len()).into());
    };

    if a_start == b_start && a_end == b_end {
        return Ok(true);
    }
    if a_start == b_end && a_end == b_start {
        return Ok(false);
    }

    let (straight, crossed) = endpoint_pairing_distances(
        &store.vertex(a_start)?.point,
        &store.vertex(a_end)?.point,
        &store.vertex(b_start)?.point,
        &store.vertex(b_end)?.point,
    );
    Ok(straight <= crossed)
}
