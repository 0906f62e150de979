use std::cmp::Ordering;

use crate::error::{ArgumentError, Result};
use crate::topology::{OutlineStore, PolylineId, VertexId};

use super::Slice;

/// Locates `sequence` as a contiguous run in `nodes`.
///
/// Only the first occurrence of `sequence[0]` is tried. Returns the inclusive
/// `(start, end)` positions of the run in `nodes`.
#[must_use]
pub fn find_slice_boundary(nodes: &[VertexId], sequence: &[VertexId]) -> Option<(usize, usize)> {
    let &first = sequence.first()?;
    let start = nodes.iter().position(|&v| v == first)?;
    let run = nodes.get(start..start + sequence.len())?;
    (run == sequence).then(|| (start, start + sequence.len() - 1))
}

impl<'a> Slice<'a> {
    /// Builds the slice of `polyline` that enumerates `sequence`, in either
    /// direction.
    ///
    /// On a closed polyline the search runs over the node list doubled
    /// around the join vertex, so runs passing through the join vertex are
    /// found as wrap-around slices.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence` has fewer than 2 vertices or the
    /// polyline is unknown. A sequence that doesn't occur yields `Ok(None)`.
    pub fn from_vertex_sequence(
        store: &'a OutlineStore,
        polyline: PolylineId,
        sequence: &[VertexId],
    ) -> Result<Option<Self>> {
        if sequence.len() < 2 {
            return Err(ArgumentError::SequenceTooShort(sequence.len()).into());
        }
        let data = store.polyline(polyline)?;
        let reversed: Vec<VertexId> = sequence.iter().rev().copied().collect();

        if !data.is_closed() {
            let boundary = find_slice_boundary(&data.vertices, sequence)
                .or_else(|| find_slice_boundary(&data.vertices, &reversed));
            return Ok(boundary.and_then(|(start, end)| {
                Self::new(store, polyline, start, end).ok()
            }));
        }

        let len = data.len();
        let mut doubled = Vec::with_capacity(2 * len - 1);
        doubled.extend_from_slice(&data.vertices[..len - 1]);
        doubled.extend_from_slice(&data.vertices);

        let boundary = find_slice_boundary(&doubled, sequence)
            .or_else(|| find_slice_boundary(&doubled, &reversed));
        Ok(boundary.and_then(|(start, end)| {
            Self::from_ring_boundary(store, polyline, len, start, end)
        }))
    }

    /// Maps a run found in the doubled node list back onto the ring.
    fn from_ring_boundary(
        store: &'a OutlineStore,
        polyline: PolylineId,
        len: usize,
        start: usize,
        end: usize,
    ) -> Option<Self> {
        let start = start % len;
        let end = if end >= len { (end + 1) % len } else { end };
        match start.cmp(&end) {
            Ordering::Less => Self::new(store, polyline, start, end).ok(),
            Ordering::Greater => Self::with_direction(store, polyline, end, start, false).ok(),
            Ordering::Equal => None,
        }
    }

    /// The slice of `other` with the same vertex sequence as this slice.
    ///
    /// # Errors
    ///
    /// Returns an error if `other` is unknown.
    pub fn as_slice_in(&self, other: PolylineId) -> Result<Option<Self>> {
        Self::from_vertex_sequence(self.store, other, &self.vertices())
    }

    /// This slice followed by every slice on another polyline that runs
    /// through the same vertex sequence.
    ///
    /// Candidates are the polylines referencing this slice's start vertex, in
    /// ID order.
    ///
    /// # Errors
    ///
    /// Returns an error if the start vertex or a referring polyline is unknown.
    pub fn find_equivalent_slices(&self) -> Result<Vec<Self>> {
        let vertices = self.vertices();
        let start = self.store.vertex(self.start_vertex())?;
        let mut slices = vec![*self];
        for &candidate in start.referrers() {
            if candidate == self.polyline {
                continue;
            }
            if let Some(slice) = Self::from_vertex_sequence(self.store, candidate, &vertices)? {
                slices.push(slice);
            }
        }
        tracing::trace!(
            polyline = ?self.polyline,
            found = slices.len(),
            "equivalent slices"
        );
        Ok(slices)
    }
}
