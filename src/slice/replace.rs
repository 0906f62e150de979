use crate::error::{IntegrityError, Result};
use crate::topology::{PolylineData, VertexId};

use super::Slice;

impl Slice<'_> {
    /// Returns a copy of the polyline's node list with this slice replaced by
    /// `new_vertices`. The store is never touched.
    ///
    /// `new_vertices[0]` takes the place of the first vertex of
    /// [`Slice::vertices`]. An empty `new_vertices` yields an unchanged copy.
    ///
    /// # Errors
    ///
    /// Returns an [`IntegrityError`] if the result of replacing on a closed
    /// polyline is no longer a valid ring (see [`check_closed`]).
    pub fn replace_vertices(&self, new_vertices: &[VertexId]) -> Result<PolylineData> {
        let mut nodes = self.data.vertices.clone();
        let Some(&first_new) = new_vertices.first() else {
            return Ok(PolylineData::new(nodes));
        };
        let (start, end) = (self.start, self.end);
        let last = nodes.len() - 1;

        if !self.is_closed() {
            nodes.splice(start..=end, new_vertices.iter().copied());
            return Ok(PolylineData::new(nodes));
        }

        if !self.in_direction {
            // drop the tail arc [end..=last] and the head arc [0..=start]
            nodes.truncate(end);
            nodes.drain(..=start);
            nodes.splice(0..0, new_vertices.iter().copied());
            nodes.push(first_new);
        } else if start == 0 {
            nodes.pop();
            nodes.splice(..=end, new_vertices.iter().copied());
            nodes.push(first_new);
        } else if end == last {
            nodes.splice(start..=end, new_vertices.iter().copied());
            nodes.remove(0);
            if let Some(&head) = nodes.first() {
                nodes.push(head);
            }
        } else {
            nodes.splice(start..=end, new_vertices.iter().copied());
        }

        check_closed(&nodes)?;
        Ok(PolylineData::new(nodes))
    }
}

/// Checks the ring invariants of a closed node list: at least 3 entries,
/// first equal to last and no two adjacent entries equal.
///
/// # Errors
///
/// Returns the first violated invariant.
pub fn check_closed(nodes: &[VertexId]) -> std::result::Result<(), IntegrityError> {
    if nodes.len() < 3 {
        return Err(IntegrityError::TooShort(nodes.len()));
    }
    if nodes.first() != nodes.last() {
        return Err(IntegrityError::NotClosed);
    }
    match nodes.windows(2).position(|w| w[0] == w[1]) {
        Some(i) => Err(IntegrityError::AdjacentDuplicate(i)),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ContourMergeError;
    use crate::test_fixtures::{closed, open, ring_vertices};
    use crate::topology::OutlineStore;

    #[test]
    fn open_replaces_inner_run() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 8);
        let p = open(&mut store, &v[..5]);

        let slice = Slice::new(&store, p, 1, 3).unwrap();
        let result = slice.replace_vertices(&[v[5], v[6], v[7]]).unwrap();
        assert_eq!(result.vertices, vec![v[0], v[5], v[6], v[7], v[4]]);
        assert_eq!(store.polyline(p).unwrap().vertices, v[..5].to_vec());
    }

    #[test]
    fn open_replace_may_change_length() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 6);
        let p = open(&mut store, &v[..4]);

        let slice = Slice::new(&store, p, 0, 2).unwrap();
        let result = slice.replace_vertices(&[v[4], v[5]]).unwrap();
        assert_eq!(result.vertices, vec![v[4], v[5], v[3]]);
    }

    #[test]
    fn empty_replacement_is_identity() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 4);
        let p = closed(&mut store, &v);

        let slice = Slice::new(&store, p, 1, 2).unwrap();
        let result = slice.replace_vertices(&[]).unwrap();
        assert_eq!(&result, store.polyline(p).unwrap());
    }

    #[test]
    fn closed_interior_keeps_join() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 8);
        let p = closed(&mut store, &v[..5]);

        let slice = Slice::new(&store, p, 1, 3).unwrap();
        let result = slice.replace_vertices(&[v[5], v[6], v[7]]).unwrap();
        assert_eq!(result.vertices, vec![v[0], v[5], v[6], v[7], v[4], v[0]]);
    }

    #[test]
    fn closed_from_join_recloses_on_new_head() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 8);
        let p = closed(&mut store, &v[..5]);

        let slice = Slice::new(&store, p, 0, 2).unwrap();
        let result = slice.replace_vertices(&[v[5], v[6], v[7]]).unwrap();
        assert_eq!(result.vertices, vec![v[5], v[6], v[7], v[3], v[4], v[5]]);
    }

    #[test]
    fn closed_up_to_join_recloses_on_old_second_vertex() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 8);
        let p = closed(&mut store, &v[..5]);

        // [n2, n3, n4, n0]
        let slice = Slice::new(&store, p, 2, 5).unwrap();
        let result = slice.replace_vertices(&[v[5], v[6], v[7]]).unwrap();
        assert_eq!(result.vertices, vec![v[1], v[5], v[6], v[7], v[1]]);
    }

    #[test]
    fn closed_wrap_around_replaces_both_arcs() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 9);
        let p = closed(&mut store, &v[..6]);

        // [n4, n5, n0, n1]
        let slice = Slice::with_direction(&store, p, 1, 4, false).unwrap();
        let result = slice.replace_vertices(&[v[6], v[7], v[8]]).unwrap();
        assert_eq!(result.vertices, vec![v[6], v[7], v[8], v[2], v[3], v[6]]);
    }

    #[test]
    fn closed_replace_reports_adjacent_duplicates() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 5);
        let p = closed(&mut store, &v);

        // new run ends on the vertex that follows the slice
        let slice = Slice::new(&store, p, 1, 2).unwrap();
        let err = slice.replace_vertices(&[v[1], v[3]]).unwrap_err();
        assert!(matches!(
            err,
            ContourMergeError::Integrity(IntegrityError::AdjacentDuplicate(2))
        ));
    }

    #[test]
    fn closed_replace_reports_collapsed_ring() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 4);
        let p = closed(&mut store, &v[..3]);

        // [n1, n2, n0] replaced by a single vertex leaves a two-entry ring
        let slice = Slice::new(&store, p, 1, 3).unwrap();
        let err = slice.replace_vertices(&[v[3]]).unwrap_err();
        assert!(matches!(
            err,
            ContourMergeError::Integrity(IntegrityError::TooShort(_))
        ));
    }

    #[test]
    fn check_closed_accepts_valid_ring() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 3);
        assert!(check_closed(&[v[0], v[1], v[2], v[0]]).is_ok());
        assert_eq!(check_closed(&[v[0], v[1], v[2]]), Err(IntegrityError::NotClosed));
        assert_eq!(check_closed(&[v[0], v[0]]), Err(IntegrityError::TooShort(2)));
    }
}
