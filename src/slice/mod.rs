//! Contiguous runs of vertices on a polyline.
//!
//! A [`Slice`] is a view into an [`OutlineStore`] snapshot: it borrows the
//! store, so it has to be derived again after every mutation.
//!
//! For an open polyline a slice is always `[start, start+1, ..., end]`. For a
//! closed polyline it is either that run (`in_direction == true`) or the
//! complementary arc through the join vertex, `[end, ..., len-2, 0, ..., start]`
//! (`in_direction == false`). `start < end` holds in both cases.

mod derive;
mod replace;
mod sequence;

pub use replace::check_closed;
pub use sequence::find_slice_boundary;

use std::collections::HashSet;
use std::fmt;

use crate::error::{ArgumentError, Result};
use crate::topology::{OutlineStore, PolylineData, PolylineId, VertexId};

/// A contiguous, possibly wrap-around sub-sequence of a polyline's vertices.
#[derive(Clone, Copy)]
pub struct Slice<'a> {
    store: &'a OutlineStore,
    polyline: PolylineId,
    data: &'a PolylineData,
    start: usize,
    end: usize,
    in_direction: bool,
}

impl<'a> Slice<'a> {
    /// Creates the in-direction slice `[start, ..., end]`.
    ///
    /// # Errors
    ///
    /// See [`Slice::with_direction`].
    pub fn new(
        store: &'a OutlineStore,
        polyline: PolylineId,
        start: usize,
        end: usize,
    ) -> Result<Self> {
        Self::with_direction(store, polyline, start, end, true)
    }

    /// Creates a slice with an explicit traversal direction.
    ///
    /// `in_direction == false` selects the arc `[end, ..., 0, ..., start]`
    /// wrapping through the join vertex and is only valid on a closed
    /// polyline.
    ///
    /// # Errors
    ///
    /// Returns an error if the polyline is unknown, an index is out of range,
    /// `start >= end`, a wrap-around slice is requested on an open polyline,
    /// or a closed polyline slice would span only the join vertex
    /// (`start == 0 && end == len - 1`).
    pub fn with_direction(
        store: &'a OutlineStore,
        polyline: PolylineId,
        start: usize,
        end: usize,
        in_direction: bool,
    ) -> Result<Self> {
        let data = store.polyline(polyline)?;
        let len = data.len();
        if start >= len {
            return Err(ArgumentError::IndexOutOfRange {
                name: "start",
                index: start,
                len,
            }
            .into());
        }
        if end >= len {
            return Err(ArgumentError::IndexOutOfRange {
                name: "end",
                index: end,
                len,
            }
            .into());
        }
        if start >= end {
            return Err(ArgumentError::StartNotBeforeEnd { start, end }.into());
        }
        let closed = data.is_closed();
        if !in_direction && !closed {
            return Err(ArgumentError::WrapOnOpenPolyline.into());
        }
        if closed && start == 0 && end == len - 1 {
            return Err(ArgumentError::JoinVertexSlice.into());
        }
        Ok(Self {
            store,
            polyline,
            data,
            start,
            end,
            in_direction,
        })
    }

    /// The store snapshot this slice was derived from.
    #[must_use]
    pub fn store(&self) -> &'a OutlineStore {
        self.store
    }

    /// The polyline this is a slice of.
    #[must_use]
    pub fn polyline(&self) -> PolylineId {
        self.polyline
    }

    /// The node list of the polyline this is a slice of.
    #[must_use]
    pub fn polyline_data(&self) -> &'a PolylineData {
        self.data
    }

    /// The lower of the two boundary indices.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The upper of the two boundary indices.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// `true` if the slice runs from `start` up to `end`, `false` if it wraps
    /// through the join vertex of a closed polyline.
    #[must_use]
    pub fn is_in_direction(&self) -> bool {
        self.in_direction
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.data.is_closed()
    }

    #[must_use]
    pub fn start_vertex(&self) -> VertexId {
        self.data.vertices[self.start]
    }

    #[must_use]
    pub fn end_vertex(&self) -> VertexId {
        self.data.vertices[self.end]
    }

    /// Number of polyline segments covered by this slice.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        if self.in_direction {
            self.end - self.start
        } else {
            self.start + (self.data.len() - 1 - self.end)
        }
    }

    /// Index of the vertex just outside the lower boundary of the slice.
    ///
    /// ```text
    /// n0 ------ n1 ------ n2 ------ n3 ------ n4
    ///           start              end
    /// ^ start tear-off (0)                    ^ end tear-off (4)
    /// ```
    ///
    /// `None` if the slice starts at the first vertex of an open polyline, or
    /// covers a closed polyline up to the neighbouring vertex. On a closed
    /// polyline the join vertex is reported as index 0.
    #[must_use]
    pub fn start_tear_off_index(&self) -> Option<usize> {
        if !self.is_closed() {
            return self.start.checked_sub(1);
        }
        let m = self.data.len() - 1;
        let (from, other) = if self.in_direction {
            (self.start % m, self.end % m)
        } else {
            (self.end % m, self.start % m)
        };
        let lower = (from + m - 1) % m;
        (lower != other).then_some(lower)
    }

    /// Index of the vertex just outside the upper boundary of the slice.
    ///
    /// `None` if the slice ends at the last vertex of an open polyline, or
    /// covers a closed polyline up to the neighbouring vertex.
    #[must_use]
    pub fn end_tear_off_index(&self) -> Option<usize> {
        if !self.is_closed() {
            return (self.end + 1 < self.data.len()).then_some(self.end + 1);
        }
        let m = self.data.len() - 1;
        let (from, other) = if self.in_direction {
            (self.end % m, self.start % m)
        } else {
            (self.start % m, self.end % m)
        };
        let upper = (from + 1) % m;
        (upper != other).then_some(upper)
    }

    /// The vertex at [`Slice::start_tear_off_index`].
    #[must_use]
    pub fn start_tear_off_vertex(&self) -> Option<VertexId> {
        self.start_tear_off_index().and_then(|i| self.data.vertex(i))
    }

    /// The vertex at [`Slice::end_tear_off_index`].
    #[must_use]
    pub fn end_tear_off_vertex(&self) -> Option<VertexId> {
        self.end_tear_off_index().and_then(|i| self.data.vertex(i))
    }

    /// The complementary arc of a closed polyline, or `None` for an open one.
    #[must_use]
    pub fn opposite(&self) -> Option<Self> {
        self.is_closed().then_some(Self {
            in_direction: !self.in_direction,
            ..*self
        })
    }

    /// The vertices of this slice in traversal order, both ends included.
    ///
    /// A wrap-around slice is enumerated from `end` up to the last distinct
    /// vertex, then from index 0 up to `start`, so the join vertex appears
    /// exactly once.
    #[must_use]
    pub fn vertices(&self) -> Vec<VertexId> {
        let nodes = &self.data.vertices;
        if self.in_direction {
            return nodes[self.start..=self.end].to_vec();
        }
        let len = nodes.len();
        let mut out = Vec::with_capacity(self.segment_count() + 1);
        out.extend_from_slice(&nodes[self.end..len - 1]);
        out.extend_from_slice(&nodes[..=self.start]);
        out
    }

    /// Returns `true` if a vertex of this slice occurs more than once on the
    /// polyline, i.e. the slice takes part in a sling.
    ///
    /// ```text
    ///               5
    ///               |
    /// 1 ---- 2 ---- 3 ---- 4
    ///               |      |
    ///               7 ---- 6
    /// ```
    ///
    /// On the open polyline `[1,2,3,4,6,7,3,5]` the slice `[1,2,3,4]` takes
    /// part in a sling, `[1,2]` doesn't. Diagnostic only.
    #[must_use]
    pub fn has_slings(&self) -> bool {
        let members: HashSet<VertexId> = self.vertices().into_iter().collect();
        let nodes = &self.data.vertices;
        let distinct = if self.is_closed() {
            &nodes[..nodes.len() - 1]
        } else {
            &nodes[..]
        };
        let mut seen = HashSet::new();
        distinct
            .iter()
            .filter(|v| members.contains(v))
            .any(|&v| !seen.insert(v))
    }
}

impl PartialEq for Slice<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.store, other.store)
            && self.polyline == other.polyline
            && self.start == other.start
            && self.end == other.end
            && self.in_direction == other.in_direction
    }
}

impl Eq for Slice<'_> {}

impl fmt::Debug for Slice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("polyline", &self.polyline)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("in_direction", &self.in_direction)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ContourMergeError;
    use crate::test_fixtures::{closed, open, ring_vertices};

    #[test]
    fn open_slice_vertices_match_index_range() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 5);
        let p = open(&mut store, &v);

        for start in 0..5 {
            for end in start + 1..5 {
                let slice = Slice::new(&store, p, start, end).unwrap();
                assert_eq!(slice.vertices(), v[start..=end].to_vec());
                assert_eq!(slice.segment_count(), end - start);
                assert_eq!(slice.polyline_data(), store.polyline(p).unwrap());
            }
        }
    }

    #[test]
    fn rejects_invalid_boundaries() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 4);
        let p = open(&mut store, &v);

        assert!(matches!(
            Slice::new(&store, p, 2, 2),
            Err(ContourMergeError::Argument(ArgumentError::StartNotBeforeEnd { .. }))
        ));
        assert!(matches!(
            Slice::new(&store, p, 1, 4),
            Err(ContourMergeError::Argument(ArgumentError::IndexOutOfRange { name: "end", .. }))
        ));
        assert!(matches!(
            Slice::with_direction(&store, p, 1, 2, false),
            Err(ContourMergeError::Argument(ArgumentError::WrapOnOpenPolyline))
        ));
    }

    #[test]
    fn rejects_join_vertex_slice_on_closed_polyline() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 4);
        let p = closed(&mut store, &v);

        assert!(matches!(
            Slice::new(&store, p, 0, 4),
            Err(ContourMergeError::Argument(ArgumentError::JoinVertexSlice))
        ));
        assert!(Slice::new(&store, p, 0, 3).is_ok());
        assert!(Slice::new(&store, p, 1, 4).is_ok());
    }

    #[test]
    fn wrap_around_vertices_visit_join_once() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 5);
        let p = closed(&mut store, &v);
        let len = 6;

        for start in 0..len - 1 {
            for end in start + 1..len {
                if start == 0 && end == len - 1 {
                    continue;
                }
                let slice = Slice::with_direction(&store, p, start, end, false).unwrap();
                let vertices = slice.vertices();
                assert_eq!(vertices.len(), start + 1 + (len - 1 - end));
                assert_eq!(vertices.len(), slice.segment_count() + 1);
                let joins = vertices.iter().filter(|&&x| x == v[0]).count();
                assert_eq!(joins, 1, "start={start}, end={end}");
            }
        }
    }

    #[test]
    fn wrap_around_vertices_order() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 5);
        let p = closed(&mut store, &v);

        let slice = Slice::with_direction(&store, p, 1, 3, false).unwrap();
        assert_eq!(slice.vertices(), vec![v[3], v[4], v[0], v[1]]);
        assert_eq!(slice.start_vertex(), v[1]);
        assert_eq!(slice.end_vertex(), v[3]);
    }

    #[test]
    fn tear_off_on_open_polyline() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 5);
        let p = open(&mut store, &v);

        let inner = Slice::new(&store, p, 1, 3).unwrap();
        assert_eq!(inner.start_tear_off_vertex(), Some(v[0]));
        assert_eq!(inner.end_tear_off_vertex(), Some(v[4]));

        let head = Slice::new(&store, p, 0, 2).unwrap();
        assert_eq!(head.start_tear_off_index(), None);
        assert_eq!(head.end_tear_off_index(), Some(3));

        let tail = Slice::new(&store, p, 2, 4).unwrap();
        assert_eq!(tail.end_tear_off_index(), None);
    }

    #[test]
    fn tear_off_on_closed_polyline() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 5);
        let p = closed(&mut store, &v);

        let inner = Slice::new(&store, p, 1, 3).unwrap();
        assert_eq!(inner.start_tear_off_index(), Some(0));
        assert_eq!(inner.end_tear_off_index(), Some(4));

        let from_join = Slice::new(&store, p, 0, 2).unwrap();
        assert_eq!(from_join.start_tear_off_index(), Some(4));
        assert_eq!(from_join.end_tear_off_index(), Some(3));

        let wrap = Slice::with_direction(&store, p, 1, 3, false).unwrap();
        assert_eq!(wrap.start_tear_off_vertex(), Some(v[2]));
        assert_eq!(wrap.end_tear_off_vertex(), Some(v[2]));

        // [n2, n3, n4, n0]: the vertex after the join is n1
        let to_join = Slice::new(&store, p, 2, 5).unwrap();
        assert_eq!(to_join.start_tear_off_index(), Some(1));
        assert_eq!(to_join.end_tear_off_index(), Some(1));
    }

    #[test]
    fn tear_off_absent_when_ring_is_consumed() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 4);
        let p = closed(&mut store, &v);

        // [n1, n2, n3, n0]: only n0 -> n1 is left outside
        let slice = Slice::new(&store, p, 1, 4).unwrap();
        assert_eq!(slice.start_tear_off_index(), None);
        assert_eq!(slice.end_tear_off_index(), None);
    }

    #[test]
    fn opposite_only_for_closed() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 5);
        let ring = closed(&mut store, &v);
        let line = open(&mut store, &v);

        let slice = Slice::new(&store, ring, 1, 3).unwrap();
        let opposite = slice.opposite().unwrap();
        assert!(!opposite.is_in_direction());
        assert_eq!(opposite.vertices(), vec![v[3], v[4], v[0], v[1]]);
        assert_eq!(opposite.opposite(), Some(slice));

        assert!(Slice::new(&store, line, 1, 3).unwrap().opposite().is_none());
    }

    #[test]
    fn detects_slings() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 8);
        let p = store
            .add_polyline(vec![v[1], v[2], v[3], v[4], v[6], v[7], v[3], v[5]])
            .unwrap();

        assert!(Slice::new(&store, p, 0, 3).unwrap().has_slings());
        assert!(!Slice::new(&store, p, 0, 1).unwrap().has_slings());
    }

    #[test]
    fn join_vertex_is_not_a_sling() {
        let mut store = OutlineStore::new();
        let v = ring_vertices(&mut store, 4);
        let p = closed(&mut store, &v);

        assert!(!Slice::new(&store, p, 0, 2).unwrap().has_slings());
        assert!(!Slice::with_direction(&store, p, 1, 3, false)
            .unwrap()
            .has_slings());
    }
}
