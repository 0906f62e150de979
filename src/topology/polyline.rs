use crate::error::TopologyError;

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a polyline in the outline store.
    pub struct PolylineId;
}

/// Ordered node list of an outline polyline.
///
/// A polyline is closed when it has at least 3 entries and its first and
/// last entries are the same vertex (the join vertex).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolylineData {
    /// The ordered vertices. For a closed polyline the join vertex appears
    /// at both ends.
    pub vertices: Vec<VertexId>,
}

impl PolylineData {
    /// Creates a polyline from an ordered node list.
    #[must_use]
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Self { vertices }
    }

    /// Number of entries in the node list, including the duplicated join
    /// vertex of a closed polyline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns `true` if first and last entry are the same vertex.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 3 && self.vertices.first() == self.vertices.last()
    }

    /// Returns the vertex at `index`, if any.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<VertexId> {
        self.vertices.get(index).copied()
    }

    /// Returns the index of the first occurrence of `vertex`.
    #[must_use]
    pub fn index_of(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Returns `true` if `vertex` occurs anywhere in the node list.
    #[must_use]
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Checks the structural rules of a node list.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidPolyline` if the list has fewer than 2
    /// entries or two adjacent entries are the same vertex.
    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.vertices.len() < 2 {
            return Err(TopologyError::InvalidPolyline(format!(
                "at least 2 vertices required, got {}",
                self.vertices.len()
            )));
        }
        if let Some(i) = self.vertices.windows(2).position(|w| w[0] == w[1]) {
            return Err(TopologyError::InvalidPolyline(format!(
                "identical adjacent vertices at index {i}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::topology::{OutlineStore, VertexData};

    fn ids(n: usize) -> Vec<VertexId> {
        let mut store = OutlineStore::new();
        (0..n)
            .map(|_| store.add_vertex(VertexData::new(Point2::origin())))
            .collect()
    }

    #[test]
    fn open_polyline_is_not_closed() {
        let v = ids(3);
        let p = PolylineData::new(v.clone());
        assert!(!p.is_closed());
        assert_eq!(p.len(), 3);
        assert_eq!(p.index_of(v[2]), Some(2));
    }

    #[test]
    fn ring_is_closed() {
        let v = ids(3);
        let p = PolylineData::new(vec![v[0], v[1], v[2], v[0]]);
        assert!(p.is_closed());
        assert_eq!(p.index_of(v[0]), Some(0));
        assert!(p.contains(v[2]));
    }

    #[test]
    fn two_entries_are_never_closed() {
        let v = ids(1);
        let p = PolylineData::new(vec![v[0], v[0]]);
        assert!(!p.is_closed());
        assert!(p.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_lists() {
        let v = ids(1);
        assert!(PolylineData::new(v).validate().is_err());
    }

    #[test]
    fn validate_rejects_adjacent_duplicates() {
        let v = ids(3);
        let p = PolylineData::new(vec![v[0], v[1], v[1], v[2]]);
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn validate_accepts_slings() {
        let v = ids(5);
        let p = PolylineData::new(vec![v[0], v[1], v[2], v[3], v[4], v[2]]);
        assert!(p.validate().is_ok());
    }
}
