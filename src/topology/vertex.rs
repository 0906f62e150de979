use std::collections::{BTreeMap, BTreeSet};

use crate::math::Point2;

use super::polyline::PolylineId;
use super::DatasetId;

slotmap::new_key_type! {
    /// Arena slot of a vertex inside one store.
    pub(crate) struct VertexKey;
}

/// Unique identifier for a vertex.
///
/// Arena slots of different stores overlap, so the ID also records the
/// dataset that issued it. A store rejects IDs issued by another dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId {
    dataset: DatasetId,
    key: VertexKey,
}

impl VertexId {
    pub(crate) fn new(dataset: DatasetId, key: VertexKey) -> Self {
        Self { dataset, key }
    }

    /// The dataset that issued this ID.
    #[must_use]
    pub fn dataset(self) -> DatasetId {
        self.dataset
    }

    pub(crate) fn key(self) -> VertexKey {
        self.key
    }
}

/// Data associated with an outline vertex.
///
/// A vertex may be shared by several polylines at once. The set of owning
/// polylines (the referrers) is maintained by the store whenever a node list
/// changes and can't be edited directly.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 2D position of the vertex.
    pub point: Point2,
    /// Free-form key/value tags. Tagged vertices are never deleted by a merge.
    pub tags: BTreeMap<String, String>,
    referrers: BTreeSet<PolylineId>,
    deleted: bool,
}

impl VertexData {
    /// Creates a new untagged vertex at the given point.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            tags: BTreeMap::new(),
            referrers: BTreeSet::new(),
            deleted: false,
        }
    }

    /// Adds a tag, replacing any previous value for `key`.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if the vertex carries at least one tag.
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// The polylines whose node list contains this vertex.
    #[must_use]
    pub fn referrers(&self) -> &BTreeSet<PolylineId> {
        &self.referrers
    }

    /// Returns `true` once the vertex has been deleted from the dataset.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// The same position and tags, without referrers or deletion state.
    pub(crate) fn detached(self) -> Self {
        Self {
            referrers: BTreeSet::new(),
            deleted: false,
            ..self
        }
    }

    pub(crate) fn add_referrer(&mut self, polyline: PolylineId) {
        self.referrers.insert(polyline);
    }

    pub(crate) fn remove_referrer(&mut self, polyline: PolylineId) {
        self.referrers.remove(&polyline);
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}
