pub mod mutation;
pub mod polyline;
pub mod vertex;

pub use mutation::MutationOp;
pub use polyline::{PolylineData, PolylineId};
pub use vertex::{VertexData, VertexId};

use vertex::VertexKey;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ArgumentError, Result, TopologyError};
use slotmap::SlotMap;

static NEXT_DATASET_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one outline dataset.
///
/// Vertex IDs carry the dataset that issued them; selections and sessions
/// use it to check that a store or ID belongs to the dataset they are bound
/// to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatasetId(u64);

impl DatasetId {
    fn next() -> Self {
        Self(NEXT_DATASET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Change notification emitted by every mutating store operation.
///
/// Hosts forward these to [`crate::SessionRegistry::notify`] so that
/// selections never refer to stale vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetEvent {
    /// New vertices were added.
    VerticesAdded(Vec<VertexId>),
    /// Vertices were deleted or detached from the dataset.
    VerticesRemoved(Vec<VertexId>),
    /// The node list of a polyline changed.
    NodeListChanged(PolylineId),
    /// Anything else changed (polylines added or removed, bulk edits).
    DataChanged,
}

/// Central arena that owns all vertices and polylines of one dataset.
///
/// Polylines reference vertices by ID, so a single vertex can be shared by
/// any number of polylines. The store keeps each vertex's referrer set in
/// sync with the node lists.
#[derive(Debug)]
pub struct OutlineStore {
    id: DatasetId,
    vertices: SlotMap<VertexKey, VertexData>,
    polylines: SlotMap<PolylineId, PolylineData>,
}

impl Default for OutlineStore {
    fn default() -> Self {
        Self {
            id: DatasetId::next(),
            vertices: SlotMap::with_key(),
            polylines: SlotMap::with_key(),
        }
    }
}

impl OutlineStore {
    /// Creates a new, empty dataset with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The identity of this dataset.
    #[must_use]
    pub fn id(&self) -> DatasetId {
        self.id
    }

    /// Checks that `other` names this dataset.
    ///
    /// # Errors
    ///
    /// Returns `ArgumentError::ForeignDataset` if the identities differ.
    pub fn ensure_dataset(&self, other: DatasetId) -> Result<()> {
        if self.id == other {
            Ok(())
        } else {
            Err(ArgumentError::ForeignDataset {
                expected: other.get(),
                actual: self.id.get(),
            }
            .into())
        }
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        VertexId::new(self.id, self.vertices.insert(data.detached()))
    }

    /// Resolves `id` to its arena slot.
    fn vertex_key(&self, id: VertexId) -> Result<VertexKey> {
        if id.dataset() == self.id {
            Ok(id.key())
        } else {
            Err(ArgumentError::ForeignDataset {
                expected: self.id.get(),
                actual: id.dataset().get(),
            }
            .into())
        }
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex was issued by another dataset or is not
    /// in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData> {
        self.vertices
            .get(self.vertex_key(id)?)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()).into())
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex was issued by another dataset or is not
    /// in the store.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData> {
        let key = self.vertex_key(id)?;
        self.vertices
            .get_mut(key)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()).into())
    }

    /// Returns `true` if the vertex is still attached to this dataset.
    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        id.dataset() == self.id && self.vertices.contains_key(id.key())
    }

    /// Iterates over all vertices, including deleted ones.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        let dataset = self.id;
        self.vertices
            .iter()
            .map(move |(key, data)| (VertexId::new(dataset, key), data))
    }

    /// Marks an unreferenced vertex as deleted. The vertex stays in the arena.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is unknown or still part of a polyline.
    pub fn delete_vertex(&mut self, id: VertexId) -> Result<DatasetEvent> {
        let vertex = self.vertex_mut(id)?;
        if !vertex.referrers().is_empty() {
            return Err(TopologyError::VertexInUse(vertex.referrers().len()).into());
        }
        vertex.mark_deleted();
        Ok(DatasetEvent::VerticesRemoved(vec![id]))
    }

    /// Detaches an unreferenced vertex from the dataset entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is unknown or still part of a polyline.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<DatasetEvent> {
        let in_use = self.vertex(id)?.referrers().len();
        if in_use > 0 {
            return Err(TopologyError::VertexInUse(in_use).into());
        }
        self.vertices.remove(id.key());
        Ok(DatasetEvent::VerticesRemoved(vec![id]))
    }

    // --- Polyline operations ---

    /// Inserts a polyline built from `vertices` and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the node list is malformed or references a vertex
    /// that is unknown or deleted.
    pub fn add_polyline(&mut self, vertices: Vec<VertexId>) -> Result<PolylineId> {
        let data = PolylineData::new(vertices);
        self.check_node_list(&data)?;
        let id = self.polylines.insert(data);
        self.attach(id);
        Ok(id)
    }

    /// Returns a reference to the polyline data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the polyline is not in the store.
    pub fn polyline(&self, id: PolylineId) -> Result<&PolylineData> {
        self.polylines
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("polyline".into()).into())
    }

    /// Iterates over all polylines.
    pub fn polylines(&self) -> impl Iterator<Item = (PolylineId, &PolylineData)> {
        self.polylines.iter()
    }

    /// Replaces the node list of a polyline.
    ///
    /// # Errors
    ///
    /// Returns an error if the polyline is unknown or the new node list is
    /// malformed.
    pub fn set_polyline_vertices(
        &mut self,
        id: PolylineId,
        vertices: Vec<VertexId>,
    ) -> Result<DatasetEvent> {
        self.polyline(id)?;
        let data = PolylineData::new(vertices);
        self.check_node_list(&data)?;
        self.commit_node_list(id, data);
        Ok(DatasetEvent::NodeListChanged(id))
    }

    /// Removes a polyline. Its vertices stay in the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the polyline is not in the store.
    pub fn remove_polyline(&mut self, id: PolylineId) -> Result<DatasetEvent> {
        self.polyline(id)?;
        self.detach(id);
        self.polylines.remove(id);
        Ok(DatasetEvent::DataChanged)
    }

    pub(crate) fn check_node_list(&self, data: &PolylineData) -> Result<()> {
        data.validate()?;
        for &v in &data.vertices {
            if self.vertex(v)?.is_deleted() {
                return Err(
                    TopologyError::InvalidPolyline("references a deleted vertex".into()).into(),
                );
            }
        }
        Ok(())
    }

    pub(crate) fn commit_node_list(&mut self, id: PolylineId, data: PolylineData) {
        self.detach(id);
        if let Some(slot) = self.polylines.get_mut(id) {
            *slot = data;
        }
        self.attach(id);
    }

    fn attach(&mut self, id: PolylineId) {
        let Some(data) = self.polylines.get(id) else {
            return;
        };
        for &v in &data.vertices {
            if let Some(vertex) = self.vertices.get_mut(v.key()) {
                vertex.add_referrer(id);
            }
        }
    }

    fn detach(&mut self, id: PolylineId) {
        let Some(data) = self.polylines.get(id) else {
            return;
        };
        for &v in &data.vertices {
            if let Some(vertex) = self.vertices.get_mut(v.key()) {
                vertex.remove_referrer(id);
            }
        }
    }
}
