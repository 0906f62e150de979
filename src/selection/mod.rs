//! Operator selection state and the per-dataset merge sessions built on it.

mod registry;
mod session;

pub use registry::SessionRegistry;
pub use session::{MergeSession, SegmentRef};

use std::collections::BTreeSet;

use crate::error::{ArgumentError, Result};
use crate::slice::Slice;
use crate::topology::{DatasetEvent, DatasetId, OutlineStore, PolylineId, VertexId};

/// Ordered set of vertices the operator marked as slice boundaries.
///
/// Bound to one dataset: every mutator rejects vertices that don't belong to
/// it. Call [`SelectionState::on_dataset_event`] after every dataset change so
/// the selection never refers to deleted or detached vertices.
#[derive(Debug, Clone)]
pub struct SelectionState {
    dataset: DatasetId,
    selected: Vec<VertexId>,
}

impl SelectionState {
    /// Creates an empty selection for `dataset`.
    #[must_use]
    pub fn new(dataset: DatasetId) -> Self {
        Self {
            dataset,
            selected: Vec::new(),
        }
    }

    /// The dataset this selection is bound to.
    #[must_use]
    pub fn dataset(&self) -> DatasetId {
        self.dataset
    }

    /// The selected vertices, in selection order.
    #[must_use]
    pub fn selected(&self) -> &[VertexId] {
        &self.selected
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn ensure_owned(&self, store: &OutlineStore, vertex: VertexId) -> Result<()> {
        store.ensure_dataset(self.dataset)?;
        if vertex.dataset() != self.dataset {
            return Err(ArgumentError::ForeignDataset {
                expected: self.dataset.get(),
                actual: vertex.dataset().get(),
            }
            .into());
        }
        if store.contains_vertex(vertex) {
            Ok(())
        } else {
            Err(ArgumentError::VertexNotInDataset.into())
        }
    }

    /// Returns `true` if `vertex` is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if `vertex` isn't part of this selection's dataset.
    pub fn is_selected(&self, store: &OutlineStore, vertex: VertexId) -> Result<bool> {
        self.ensure_owned(store, vertex)?;
        Ok(self.selected.contains(&vertex))
    }

    /// Adds `vertex` to the selection. Selecting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if `vertex` isn't part of this selection's dataset.
    pub fn select(&mut self, store: &OutlineStore, vertex: VertexId) -> Result<()> {
        if !self.is_selected(store, vertex)? {
            self.selected.push(vertex);
        }
        Ok(())
    }

    /// Removes `vertex` from the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if `vertex` isn't part of this selection's dataset.
    pub fn deselect(&mut self, store: &OutlineStore, vertex: VertexId) -> Result<()> {
        self.ensure_owned(store, vertex)?;
        self.selected.retain(|&v| v != vertex);
        Ok(())
    }

    /// Flips the selection state of `vertex` and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns an error if `vertex` isn't part of this selection's dataset.
    pub fn toggle(&mut self, store: &OutlineStore, vertex: VertexId) -> Result<bool> {
        if self.is_selected(store, vertex)? {
            self.deselect(store, vertex)?;
            Ok(false)
        } else {
            self.select(store, vertex)?;
            Ok(true)
        }
    }

    /// Deselects all vertices.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// All polylines that contain at least one selected vertex.
    #[must_use]
    pub fn selected_polylines(&self, store: &OutlineStore) -> BTreeSet<PolylineId> {
        self.selected
            .iter()
            .filter_map(|&v| store.vertex(v).ok())
            .flat_map(|v| v.referrers().iter().copied())
            .collect()
    }

    /// Positions of the selected vertices on `polyline`. The join vertex of a
    /// closed polyline is reported at index 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the polyline is unknown.
    pub fn selected_indices_on(
        &self,
        store: &OutlineStore,
        polyline: PolylineId,
    ) -> Result<BTreeSet<usize>> {
        let data = store.polyline(polyline)?;
        Ok(self
            .selected
            .iter()
            .filter_map(|&v| data.index_of(v))
            .collect())
    }

    /// Derives the slice around `segment` bounded by the selected vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` isn't this selection's dataset or the
    /// segment doesn't exist.
    pub fn derive_slice<'a>(
        &self,
        store: &'a OutlineStore,
        segment: SegmentRef,
    ) -> Result<Option<Slice<'a>>> {
        store.ensure_dataset(self.dataset)?;
        let indices = self.selected_indices_on(store, segment.polyline)?;
        Slice::from_selection(store, segment.polyline, segment.lower_index, &indices)
    }

    /// Removes vertices that are detached, deleted or no longer part of any
    /// polyline. Returns the number of vertices removed.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` isn't this selection's dataset.
    pub fn prune(&mut self, store: &OutlineStore) -> Result<usize> {
        store.ensure_dataset(self.dataset)?;
        let before = self.selected.len();
        self.selected.retain(|&v| {
            store
                .vertex(v)
                .is_ok_and(|data| !data.is_deleted() && !data.referrers().is_empty())
        });
        let removed = before - self.selected.len();
        if removed > 0 {
            tracing::debug!(dataset = %self.dataset, removed, "pruned selection");
        }
        Ok(removed)
    }

    /// Reacts to a dataset change. Added vertices are ignored, every other
    /// event prunes the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` isn't this selection's dataset.
    pub fn on_dataset_event(
        &mut self,
        store: &OutlineStore,
        event: &DatasetEvent,
    ) -> Result<usize> {
        match event {
            DatasetEvent::VerticesAdded(_) => Ok(0),
            DatasetEvent::VerticesRemoved(_)
            | DatasetEvent::NodeListChanged(_)
            | DatasetEvent::DataChanged => self.prune(store),
        }
    }
}
