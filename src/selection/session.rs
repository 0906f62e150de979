use crate::error::Result;
use crate::operations::{MergeParams, MergePlan, PlanMerge};
use crate::slice::Slice;
use crate::topology::{DatasetEvent, DatasetId, OutlineStore, PolylineId};

use super::SelectionState;

/// A polyline segment `(lower_index, lower_index + 1)` used as reference for
/// deriving a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentRef {
    pub polyline: PolylineId,
    pub lower_index: usize,
}

impl SegmentRef {
    #[must_use]
    pub fn new(polyline: PolylineId, lower_index: usize) -> Self {
        Self {
            polyline,
            lower_index,
        }
    }

    /// Returns `true` if the segment still exists in `store`.
    #[must_use]
    pub fn is_valid_in(&self, store: &OutlineStore) -> bool {
        store
            .polyline(self.polyline)
            .is_ok_and(|data| self.lower_index < data.len().saturating_sub(1))
    }
}

/// Drag/drop state of one dataset: the selection plus the segment a drag
/// started on and the segment currently hovered as drop candidate.
#[derive(Debug, Clone)]
pub struct MergeSession {
    selection: SelectionState,
    drag_start: Option<SegmentRef>,
    drop: Option<SegmentRef>,
}

impl MergeSession {
    /// Creates an idle session for `dataset`.
    #[must_use]
    pub fn new(dataset: DatasetId) -> Self {
        Self {
            selection: SelectionState::new(dataset),
            drag_start: None,
            drop: None,
        }
    }

    #[must_use]
    pub fn dataset(&self) -> DatasetId {
        self.selection.dataset()
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    #[must_use]
    pub fn drag_start_segment(&self) -> Option<SegmentRef> {
        self.drag_start
    }

    pub fn set_drag_start_segment(&mut self, segment: Option<SegmentRef>) {
        self.drag_start = segment;
    }

    #[must_use]
    pub fn drop_segment(&self) -> Option<SegmentRef> {
        self.drop
    }

    pub fn set_drop_segment(&mut self, segment: Option<SegmentRef>) {
        self.drop = segment;
    }

    /// Forgets both segments. The selection is kept.
    pub fn reset(&mut self) {
        self.drag_start = None;
        self.drop = None;
    }

    /// The slice being dragged, derived from the drag-start segment.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` isn't this session's dataset or the
    /// segment is no longer part of it.
    pub fn drag_source<'a>(&self, store: &'a OutlineStore) -> Result<Option<Slice<'a>>> {
        match self.drag_start {
            Some(segment) => self.selection.derive_slice(store, segment),
            None => Ok(None),
        }
    }

    /// The slice hovered as drop candidate, derived from the drop segment.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` isn't this session's dataset or the
    /// segment is no longer part of it.
    pub fn drop_target<'a>(&self, store: &'a OutlineStore) -> Result<Option<Slice<'a>>> {
        match self.drop {
            Some(segment) => self.selection.derive_slice(store, segment),
            None => Ok(None),
        }
    }

    /// Returns `true` if a drag could start on `segment`.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` isn't this session's dataset or the
    /// segment doesn't exist.
    pub fn is_segment_draggable(&self, store: &OutlineStore, segment: SegmentRef) -> Result<bool> {
        Ok(self.selection.derive_slice(store, segment)?.is_some())
    }

    /// Returns `true` if `segment` lies on a slice the current drag source
    /// could be dropped on. A slice is never dropped on its own polyline.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` isn't this session's dataset or a segment
    /// doesn't exist.
    pub fn is_potential_drop_target(
        &self,
        store: &OutlineStore,
        segment: SegmentRef,
    ) -> Result<bool> {
        let Some(target) = self.selection.derive_slice(store, segment)? else {
            return Ok(false);
        };
        Ok(self
            .drag_source(store)?
            .is_none_or(|source| source.polyline() != target.polyline()))
    }

    /// Plans merging the current drag source onto the current drop target.
    ///
    /// # Errors
    ///
    /// See [`PlanMerge::execute`].
    pub fn plan_merge(
        &self,
        store: &OutlineStore,
        params: MergeParams,
    ) -> Result<Option<MergePlan>> {
        PlanMerge::new(self.drag_source(store)?, self.drop_target(store)?)
            .with_params(params)
            .execute()
    }

    /// Prunes the selection and drops segments that no longer exist.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` isn't this session's dataset.
    pub fn on_dataset_event(
        &mut self,
        store: &OutlineStore,
        event: &DatasetEvent,
    ) -> Result<usize> {
        let removed = self.selection.on_dataset_event(store, event)?;
        self.drag_start = self.drag_start.filter(|s| s.is_valid_in(store));
        self.drop = self.drop.filter(|s| s.is_valid_in(store));
        Ok(removed)
    }
}
