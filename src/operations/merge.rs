use std::collections::BTreeSet;

use crate::error::{ArgumentError, Result};
use crate::slice::Slice;
use crate::topology::{MutationOp, PolylineData, PolylineId, VertexId};

use super::align::are_direction_aligned;

/// Parameters controlling how a merge is planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeParams {
    /// Rewrite every polyline sharing the dragged vertex run, not only the
    /// one the drag started on.
    pub include_equivalent_slices: bool,
    /// Delete replaced vertices that end up unused, untagged and not part
    /// of the drop target.
    pub delete_orphaned_vertices: bool,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            include_equivalent_slices: true,
            delete_orphaned_vertices: true,
        }
    }
}

/// Ordered batch of mutations that performs one merge.
///
/// All replacements come first, then all deletions. The batch is meant to be
/// applied atomically, e.g. with [`crate::OutlineStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    ops: Vec<MutationOp>,
}

impl MergePlan {
    #[must_use]
    pub fn ops(&self) -> &[MutationOp] {
        &self.ops
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<MutationOp> {
        self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The new node list of every rewritten polyline.
    pub fn replacements(&self) -> impl Iterator<Item = (PolylineId, &PolylineData)> {
        self.ops.iter().filter_map(|op| match op {
            MutationOp::ReplaceVertices {
                polyline,
                replacement,
            } => Some((*polyline, replacement)),
            MutationOp::DeleteVertex(_) => None,
        })
    }

    /// The vertices deleted by this merge.
    pub fn deletions(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.ops.iter().filter_map(|op| match op {
            MutationOp::DeleteVertex(v) => Some(*v),
            MutationOp::ReplaceVertices { .. } => None,
        })
    }
}

/// Plans merging a dragged slice onto a drop target slice.
///
/// The dragged vertex run is replaced by the target's run, reversed where
/// needed, on every polyline carrying it. Vertices of the dragged run that
/// are then unused, untagged and not part of the target are deleted.
pub struct PlanMerge<'a> {
    source: Option<Slice<'a>>,
    target: Option<Slice<'a>>,
    params: MergeParams,
}

impl<'a> PlanMerge<'a> {
    /// Creates a new `PlanMerge` operation with default parameters.
    #[must_use]
    pub fn new(source: Option<Slice<'a>>, target: Option<Slice<'a>>) -> Self {
        Self {
            source,
            target,
            params: MergeParams::default(),
        }
    }

    /// Sets custom merge parameters.
    #[must_use]
    pub fn with_params(mut self, params: MergeParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the planning. Nothing is mutated.
    ///
    /// Returns `Ok(None)` if there is nothing to merge: a slice is missing,
    /// or source and target lie on the same polyline.
    ///
    /// # Errors
    ///
    /// Returns `ArgumentError::ForeignDataset` if the slices come from
    /// different stores, or an `IntegrityError` if a replacement would break
    /// a closed polyline. No partial plan is returned.
    pub fn execute(&self) -> Result<Option<MergePlan>> {
        let (Some(source), Some(target)) = (self.source, self.target) else {
            return Ok(None);
        };
        let store = source.store();
        if !std::ptr::eq(store, target.store()) {
            return Err(ArgumentError::ForeignDataset {
                expected: store.id().get(),
                actual: target.store().id().get(),
            }
            .into());
        }
        if source.polyline() == target.polyline() {
            tracing::debug!(polyline = ?source.polyline(), "source and target share a polyline");
            return Ok(None);
        }

        let sources = if self.params.include_equivalent_slices {
            source.find_equivalent_slices()?
        } else {
            vec![source]
        };

        let target_vertices = target.vertices();
        let target_reversed: Vec<VertexId> = target_vertices.iter().rev().copied().collect();

        let mut ops = Vec::with_capacity(sources.len() + source.segment_count() + 1);
        for slice in &sources {
            let aligned = are_direction_aligned(store, &slice.vertices(), &target_vertices)?;
            let replacement = if aligned {
                slice.replace_vertices(&target_vertices)?
            } else {
                slice.replace_vertices(&target_reversed)?
            };
            ops.push(MutationOp::ReplaceVertices {
                polyline: slice.polyline(),
                replacement,
            });
        }

        let mut deletions = Vec::new();
        if self.params.delete_orphaned_vertices {
            let merged: BTreeSet<PolylineId> = sources.iter().map(Slice::polyline).collect();
            for v in source.vertices() {
                if deletions.contains(&v) {
                    continue;
                }
                let data = store.vertex(v)?;
                if data.referrers().is_subset(&merged)
                    && !data.is_tagged()
                    && !target_vertices.contains(&v)
                {
                    deletions.push(v);
                }
            }
        }

        tracing::debug!(
            dataset = %store.id(),
            sources = sources.len(),
            deletions = deletions.len(),
            "planned contour merge"
        );
        ops.extend(deletions.into_iter().map(MutationOp::DeleteVertex));
        Ok(Some(MergePlan { ops }))
    }
}
