//! Contour merging for adjacent area outlines.
//!
//! A [`Slice`] is a contiguous, possibly wrap-around run of vertices on a
//! polyline stored in an [`OutlineStore`]. Dragging a slice of one outline
//! onto a slice of another and running [`PlanMerge`] yields the batch of
//! [`MutationOp`]s that makes both outlines share the same vertex run.

pub mod error;
pub mod math;
pub mod operations;
pub mod selection;
pub mod slice;
pub mod topology;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::{ContourMergeError, Result};
pub use operations::{are_direction_aligned, MergeParams, MergePlan, MutationOp, PlanMerge};
pub use selection::{MergeSession, SegmentRef, SelectionState, SessionRegistry};
pub use slice::Slice;
pub use topology::{
    DatasetEvent, DatasetId, OutlineStore, PolylineData, PolylineId, VertexData, VertexId,
};
