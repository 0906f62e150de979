use std::collections::HashMap;

use crate::error::{Result, TopologyError};

use super::{DatasetEvent, OutlineStore, PolylineData, PolylineId, VertexId};

/// A single dataset edit produced by the merge planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOp {
    /// Replace the whole node list of `polyline` with `replacement`.
    ReplaceVertices {
        polyline: PolylineId,
        replacement: PolylineData,
    },
    /// Delete a vertex that no polyline references after the replacements.
    DeleteVertex(VertexId),
}

impl OutlineStore {
    /// Applies a batch of mutations atomically.
    ///
    /// The whole batch is validated against the current state first; nothing
    /// is changed unless every operation is valid. Replacements are committed
    /// in batch order (a later replacement of the same polyline wins), then
    /// deletions.
    ///
    /// # Errors
    ///
    /// Returns an error if a polyline or vertex is unknown, a replacement node
    /// list is malformed, or a vertex to delete is still referenced once all
    /// replacements are taken into account.
    pub fn apply(&mut self, ops: &[MutationOp]) -> Result<Vec<DatasetEvent>> {
        let mut staged: HashMap<PolylineId, &PolylineData> = HashMap::new();
        let mut order = Vec::new();
        let mut deletions: Vec<VertexId> = Vec::new();

        for op in ops {
            match op {
                MutationOp::ReplaceVertices {
                    polyline,
                    replacement,
                } => {
                    self.polyline(*polyline)?;
                    self.check_node_list(replacement)?;
                    if staged.insert(*polyline, replacement).is_none() {
                        order.push(*polyline);
                    }
                }
                MutationOp::DeleteVertex(v) => {
                    self.vertex(*v)?;
                    if !deletions.contains(v) {
                        deletions.push(*v);
                    }
                }
            }
        }

        for &v in &deletions {
            let untouched = self
                .vertex(v)?
                .referrers()
                .iter()
                .filter(|p| !staged.contains_key(p))
                .count();
            let replaced = staged.values().filter(|data| data.contains(v)).count();
            if untouched + replaced > 0 {
                return Err(TopologyError::VertexInUse(untouched + replaced).into());
            }
        }

        let mut events = Vec::with_capacity(order.len() + 1);
        for id in order {
            if let Some(data) = staged.remove(&id) {
                self.commit_node_list(id, data.clone());
                events.push(DatasetEvent::NodeListChanged(id));
            }
        }
        for &v in &deletions {
            if let Some(vertex) = self.vertices.get_mut(v.key()) {
                vertex.mark_deleted();
            }
        }
        if !deletions.is_empty() {
            events.push(DatasetEvent::VerticesRemoved(deletions));
        }

        tracing::debug!(
            dataset = %self.id(),
            ops = ops.len(),
            events = events.len(),
            "applied mutation batch"
        );
        Ok(events)
    }
}
