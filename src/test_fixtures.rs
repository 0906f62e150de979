//! Small datasets shared by the unit tests.
#![allow(clippy::unwrap_used)]

use crate::math::Point2;
use crate::topology::{OutlineStore, PolylineId, VertexData, VertexId};

/// Installs a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Adds `n` untagged vertices laid out on a unit circle.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ring_vertices(store: &mut OutlineStore, n: usize) -> Vec<VertexId> {
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            store.add_vertex(VertexData::new(Point2::new(angle.cos(), angle.sin())))
        })
        .collect()
}

/// Adds one untagged vertex.
pub(crate) fn vertex_at(store: &mut OutlineStore, x: f64, y: f64) -> VertexId {
    store.add_vertex(VertexData::new(Point2::new(x, y)))
}

/// Adds an open polyline through `vertices`.
pub(crate) fn open(store: &mut OutlineStore, vertices: &[VertexId]) -> PolylineId {
    store.add_polyline(vertices.to_vec()).unwrap()
}

/// Adds a closed polyline through `vertices`, repeating the first as join vertex.
pub(crate) fn closed(store: &mut OutlineStore, vertices: &[VertexId]) -> PolylineId {
    let mut nodes = vertices.to_vec();
    nodes.extend(vertices.first().copied());
    store.add_polyline(nodes).unwrap()
}
