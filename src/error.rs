use thiserror::Error;

/// Top-level error type for contour merging.
#[derive(Debug, Error)]
pub enum ContourMergeError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

/// Invalid arguments passed to a slice, selection or planner operation.
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("{name} = {index} is out of range [0, {len})")]
    IndexOutOfRange {
        name: &'static str,
        index: usize,
        len: usize,
    },

    #[error("expected start < end, got start={start}, end={end}")]
    StartNotBeforeEnd { start: usize, end: usize },

    #[error("a closed polyline slice must not span only the join vertex")]
    JoinVertexSlice,

    #[error("a wrap-around slice requires a closed polyline")]
    WrapOnOpenPolyline,

    #[error("a vertex sequence needs at least 2 vertices, got {0}")]
    SequenceTooShort(usize),

    #[error("vertex is not part of the active dataset")]
    VertexNotInDataset,

    #[error("entity belongs to dataset {actual}, expected dataset {expected}")]
    ForeignDataset { expected: u64, actual: u64 },
}

/// Errors related to the outline dataset itself.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid polyline: {0}")]
    InvalidPolyline(String),

    #[error("vertex is still referenced by {0} polyline(s)")]
    VertexInUse(usize),
}

/// A closed polyline produced by a replacement breaks the ring invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("closed polyline needs at least 3 vertices, got {0}")]
    TooShort(usize),

    #[error("first and last vertex of a closed polyline differ")]
    NotClosed,

    #[error("identical adjacent vertices at index {0}")]
    AdjacentDuplicate(usize),
}

/// Convenience type alias for results using [`ContourMergeError`].
pub type Result<T> = std::result::Result<T, ContourMergeError>;
