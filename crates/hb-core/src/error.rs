use crate::id::SegmentId;
use thiserror::Error;

/// Why an edit was rejected. A rejected edit leaves all state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("the boundary polygon is closed")]
    Closed,

    #[error("boundary drawing is not active")]
    NotDrawing,

    #[error("a polygon needs at least 3 vertices to close, found {count}")]
    TooFewVertices { count: usize },

    #[error("the boundary polygon is already closed")]
    AlreadyClosed,

    #[error("no segment with id `{0}`")]
    UnknownSegment(SegmentId),

    #[error("no segment is selected")]
    NothingSelected,
}

impl EditError {
    /// `true` when the edit had nothing to do because the requested state
    /// already holds, as opposed to the input being invalid.
    pub fn is_already_satisfied(&self) -> bool {
        matches!(self, Self::AlreadyClosed)
    }
}

/// A segment classification string that is not one of the three known types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown segment type `{0}` (expected constantHead, noFlow or infinite)")]
pub struct ParseSegmentTypeError(pub String);
