//! Boundary polygon data model and its mutations.
//!
//! The polygon is a small vertex/segment graph drawn on the map. Vertices are
//! kept in path order; segments reference vertices by ID and carry the
//! hydraulic boundary classification. While open, segment `i` joins vertex
//! `i` to vertex `i + 1`; closing adds one segment from the last vertex back
//! to the first.

use crate::error::{EditError, ParseSegmentTypeError};
use crate::id::{SegmentId, VertexId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

// ─── Coordinates ─────────────────────────────────────────────────────────

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// ─── Vertices & Segments ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub lat: f64,
    pub lng: f64,
}

impl Vertex {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Hydraulic boundary classification of a segment.
///
/// The serialized names are shared with the renderer and the analysis
/// payload and must stay in sync with both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentType {
    ConstantHead,
    NoFlow,
    /// Unclassified: no special boundary effect. Every new segment starts here.
    #[default]
    Infinite,
}

/// How the map layer draws a segment of a given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStyle {
    pub color: &'static str,
    pub dashed: bool,
}

impl SegmentType {
    pub const ALL: [SegmentType; 3] = [Self::ConstantHead, Self::NoFlow, Self::Infinite];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConstantHead => "constantHead",
            Self::NoFlow => "noFlow",
            Self::Infinite => "infinite",
        }
    }

    /// Constant head is blue dashed, no-flow red solid, infinite green dashed.
    pub fn style(&self) -> SegmentStyle {
        match self {
            Self::ConstantHead => SegmentStyle {
                color: "#1E64FF",
                dashed: true,
            },
            Self::NoFlow => SegmentStyle {
                color: "#DC2626",
                dashed: false,
            },
            Self::Infinite => SegmentStyle {
                color: "#16A34A",
                dashed: true,
            },
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentType {
    type Err = ParseSegmentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseSegmentTypeError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: SegmentId,
    pub start_id: VertexId,
    pub end_id: VertexId,
    #[serde(rename = "type")]
    pub kind: SegmentType,
}

impl Segment {
    fn new(start_id: VertexId, end_id: VertexId, kind: SegmentType) -> Self {
        Self {
            id: SegmentId::fresh(),
            start_id,
            end_id,
            kind,
        }
    }
}

// ─── Polygon ─────────────────────────────────────────────────────────────

/// The drawn boundary: an open path while drawing, a ring once closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryPolygon {
    pub vertices: Vec<Vertex>,
    pub segments: Vec<Segment>,
    pub is_closed: bool,
}

impl BoundaryPolygon {
    /// An empty, open polygon.
    pub fn new() -> Self {
        Self::default()
    }

    /// No vertices, no segments and not closed.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.segments.is_empty() && !self.is_closed
    }

    /// Look up a vertex by id.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.id == id)
    }

    /// Look up a segment by id.
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Both endpoints of a segment, if the segment and its vertices exist.
    pub fn endpoints(&self, id: SegmentId) -> Option<(&Vertex, &Vertex)> {
        let seg = self.segment(id)?;
        Some((self.vertex(seg.start_id)?, self.vertex(seg.end_id)?))
    }

    /// Segments whose endpoints both resolve, paired with those endpoints.
    /// Anything drawn or exported goes through this filter.
    pub fn resolved_segments(&self) -> impl Iterator<Item = (&Segment, &Vertex, &Vertex)> {
        self.segments.iter().filter_map(|seg| {
            let start = self.vertex(seg.start_id)?;
            let end = self.vertex(seg.end_id)?;
            Some((seg, start, end))
        })
    }

    /// Segments that start or end at `vertex`. A well-formed polygon has at most two.
    pub fn incident_segments(&self, vertex: VertexId) -> SmallVec<[SegmentId; 2]> {
        self.segments
            .iter()
            .filter(|s| s.start_id == vertex || s.end_id == vertex)
            .map(|s| s.id)
            .collect()
    }

    /// Whether `close()` would succeed.
    pub fn can_close(&self) -> bool {
        self.check_close().is_ok()
    }

    /// Why `close()` would be rejected right now, if it would.
    pub fn check_close(&self) -> Result<(), EditError> {
        if self.is_closed {
            return Err(EditError::AlreadyClosed);
        }
        let count = self.vertices.len();
        if count < 3 {
            return Err(EditError::TooFewVertices { count });
        }
        Ok(())
    }

    /// Clear everything and reopen. Calling it twice is the same as once.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.segments.clear();
        self.is_closed = false;
    }

    /// Append a vertex at `point`, joined to the previous vertex by a new
    /// `Infinite` segment.
    pub fn add_vertex(&mut self, point: LatLng) -> Result<VertexId, EditError> {
        if self.is_closed {
            return Err(EditError::Closed);
        }

        let id = VertexId::fresh();
        let prev = self.vertices.last().map(|v| v.id);
        self.vertices.push(Vertex {
            id,
            lat: point.lat,
            lng: point.lng,
        });
        if let Some(prev) = prev {
            self.segments
                .push(Segment::new(prev, id, SegmentType::Infinite));
        }
        log::debug!("boundary: added vertex {id} ({}, {})", point.lat, point.lng);
        Ok(id)
    }

    /// Join the last vertex back to the first. Returns the closing segment.
    pub fn close(&mut self) -> Result<SegmentId, EditError> {
        self.check_close()?;
        let count = self.vertices.len();
        let (Some(first), Some(last)) = (self.vertices.first(), self.vertices.last()) else {
            return Err(EditError::TooFewVertices { count });
        };

        let seg = Segment::new(last.id, first.id, SegmentType::Infinite);
        let id = seg.id;
        self.segments.push(seg);
        self.is_closed = true;
        log::debug!("boundary: closed with {count} vertices");
        Ok(id)
    }

    /// Replace segment `id` with two segments through a new vertex at `point`.
    ///
    /// `point` is used as given, not projected onto the segment, so a split
    /// may introduce a bend. Both halves keep the original type. The new
    /// vertex is placed right after the segment's start vertex so vertex
    /// order still follows the path.
    pub fn split_segment(
        &mut self,
        id: SegmentId,
        point: LatLng,
    ) -> Result<(VertexId, [SegmentId; 2]), EditError> {
        let seg_pos = self
            .segments
            .iter()
            .position(|s| s.id == id)
            .ok_or(EditError::UnknownSegment(id))?;
        let original = self.segments.remove(seg_pos);

        let vid = VertexId::fresh();
        let vertex = Vertex {
            id: vid,
            lat: point.lat,
            lng: point.lng,
        };
        match self.vertices.iter().position(|v| v.id == original.start_id) {
            Some(pos) => self.vertices.insert(pos + 1, vertex),
            None => self.vertices.push(vertex),
        }

        let first = Segment::new(original.start_id, vid, original.kind);
        let second = Segment::new(vid, original.end_id, original.kind);
        let ids = [first.id, second.id];
        self.segments.insert(seg_pos, second);
        self.segments.insert(seg_pos, first);

        log::debug!(
            "boundary: split {id} at ({}, {}) into {} + {}",
            point.lat,
            point.lng,
            ids[0],
            ids[1]
        );
        Ok((vid, ids))
    }

    /// Set a segment's classification. Returns the previous type.
    pub fn retype(&mut self, id: SegmentId, kind: SegmentType) -> Result<SegmentType, EditError> {
        let seg = self
            .segments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(EditError::UnknownSegment(id))?;
        let previous = std::mem::replace(&mut seg.kind, kind);
        log::debug!("boundary: retyped {id} {previous} -> {kind}");
        Ok(previous)
    }
}
