//! Snapping and hit testing: raw pointer coordinate → existing geometry.
//!
//! Both use the flat distance model from [`crate::geo`].

use crate::geo::{flat_distance_ft, point_to_segment_distance_ft};
use crate::id::{SegmentId, VertexId};
use crate::model::{BoundaryPolygon, LatLng, Vertex};

/// Default vertex-merge tolerance: close enough that snapping needs a deliberate click.
pub const DEFAULT_SNAP_THRESHOLD_FT: f64 = 30.0;

/// Default segment selection tolerance, tighter than vertex snapping.
pub const DEFAULT_HIT_THRESHOLD_FT: f64 = 15.0;

/// Result of resolving a candidate point against existing vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snap {
    /// Snapped onto an existing vertex; `point` is that vertex's stored coordinate.
    Vertex { id: VertexId, point: LatLng },
    /// Nothing close enough; the candidate point unchanged.
    Free(LatLng),
}

impl Snap {
    /// The coordinate to use: the vertex's when snapped, else the candidate.
    pub fn point(&self) -> LatLng {
        match self {
            Self::Vertex { point, .. } | Self::Free(point) => *point,
        }
    }

    /// The vertex snapped onto, if any.
    pub fn vertex(&self) -> Option<VertexId> {
        match self {
            Self::Vertex { id, .. } => Some(*id),
            Self::Free(_) => None,
        }
    }
}

/// Snap `point` onto the nearest vertex if it lies strictly within `threshold_ft`.
pub fn snap_to_vertex(point: LatLng, vertices: &[Vertex], threshold_ft: f64) -> Snap {
    let nearest = vertices
        .iter()
        .map(|v| (v, flat_distance_ft(point, v.position())))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match nearest {
        Some((v, dist)) if dist < threshold_ft => {
            log::trace!("snap: {dist:.2} ft to {}", v.id);
            Snap::Vertex {
                id: v.id,
                point: v.position(),
            }
        }
        _ => Snap::Free(point),
    }
}

/// First segment, in list order, within `threshold_ft` of `point`.
/// Segments with unresolved endpoints are skipped.
pub fn hit_test_segments(
    point: LatLng,
    polygon: &BoundaryPolygon,
    threshold_ft: f64,
) -> Option<SegmentId> {
    let hit = polygon
        .resolved_segments()
        .find(|(_, start, end)| {
            point_to_segment_distance_ft(point, start.position(), end.position()) < threshold_ft
        })
        .map(|(seg, _, _)| seg.id);
    log::trace!("hit test at ({}, {}): {hit:?}", point.lat, point.lng);
    hit
}
