//! Boundary section of the analysis request.
//!
//! The analysis service receives the polygon in the same shape the renderer
//! reads, minus any segment whose endpoints do not resolve.

use crate::model::{BoundaryPolygon, Segment, Vertex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryPayload {
    pub vertices: Vec<Vertex>,
    pub segments: Vec<Segment>,
    pub is_closed: bool,
}

impl BoundaryPayload {
    pub fn from_polygon(poly: &BoundaryPolygon) -> Self {
        let segments: Vec<Segment> = poly
            .resolved_segments()
            .map(|(seg, _, _)| seg.clone())
            .collect();
        if segments.len() != poly.segments.len() {
            log::warn!(
                "payload: dropped {} unresolved segment(s)",
                poly.segments.len() - segments.len()
            );
        }
        Self {
            vertices: poly.vertices.clone(),
            segments,
            is_closed: poly.is_closed,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn into_polygon(self) -> BoundaryPolygon {
        BoundaryPolygon {
            vertices: self.vertices,
            segments: self.segments,
            is_closed: self.is_closed,
        }
    }
}

impl From<&BoundaryPolygon> for BoundaryPayload {
    fn from(poly: &BoundaryPolygon) -> Self {
        Self::from_polygon(poly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LatLng, SegmentType};
    use pretty_assertions::assert_eq;

    fn closed_triangle() -> BoundaryPolygon {
        let mut poly = BoundaryPolygon::new();
        poly.add_vertex(LatLng::new(38.2, -85.9)).unwrap();
        poly.add_vertex(LatLng::new(38.21, -85.9)).unwrap();
        poly.add_vertex(LatLng::new(38.21, -85.89)).unwrap();
        poly.close().unwrap();
        poly
    }

    #[test]
    fn payload_matches_polygon_when_consistent() {
        let mut poly = closed_triangle();
        let id = poly.segments[0].id;
        poly.retype(id, SegmentType::ConstantHead).unwrap();

        let payload = BoundaryPayload::from_polygon(&poly);
        assert_eq!(payload.clone().into_polygon(), poly);

        let json = payload.to_json().unwrap();
        assert!(json.contains("\"isClosed\":true"));
        assert!(json.contains("\"type\":\"constantHead\""));
        assert_eq!(BoundaryPayload::from_json(&json).unwrap(), payload);
    }

    #[test]
    fn payload_drops_unresolved_segments() {
        let mut poly = closed_triangle();
        poly.vertices.pop();
        let payload = BoundaryPayload::from(&poly);
        assert_eq!(payload.segments.len(), 1);
        assert_eq!(payload.segments[0], poly.segments[0]);
    }

    #[test]
    fn rejects_unknown_segment_type() {
        let json = r#"{
            "vertices": [],
            "segments": [{"id": "s_x", "startId": "v_a", "endId": "v_b", "type": "leaky"}],
            "isClosed": false
        }"#;
        assert!(BoundaryPayload::from_json(json).is_err());
    }
}
