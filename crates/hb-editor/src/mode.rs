//! Placement modes: how a raw map event should be interpreted.
//!
//! Well placement and boundary drawing are independent flags. Entering well
//! placement leaves drawing on; beginning a drawing clears well placement.
//! When both are set, clicks go to well placement.
//!
//! | Event        | Placing wells | Drawing, open polygon | Otherwise          |
//! |--------------|---------------|-----------------------|--------------------|
//! | Click        | place well    | snap + add vertex     | hit-test / select  |
//! | Double-click | —             | close (≥ 3 vertices)  | —                  |
//! | Escape       | leave wells   | keeps drawing         | dismiss selection  |

use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use hb_core::{BoundaryPolygon, LatLng, SegmentId, hit_test_segments};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WellKind {
    Pumping,
    Observation,
}

/// The effective mode, derived from the two flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    Idle,
    PlacingWells(WellKind),
    DrawingBoundary,
}

/// What an event asks the session to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Hand the point to the host's well layer; the boundary is untouched.
    PlaceWell { kind: WellKind, point: LatLng },
    /// Add a vertex at this raw (not yet snapped) point.
    AddVertex(LatLng),
    ClosePolygon,
    /// Result of hit-testing a click: select this segment, or clear selection.
    Select(Option<SegmentId>),
    Cancel,
    Undo,
    /// Accepted but nothing to do (drag hooks, unbound keys, …).
    Ignore,
}

#[derive(Debug, Clone, Default)]
pub struct PlacementController {
    well_placement: Option<WellKind>,
    drawing_boundary: bool,
}

impl PlacementController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlacementState {
        match (self.well_placement, self.drawing_boundary) {
            (Some(kind), _) => PlacementState::PlacingWells(kind),
            (None, true) => PlacementState::DrawingBoundary,
            (None, false) => PlacementState::Idle,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing_boundary
    }

    pub fn well_placement(&self) -> Option<WellKind> {
        self.well_placement
    }

    /// Start a fresh drawing. The caller resets the polygon.
    pub fn begin_drawing(&mut self) {
        self.drawing_boundary = true;
        self.well_placement = None;
    }

    pub fn finish_drawing(&mut self) {
        self.drawing_boundary = false;
    }

    pub fn enter_well_placement(&mut self, kind: WellKind) {
        self.well_placement = Some(kind);
    }

    /// Escape. Only well placement is cancelled; an active drawing survives.
    pub fn cancel(&mut self) {
        self.well_placement = None;
    }

    /// Translate an event into an intent without changing any mode.
    pub fn interpret(
        &self,
        event: &InputEvent,
        polygon: &BoundaryPolygon,
        hit_threshold_ft: f64,
    ) -> Intent {
        match event {
            InputEvent::Click { lat, lng } => {
                let point = LatLng::new(*lat, *lng);
                if let Some(kind) = self.well_placement {
                    return Intent::PlaceWell { kind, point };
                }
                if self.drawing_boundary && !polygon.is_closed {
                    return Intent::AddVertex(point);
                }
                Intent::Select(hit_test_segments(point, polygon, hit_threshold_ft))
            }
            InputEvent::DoubleClick => {
                if self.drawing_boundary && polygon.can_close() {
                    Intent::ClosePolygon
                } else {
                    Intent::Ignore
                }
            }
            InputEvent::Key {
                key,
                ctrl,
                shift,
                alt,
                meta,
            } => match ShortcutMap::resolve(key, *ctrl, *shift, *alt, *meta) {
                Some(ShortcutAction::Cancel) => Intent::Cancel,
                Some(ShortcutAction::Undo) => Intent::Undo,
                None => Intent::Ignore,
            },
            // Vertex drag is an extension point; nothing consumes it yet.
            InputEvent::DragStart { .. } | InputEvent::DragMove { .. } | InputEvent::DragEnd { .. } => {
                Intent::Ignore
            }
        }
    }
}
