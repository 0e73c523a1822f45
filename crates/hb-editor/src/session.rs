//! The boundary editing session.
//!
//! `EditorSession` owns the project state, its undo history, the placement
//! modes and the segment selection. Hosts feed it `InputEvent`s and panel
//! commands and read the polygon back for drawing.
//!
//! Every mutating operation follows the same order: validate, push the
//! pre-mutation snapshot, mutate. A rejected operation pushes nothing.

use crate::history::{Clock, MonotonicClock, UndoHistory};
use crate::input::InputEvent;
use crate::mode::{Intent, PlacementController, PlacementState, WellKind};
use crate::state::{ProjectState, PumpTestKind, PumpTestSample, PumpTests};
use hb_core::{
    BoundaryPayload, BoundaryPolygon, EditError, EditorConfig, LatLng, SegmentId, SegmentType,
    Snap, VertexId, geo, snap_to_vertex,
};

/// What handling one input event did.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    VertexAdded {
        id: VertexId,
        /// Set when the click snapped onto this existing vertex.
        snapped_to: Option<VertexId>,
    },
    Closed(SegmentId),
    /// A well should be placed here by the host's well layer.
    WellRequested { kind: WellKind, point: LatLng },
    SelectionChanged(Option<SegmentId>),
    Cancelled,
    Undone,
    Rejected(EditError),
    Ignored,
}

pub struct EditorSession {
    state: ProjectState,
    history: UndoHistory<ProjectState>,
    modes: PlacementController,
    selected: Option<SegmentId>,
    config: EditorConfig,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// A session on the wall clock.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clock(config, Box::new(MonotonicClock::new()))
    }

    /// A session whose coalescing reads `clock`.
    pub fn with_clock(config: EditorConfig, clock: Box<dyn Clock>) -> Self {
        let history =
            UndoHistory::with_clock(config.history_capacity, config.coalesce_window(), clock);
        Self {
            state: ProjectState::default(),
            history,
            modes: PlacementController::new(),
            selected: None,
            config,
        }
    }

    // ─── Read access ─────────────────────────────────────────────────────

    /// The live boundary.
    pub fn polygon(&self) -> &BoundaryPolygon {
        &self.state.boundary
    }

    /// Imported pump-test datasets.
    pub fn pump_tests(&self) -> &PumpTests {
        &self.state.pump_tests
    }

    /// Everything undo restores.
    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    /// The effective mode: wells, drawing or idle.
    pub fn placement_state(&self) -> PlacementState {
        self.modes.state()
    }

    pub fn is_drawing(&self) -> bool {
        self.modes.is_drawing()
    }

    /// The segment open in the segment panel.
    pub fn selected_segment(&self) -> Option<SegmentId> {
        self.selected
    }

    /// Read-only view of the undo history.
    pub fn history(&self) -> &UndoHistory<ProjectState> {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The boundary as submitted to the analysis service.
    pub fn payload(&self) -> BoundaryPayload {
        BoundaryPayload::from_polygon(&self.state.boundary)
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn handle(&mut self, event: &InputEvent) -> EventOutcome {
        let intent = self
            .modes
            .interpret(event, &self.state.boundary, self.config.hit_threshold_ft);

        match intent {
            Intent::PlaceWell { kind, point } => EventOutcome::WellRequested { kind, point },
            Intent::AddVertex(point) => match self.add_vertex(point) {
                Ok((id, snap)) => EventOutcome::VertexAdded {
                    id,
                    snapped_to: snap.vertex(),
                },
                Err(e) => EventOutcome::Rejected(e),
            },
            Intent::ClosePolygon => match self.close_polygon() {
                Ok(id) => EventOutcome::Closed(id),
                Err(e) => EventOutcome::Rejected(e),
            },
            Intent::Select(hit) => {
                self.selected = hit;
                EventOutcome::SelectionChanged(hit)
            }
            Intent::Cancel => {
                self.cancel();
                EventOutcome::Cancelled
            }
            Intent::Undo => {
                if self.undo() {
                    EventOutcome::Undone
                } else {
                    EventOutcome::Ignored
                }
            }
            Intent::Ignore => EventOutcome::Ignored,
        }
    }

    // ─── Mode commands ───────────────────────────────────────────────────

    /// Start a fresh drawing: clears the polygon and well placement.
    pub fn begin_drawing(&mut self) {
        self.reset_boundary();
        self.modes.begin_drawing();
        log::debug!("session: drawing started");
    }

    /// Route clicks to the well layer until Escape.
    pub fn enter_well_placement(&mut self, kind: WellKind) {
        self.modes.enter_well_placement(kind);
    }

    /// Escape: leave well placement and dismiss the segment panel. An
    /// active drawing is kept.
    pub fn cancel(&mut self) {
        self.modes.cancel();
        self.selected = None;
    }

    /// Discard the boundary and stop drawing.
    pub fn clear_boundary(&mut self) {
        self.reset_boundary();
        self.modes.finish_drawing();
        log::debug!("session: boundary cleared");
    }

    fn reset_boundary(&mut self) {
        if !self.state.boundary.is_empty() {
            self.history.push(&self.state);
            self.state.boundary.reset();
        }
        self.selected = None;
    }

    // ─── Boundary edits ──────────────────────────────────────────────────

    /// Snap `point` onto a nearby vertex, then append it to the drawing.
    pub fn add_vertex(&mut self, point: LatLng) -> Result<(VertexId, Snap), EditError> {
        if !self.modes.is_drawing() {
            return Err(EditError::NotDrawing);
        }
        if self.state.boundary.is_closed {
            return Err(EditError::Closed);
        }

        let snap = snap_to_vertex(
            point,
            &self.state.boundary.vertices,
            self.config.snap_threshold_ft,
        );
        self.history.push(&self.state);
        let id = self.state.boundary.add_vertex(snap.point())?;
        Ok((id, snap))
    }

    /// Close the polygon and end the drawing.
    pub fn close_polygon(&mut self) -> Result<SegmentId, EditError> {
        self.state.boundary.check_close()?;
        self.history.push(&self.state);
        let id = self.state.boundary.close()?;
        self.modes.finish_drawing();
        Ok(id)
    }

    /// Split `id` at `point` (used as given; not projected onto the segment).
    pub fn split_segment(
        &mut self,
        id: SegmentId,
        point: LatLng,
    ) -> Result<(VertexId, [SegmentId; 2]), EditError> {
        if self.state.boundary.segment(id).is_none() {
            return Err(EditError::UnknownSegment(id));
        }
        self.history.push(&self.state);
        let result = self.state.boundary.split_segment(id, point)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(result)
    }

    /// Split the selected segment at its midpoint.
    pub fn insert_midpoint(&mut self) -> Result<(VertexId, [SegmentId; 2]), EditError> {
        let id = self.selected.ok_or(EditError::NothingSelected)?;
        let (start, end) = self
            .state
            .boundary
            .endpoints(id)
            .ok_or(EditError::UnknownSegment(id))?;
        let mid = geo::midpoint(start.position(), end.position());
        self.split_segment(id, mid)
    }

    /// Reclassify a segment. Returns its previous type; retyping to the
    /// current type succeeds without recording an undo step.
    pub fn retype_segment(
        &mut self,
        id: SegmentId,
        kind: SegmentType,
    ) -> Result<SegmentType, EditError> {
        let current = self
            .state
            .boundary
            .segment(id)
            .map(|s| s.kind)
            .ok_or(EditError::UnknownSegment(id))?;
        if current == kind {
            return Ok(current);
        }
        self.history.push(&self.state);
        self.state.boundary.retype(id, kind)
    }

    pub fn retype_selected(&mut self, kind: SegmentType) -> Result<SegmentType, EditError> {
        let id = self.selected.ok_or(EditError::NothingSelected)?;
        self.retype_segment(id, kind)
    }

    /// Open `id` in the segment panel.
    pub fn select_segment(&mut self, id: SegmentId) -> Result<(), EditError> {
        if self.state.boundary.segment(id).is_none() {
            return Err(EditError::UnknownSegment(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ─── Shared state ────────────────────────────────────────────────────

    /// Store an imported pump-test dataset. Shares undo history with the boundary.
    pub fn set_pump_test_data(&mut self, kind: PumpTestKind, samples: Vec<PumpTestSample>) {
        self.history.push(&self.state);
        self.state.pump_tests.set(kind, samples);
    }

    /// Step back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.state) {
            return false;
        }
        if let Some(id) = self.selected
            && self.state.boundary.segment(id).is_none()
        {
            self.selected = None;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ManualClock;
    use hb_core::geo::feet_to_degrees;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const A: LatLng = LatLng::new(38.2, -85.9);

    fn session() -> (EditorSession, ManualClock) {
        let clock = ManualClock::new();
        let session = EditorSession::with_clock(EditorConfig::default(), Box::new(clock.clone()));
        (session, clock)
    }

    fn north(ft: f64) -> LatLng {
        LatLng::new(A.lat + feet_to_degrees(ft), A.lng)
    }

    fn east(ft: f64) -> LatLng {
        LatLng::new(A.lat, A.lng + feet_to_degrees(ft))
    }

    #[test]
    fn add_vertex_requires_drawing() {
        let (mut s, _) = session();
        assert_eq!(s.add_vertex(A).unwrap_err(), EditError::NotDrawing);
        assert!(s.polygon().is_empty());
        assert!(s.history().is_empty());
    }

    #[test]
    fn click_snaps_onto_existing_vertex() {
        let (mut s, clock) = session();
        s.begin_drawing();
        s.handle(&InputEvent::click(A));
        clock.advance(Duration::from_secs(1));
        s.handle(&InputEvent::click(east(400.0)));
        clock.advance(Duration::from_secs(1));

        let first = s.polygon().vertices[0].id;
        let outcome = s.handle(&InputEvent::click(north(20.0)));
        match outcome {
            EventOutcome::VertexAdded { snapped_to, id } => {
                assert_eq!(snapped_to, Some(first));
                assert_eq!(s.polygon().vertex(id).unwrap().position(), A);
            }
            other => panic!("expected VertexAdded, got {other:?}"),
        }
    }

    #[test]
    fn rejected_close_pushes_nothing() {
        let (mut s, clock) = session();
        s.begin_drawing();
        s.add_vertex(A).unwrap();
        clock.advance(Duration::from_secs(1));
        let before = s.history().len();
        assert_eq!(
            s.close_polygon(),
            Err(EditError::TooFewVertices { count: 1 })
        );
        assert_eq!(s.history().len(), before);
    }

    #[test]
    fn retype_to_same_type_records_nothing() {
        let (mut s, clock) = session();
        s.begin_drawing();
        s.add_vertex(A).unwrap();
        clock.advance(Duration::from_secs(1));
        s.add_vertex(east(200.0)).unwrap();
        clock.advance(Duration::from_secs(1));
        let id = s.polygon().segments[0].id;
        let before = s.history().len();

        assert_eq!(s.retype_segment(id, SegmentType::Infinite), Ok(SegmentType::Infinite));
        assert_eq!(s.history().len(), before);
        assert_eq!(s.retype_segment(id, SegmentType::NoFlow), Ok(SegmentType::Infinite));
        assert_eq!(s.history().len(), before + 1);
    }

    #[test]
    fn insert_midpoint_needs_selection() {
        let (mut s, _) = session();
        assert_eq!(s.insert_midpoint(), Err(EditError::NothingSelected));
        assert_eq!(s.retype_selected(SegmentType::NoFlow), Err(EditError::NothingSelected));
    }

    #[test]
    fn escape_clears_selection_and_wells_but_not_drawing() {
        let (mut s, clock) = session();
        s.begin_drawing();
        s.add_vertex(A).unwrap();
        clock.advance(Duration::from_secs(1));
        s.add_vertex(east(200.0)).unwrap();
        let seg = s.polygon().segments[0].id;
        s.select_segment(seg).unwrap();
        s.enter_well_placement(WellKind::Pumping);

        assert_eq!(s.handle(&InputEvent::key("Escape")), EventOutcome::Cancelled);
        assert_eq!(s.selected_segment(), None);
        assert_eq!(s.placement_state(), PlacementState::DrawingBoundary);
    }

    #[test]
    fn begin_drawing_on_empty_polygon_records_nothing() {
        let (mut s, _) = session();
        s.begin_drawing();
        s.begin_drawing();
        assert!(s.history().is_empty());
    }
}
