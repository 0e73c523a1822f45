//! WASM bridge for HydroBound. Exposes the boundary editor to the browser map.
//!
//! Compiled via `wasm-pack build --target web`. The host (the Leaflet map
//! view) forwards pointer and keyboard events with its own timestamps and
//! redraws from `polygon_json()` / `render_json()` after each call.

use hb_core::{
    BoundaryPayload, BoundaryPolygon, EditError, EditorConfig, LintSeverity, SegmentId,
    SegmentType, lint_polygon,
};
use hb_editor::{
    EditorSession, EventOutcome, InputEvent, ManualClock, PlacementState, PumpTestKind,
    PumpTestSample, WellKind,
};
use serde_json::{Value, json};
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// The main WASM-facing boundary controller.
///
/// Owns one editing session. Browsers have no `Instant`, so coalescing runs
/// on a manual clock set from the `time_ms` each mutating call carries
/// (`performance.now()` on the JS side).
#[wasm_bindgen]
pub struct BoundaryCanvas {
    session: EditorSession,
    clock: ManualClock,
}

impl Default for BoundaryCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl BoundaryCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self::with_config(EditorConfig::default())
    }

    /// Replace the session with one using `json` as its `EditorConfig`.
    /// Discards the current boundary and history. Returns `false` and keeps
    /// the session when the config is invalid.
    pub fn configure(&mut self, json: &str) -> bool {
        match EditorConfig::from_json(json) {
            Ok(config) => {
                *self = Self::with_config(config);
                true
            }
            Err(e) => {
                log::warn!("wasm: rejected config: {e}");
                false
            }
        }
    }

    // ─── Pointer & keyboard ──────────────────────────────────────────────

    /// Map click. Returns the outcome as JSON.
    pub fn handle_click(&mut self, lat: f64, lng: f64, time_ms: f64) -> String {
        self.tick(time_ms);
        let outcome = self.session.handle(&InputEvent::Click { lat, lng });
        outcome_json(&outcome)
    }

    pub fn handle_double_click(&mut self, time_ms: f64) -> String {
        self.tick(time_ms);
        let outcome = self.session.handle(&InputEvent::DoubleClick);
        outcome_json(&outcome)
    }

    /// Keyboard event. Escape cancels, Ctrl/Cmd+Z undoes.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        time_ms: f64,
    ) -> String {
        self.tick(time_ms);
        let outcome = self.session.handle(&InputEvent::Key {
            key: key.to_string(),
            ctrl,
            shift,
            alt,
            meta,
        });
        outcome_json(&outcome)
    }

    // ─── Panel commands ──────────────────────────────────────────────────

    /// "Draw boundary" button: starts over with an empty polygon.
    pub fn begin_drawing(&mut self, time_ms: f64) {
        self.tick(time_ms);
        self.session.begin_drawing();
    }

    pub fn clear_boundary(&mut self, time_ms: f64) {
        self.tick(time_ms);
        self.session.clear_boundary();
    }

    pub fn close_polygon(&mut self, time_ms: f64) -> String {
        self.tick(time_ms);
        result_json(self.session.close_polygon(), |id| {
            json!({ "segment": id.to_string() })
        })
    }

    /// `kind` is `"pumping"` or `"observation"`. Returns `false` for anything else.
    pub fn enter_well_placement(&mut self, kind: &str) -> bool {
        let Some(kind) = parse_well_kind(kind) else {
            return false;
        };
        self.session.enter_well_placement(kind);
        true
    }

    /// Same as pressing Escape.
    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    /// Select a segment by id, as when the host hit-tests its own layer.
    pub fn select_segment(&mut self, id: &str) -> bool {
        self.session.select_segment(SegmentId::intern(id)).is_ok()
    }

    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    /// Segment panel type buttons. `kind` is `constantHead`, `noFlow` or `infinite`.
    pub fn retype_selected(&mut self, kind: &str, time_ms: f64) -> String {
        let kind = match kind.parse::<SegmentType>() {
            Ok(k) => k,
            Err(e) => return error_json(&e.to_string()),
        };
        self.tick(time_ms);
        result_json(self.session.retype_selected(kind), |previous| {
            json!({ "previous": previous.as_str() })
        })
    }

    /// Segment panel "Insert Midpoint" button.
    pub fn insert_midpoint(&mut self, time_ms: f64) -> String {
        self.tick(time_ms);
        result_json(self.session.insert_midpoint(), |(vertex, [a, b])| {
            json!({
                "vertex": vertex.to_string(),
                "segments": [a.to_string(), b.to_string()],
            })
        })
    }

    /// Store an imported pump-test dataset: `kind` is `step`, `constant` or
    /// `recovery`, `json` an array of `{ time_min, drawdown_ft }`.
    pub fn set_pump_test_json(&mut self, kind: &str, json: &str, time_ms: f64) -> bool {
        let Some(kind) = parse_pump_test_kind(kind) else {
            return false;
        };
        let samples: Vec<PumpTestSample> = match serde_json::from_str(json) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("wasm: bad pump-test data: {e}");
                return false;
            }
        };
        self.tick(time_ms);
        self.session.set_pump_test_data(kind, samples);
        true
    }

    /// Undo the last edit. Returns `true` if anything changed.
    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    // ─── Read access ─────────────────────────────────────────────────────

    /// The live polygon, serialized as `{ vertices, segments, isClosed }`.
    pub fn polygon_json(&self) -> String {
        serde_json::to_string(self.session.polygon()).unwrap_or_else(|_| "{}".to_string())
    }

    /// The boundary as sent to the analysis service.
    pub fn payload_json(&self) -> String {
        self.session
            .payload()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// All three pump-test datasets.
    pub fn pump_tests_json(&self) -> String {
        serde_json::to_string(self.session.pump_tests()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Drawable segments with coordinates and style hints for the map layer.
    pub fn render_json(&self) -> String {
        render_value(self.session.polygon(), self.session.selected_segment()).to_string()
    }

    /// Id of the segment shown in the segment panel, if any.
    pub fn selected_segment(&self) -> Option<String> {
        self.session.selected_segment().map(|id| id.to_string())
    }

    /// `idle`, `drawing`, `placingPumping` or `placingObservation`.
    pub fn placement_state(&self) -> String {
        match self.session.placement_state() {
            PlacementState::Idle => "idle",
            PlacementState::DrawingBoundary => "drawing",
            PlacementState::PlacingWells(WellKind::Pumping) => "placingPumping",
            PlacementState::PlacingWells(WellKind::Observation) => "placingObservation",
        }
        .to_string()
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    pub fn is_closed(&self) -> bool {
        self.session.polygon().is_closed
    }

    pub fn can_undo(&self) -> bool {
        self.session.history().can_undo()
    }
}

impl BoundaryCanvas {
    fn with_config(config: EditorConfig) -> Self {
        let clock = ManualClock::new();
        let session = EditorSession::with_clock(config, Box::new(clock.clone()));
        Self { session, clock }
    }

    /// Non-finite or negative timestamps leave the clock where it was.
    fn tick(&self, time_ms: f64) {
        if time_ms.is_finite() && time_ms >= 0.0 {
            self.clock.set(Duration::from_secs_f64(time_ms / 1000.0));
        }
    }

    /// The wrapped session, for native callers.
    pub fn session(&self) -> &EditorSession {
        &self.session
    }
}

// ─── JSON helpers ────────────────────────────────────────────────────────

fn outcome_json(outcome: &EventOutcome) -> String {
    let value = match outcome {
        EventOutcome::VertexAdded { id, snapped_to } => json!({
            "changed": true,
            "action": "vertexAdded",
            "vertex": id.to_string(),
            "snappedTo": snapped_to.map(|v| v.to_string()),
        }),
        EventOutcome::Closed(id) => json!({
            "changed": true,
            "action": "closed",
            "segment": id.to_string(),
        }),
        EventOutcome::WellRequested { kind, point } => json!({
            "changed": false,
            "action": "placeWell",
            "kind": well_kind_name(*kind),
            "lat": point.lat,
            "lng": point.lng,
        }),
        EventOutcome::SelectionChanged(sel) => json!({
            "changed": false,
            "action": "select",
            "segment": sel.map(|s| s.to_string()),
        }),
        EventOutcome::Cancelled => json!({ "changed": false, "action": "cancel" }),
        EventOutcome::Undone => json!({ "changed": true, "action": "undo" }),
        EventOutcome::Rejected(e) => json!({
            "changed": false,
            "action": "rejected",
            "error": e.to_string(),
        }),
        EventOutcome::Ignored => json!({ "changed": false, "action": "none" }),
    };
    value.to_string()
}

fn result_json<T>(result: Result<T, EditError>, ok: impl FnOnce(T) -> Value) -> String {
    match result {
        Ok(v) => {
            let mut value = ok(v);
            value["ok"] = Value::Bool(true);
            value.to_string()
        }
        // e.g. closing an already closed polygon: nothing to do, not a failure.
        Err(e) if e.is_already_satisfied() => json!({ "ok": true, "unchanged": true }).to_string(),
        Err(e) => error_json(&e.to_string()),
    }
}

fn error_json(message: &str) -> String {
    json!({ "ok": false, "error": message }).to_string()
}

fn render_value(poly: &BoundaryPolygon, selected: Option<SegmentId>) -> Value {
    let segments: Vec<Value> = poly
        .resolved_segments()
        .map(|(seg, start, end)| {
            let style = seg.kind.style();
            json!({
                "id": seg.id.to_string(),
                "type": seg.kind.as_str(),
                "from": [start.lat, start.lng],
                "to": [end.lat, end.lng],
                "color": style.color,
                "dashed": style.dashed,
                "selected": selected == Some(seg.id),
            })
        })
        .collect();
    let vertices: Vec<Value> = poly
        .vertices
        .iter()
        .map(|v| {
            json!({
                "id": v.id.to_string(),
                "lat": v.lat,
                "lng": v.lng,
                // 1 marks the ends of an open path.
                "degree": poly.incident_segments(v.id).len(),
            })
        })
        .collect();
    json!({
        "vertices": vertices,
        "segments": segments,
        "isClosed": poly.is_closed,
    })
}

fn well_kind_name(kind: WellKind) -> &'static str {
    match kind {
        WellKind::Pumping => "pumping",
        WellKind::Observation => "observation",
    }
}

fn parse_well_kind(name: &str) -> Option<WellKind> {
    match name {
        "pumping" => Some(WellKind::Pumping),
        "observation" => Some(WellKind::Observation),
        _ => None,
    }
}

fn parse_pump_test_kind(name: &str) -> Option<PumpTestKind> {
    match name {
        "step" => Some(PumpTestKind::Step),
        "constant" => Some(PumpTestKind::Constant),
        "recovery" => Some(PumpTestKind::Recovery),
        _ => None,
    }
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("HydroBound WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Lint a boundary payload. Returns a JSON array of
/// `{ rule, severity, message }`, or a single `parse` error.
#[wasm_bindgen]
pub fn lint_json(payload: &str) -> String {
    let poly = match BoundaryPayload::from_json(payload) {
        Ok(p) => p.into_polygon(),
        Err(e) => {
            return json!([{ "rule": "parse", "severity": "error", "message": e.to_string() }])
                .to_string();
        }
    };
    let diags: Vec<Value> = lint_polygon(&poly)
        .into_iter()
        .map(|d| {
            json!({
                "rule": d.rule,
                "severity": match d.severity {
                    LintSeverity::Error => "error",
                    LintSeverity::Warning => "warning",
                },
                "message": d.message,
            })
        })
        .collect();
    Value::Array(diags).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::geo::feet_to_degrees;
    use pretty_assertions::assert_eq;

    const LAT: f64 = 38.2;
    const LNG: f64 = -85.9;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    /// Draws and closes a 1000 ft square, one second between clicks.
    fn square(canvas: &mut BoundaryCanvas) {
        canvas.begin_drawing(0.0);
        let d = feet_to_degrees(1000.0);
        let corners = [(0.0, 0.0), (0.0, d), (d, d), (d, 0.0)];
        for (i, (dlat, dlng)) in corners.into_iter().enumerate() {
            let out = parse(&canvas.handle_click(LAT + dlat, LNG + dlng, 1000.0 * (i + 1) as f64));
            assert_eq!(out["action"], "vertexAdded");
        }
        let out = parse(&canvas.handle_double_click(5000.0));
        assert_eq!(out["action"], "closed");
    }

    #[test]
    fn draw_close_and_read_back() {
        let mut canvas = BoundaryCanvas::new();
        square(&mut canvas);
        let poly = parse(&canvas.polygon_json());
        assert_eq!(poly["isClosed"], true);
        assert_eq!(poly["vertices"].as_array().map(Vec::len), Some(4));
        assert_eq!(poly["segments"][0]["type"], "infinite");
        assert_eq!(canvas.placement_state(), "idle");
    }

    #[test]
    fn clicks_inside_window_undo_together() {
        let mut canvas = BoundaryCanvas::new();
        canvas.begin_drawing(0.0);
        canvas.handle_click(LAT, LNG, 1000.0);
        canvas.handle_click(LAT, LNG + 0.01, 1100.0);
        assert!(canvas.undo());
        assert_eq!(parse(&canvas.polygon_json())["vertices"], json!([]));
        assert!(!canvas.can_undo());
    }

    #[test]
    fn retype_and_midpoint_through_panel() {
        let mut canvas = BoundaryCanvas::new();
        square(&mut canvas);
        let bottom = canvas.session().polygon().segments[0].id.to_string();
        assert!(canvas.select_segment(&bottom));

        let out = parse(&canvas.retype_selected("noFlow", 6000.0));
        assert_eq!(out, json!({ "ok": true, "previous": "infinite" }));

        let out = parse(&canvas.insert_midpoint(7000.0));
        assert_eq!(out["ok"], true);
        let render = parse(&canvas.render_json());
        let segments = render["segments"].as_array().unwrap();
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0]["color"], SegmentType::NoFlow.style().color);
        assert_eq!(segments[1]["type"], "noFlow");
        assert_eq!(canvas.selected_segment(), None);
    }

    #[test]
    fn bad_inputs_are_reported_not_applied() {
        let mut canvas = BoundaryCanvas::new();
        let out = parse(&canvas.retype_selected("sandy", 0.0));
        assert_eq!(out["ok"], false);
        let out = parse(&canvas.insert_midpoint(0.0));
        assert_eq!(out["ok"], false);
        assert!(!canvas.enter_well_placement("injection"));
        assert!(!canvas.set_pump_test_json("step", "not json", 0.0));
        assert!(!canvas.select_segment("s-missing"));
        assert!(!canvas.configure(r#"{"history_capacity": 0}"#));
        assert!(!canvas.can_undo());
    }

    #[test]
    fn well_mode_reports_point_and_escape_leaves_it() {
        let mut canvas = BoundaryCanvas::new();
        assert!(canvas.enter_well_placement("observation"));
        assert_eq!(canvas.placement_state(), "placingObservation");
        let out = parse(&canvas.handle_click(LAT, LNG, 0.0));
        assert_eq!(out["action"], "placeWell");
        assert_eq!(out["kind"], "observation");

        let out = parse(&canvas.handle_key("Escape", false, false, false, false, 10.0));
        assert_eq!(out["action"], "cancel");
        assert_eq!(canvas.placement_state(), "idle");
    }

    #[test]
    fn pump_test_import_is_undoable() {
        let mut canvas = BoundaryCanvas::new();
        let data = r#"[{"time_min": 1.0, "drawdown_ft": 0.5}]"#;
        assert!(canvas.set_pump_test_json("recovery", data, 0.0));
        assert_eq!(parse(&canvas.pump_tests_json())["recovery"][0]["drawdown_ft"], 0.5);
        assert!(canvas.undo());
        assert_eq!(parse(&canvas.pump_tests_json())["recovery"], json!([]));
    }

    #[test]
    fn closing_twice_reports_unchanged() {
        let mut canvas = BoundaryCanvas::new();
        square(&mut canvas);
        let entries = canvas.session().history().len();
        let out = parse(&canvas.close_polygon(6000.0));
        assert_eq!(out, json!({ "ok": true, "unchanged": true }));
        assert_eq!(canvas.session().history().len(), entries);

        let mut open = BoundaryCanvas::new();
        let out = parse(&open.close_polygon(0.0));
        assert_eq!(out["ok"], false);
    }

    #[test]
    fn render_marks_open_path_ends() {
        let mut canvas = BoundaryCanvas::new();
        canvas.begin_drawing(0.0);
        for (i, dlng) in [0.0, 0.01, 0.02].into_iter().enumerate() {
            canvas.handle_click(LAT, LNG + dlng, 1000.0 * (i + 1) as f64);
        }
        let render = parse(&canvas.render_json());
        let degrees: Vec<u64> = render["vertices"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v["degree"].as_u64())
            .collect();
        assert_eq!(degrees, vec![1, 2, 1]);
    }

    #[test]
    fn rewound_host_clock_keeps_recording() {
        let mut canvas = BoundaryCanvas::new();
        canvas.begin_drawing(10_000.0);
        canvas.handle_click(LAT, LNG, 10_000.0);
        // Host timestamps restart from a lower origin.
        for (i, dlng) in [0.01, 0.02, 0.03].into_iter().enumerate() {
            canvas.handle_click(LAT, LNG + dlng, 1000.0 * (i + 1) as f64);
        }
        assert_eq!(canvas.session().history().len(), 4);
    }

    #[test]
    fn oversized_history_config_is_rejected() {
        let mut canvas = BoundaryCanvas::new();
        assert!(!canvas.configure(r#"{"history_capacity": 18446744073709551615}"#));
        assert!(canvas.configure(r#"{"history_capacity": 50}"#));
        assert_eq!(canvas.session().history().capacity(), 50);
    }

    #[test]
    fn lint_json_flags_dangling_segment() {
        let payload = r#"{
            "vertices": [{"id": "v-lint-a", "lat": 38.2, "lng": -85.9}],
            "segments": [{"id": "s-lint-a", "startId": "v-lint-a", "endId": "v-lint-b", "type": "noFlow"}],
            "isClosed": false
        }"#;
        let diags = parse(&lint_json(payload));
        let rules: Vec<&str> = diags
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["rule"].as_str())
            .collect();
        assert!(rules.contains(&"dangling-segment"), "{rules:?}");
        assert_eq!(parse(&lint_json("{"))[0]["rule"], "parse");
    }
}
