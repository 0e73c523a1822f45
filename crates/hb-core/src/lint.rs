//! Structural diagnostics for boundary polygons.
//!
//! Reports invariant violations without modifying the polygon. Useful for
//! polygons loaded from outside the editor and as a test oracle.

use crate::id::VertexId;
use crate::model::BoundaryPolygon;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet};

// ─── Diagnostic types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// The polygon violates a structural invariant.
    Error,
    /// Legal, but probably not what the user meant.
    Warning,
}

#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-segment").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

#[must_use]
pub fn lint_polygon(poly: &BoundaryPolygon) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(poly, &mut diags);
    lint_dangling_segments(poly, &mut diags);
    lint_segment_count(poly, &mut diags);
    lint_topology(poly, &mut diags);
    lint_zero_length(poly, &mut diags);
    diags
}

/// `true` when no rule reports an error.
#[must_use]
pub fn is_well_formed(poly: &BoundaryPolygon) -> bool {
    lint_polygon(poly)
        .iter()
        .all(|d| d.severity != LintSeverity::Error)
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_duplicate_ids(poly: &BoundaryPolygon, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for v in &poly.vertices {
        if !seen.insert(v.id.as_str()) {
            diags.push(LintDiagnostic {
                message: format!("Vertex id `{}` appears more than once.", v.id),
                severity: LintSeverity::Error,
                rule: "duplicate-id",
            });
        }
    }
    let mut seen = HashSet::new();
    for s in &poly.segments {
        if !seen.insert(s.id.as_str()) {
            diags.push(LintDiagnostic {
                message: format!("Segment id `{}` appears more than once.", s.id),
                severity: LintSeverity::Error,
                rule: "duplicate-id",
            });
        }
    }
}

fn lint_dangling_segments(poly: &BoundaryPolygon, diags: &mut Vec<LintDiagnostic>) {
    for seg in &poly.segments {
        for end in [seg.start_id, seg.end_id] {
            if poly.vertex(end).is_none() {
                diags.push(LintDiagnostic {
                    message: format!("Segment `{}` references missing vertex `{end}`.", seg.id),
                    severity: LintSeverity::Error,
                    rule: "dangling-segment",
                });
            }
        }
    }
}

fn lint_segment_count(poly: &BoundaryPolygon, diags: &mut Vec<LintDiagnostic>) {
    let n = poly.vertices.len();
    let expected = if poly.is_closed { n } else { n.saturating_sub(1) };
    if poly.segments.len() != expected {
        diags.push(LintDiagnostic {
            message: format!(
                "{} polygon with {n} vertices should have {expected} segments, found {}.",
                if poly.is_closed { "Closed" } else { "Open" },
                poly.segments.len()
            ),
            severity: LintSeverity::Error,
            rule: "segment-count",
        });
    }
}

/// Every vertex must sit on one connected path (open) or ring (closed).
fn lint_topology(poly: &BoundaryPolygon, diags: &mut Vec<LintDiagnostic>) {
    if poly.vertices.is_empty() {
        return;
    }

    let mut graph: UnGraph<VertexId, ()> =
        UnGraph::with_capacity(poly.vertices.len(), poly.segments.len());
    let index: HashMap<VertexId, NodeIndex> = poly
        .vertices
        .iter()
        .map(|v| (v.id, graph.add_node(v.id)))
        .collect();
    for (seg, start, end) in poly.resolved_segments() {
        if seg.start_id == seg.end_id {
            continue;
        }
        graph.add_edge(index[&start.id], index[&end.id], ());
    }

    if connected_components(&graph) > 1 {
        diags.push(LintDiagnostic {
            message: "Boundary is split into disconnected pieces.".to_string(),
            severity: LintSeverity::Error,
            rule: "disconnected",
        });
    }

    let n = poly.vertices.len();
    for (i, v) in poly.vertices.iter().enumerate() {
        let degree = graph.edges(index[&v.id]).count();
        let expected = match (poly.is_closed, n) {
            (true, _) => 2,
            (false, 1) => 0,
            (false, _) if i == 0 || i == n - 1 => 1,
            (false, _) => 2,
        };
        if degree != expected {
            diags.push(LintDiagnostic {
                message: format!("Vertex `{}` joins {degree} segments, expected {expected}.", v.id),
                severity: LintSeverity::Error,
                rule: "vertex-degree",
            });
        }
    }
}

fn lint_zero_length(poly: &BoundaryPolygon, diags: &mut Vec<LintDiagnostic>) {
    for (seg, start, end) in poly.resolved_segments() {
        if start.position() == end.position() {
            diags.push(LintDiagnostic {
                message: format!("Segment `{}` has zero length.", seg.id),
                severity: LintSeverity::Warning,
                rule: "zero-length",
            });
        }
    }
}
