pub mod config;
pub mod error;
pub mod geo;
pub mod id;
pub mod lint;
pub mod model;
pub mod payload;
pub mod snap;

pub use config::{ConfigError, EditorConfig};
pub use error::{EditError, ParseSegmentTypeError};
pub use id::{SegmentId, VertexId};
pub use lint::{LintDiagnostic, LintSeverity, is_well_formed, lint_polygon};
pub use model::*;
pub use payload::BoundaryPayload;
pub use snap::{Snap, hit_test_segments, snap_to_vertex};
