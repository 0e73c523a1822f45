pub mod history;
pub mod input;
pub mod mode;
pub mod session;
pub mod shortcuts;
pub mod state;

pub use history::{Clock, ManualClock, MonotonicClock, UndoHistory};
pub use input::InputEvent;
pub use mode::{Intent, PlacementController, PlacementState, WellKind};
pub use session::{EditorSession, EventOutcome};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use state::{ProjectState, PumpTestKind, PumpTestSample, PumpTests};
