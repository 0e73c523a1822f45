//! Mutable project state shared by one undo history.
//!
//! The boundary polygon and the imported pump-test datasets are snapshotted
//! together, so undo steps back across edits to either.

use hb_core::BoundaryPolygon;
use serde::{Deserialize, Serialize};

/// One drawdown observation from a pump test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpTestSample {
    pub time_min: f64,
    pub drawdown_ft: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PumpTestKind {
    Step,
    Constant,
    Recovery,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PumpTests {
    pub step: Vec<PumpTestSample>,
    pub constant: Vec<PumpTestSample>,
    pub recovery: Vec<PumpTestSample>,
}

impl PumpTests {
    pub fn get(&self, kind: PumpTestKind) -> &[PumpTestSample] {
        match kind {
            PumpTestKind::Step => &self.step,
            PumpTestKind::Constant => &self.constant,
            PumpTestKind::Recovery => &self.recovery,
        }
    }

    pub fn set(&mut self, kind: PumpTestKind, samples: Vec<PumpTestSample>) {
        let slot = match kind {
            PumpTestKind::Step => &mut self.step,
            PumpTestKind::Constant => &mut self.constant,
            PumpTestKind::Recovery => &mut self.recovery,
        };
        *slot = samples;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    pub boundary: BoundaryPolygon,
    pub pump_tests: PumpTests,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_only_the_named_dataset() {
        let mut tests = PumpTests::default();
        let sample = PumpTestSample {
            time_min: 10.0,
            drawdown_ft: 1.5,
        };
        tests.set(PumpTestKind::Recovery, vec![sample]);
        assert_eq!(tests.get(PumpTestKind::Recovery), &[sample]);
        assert!(tests.get(PumpTestKind::Step).is_empty());
        assert!(tests.get(PumpTestKind::Constant).is_empty());
    }
}
