use serde::{Deserialize, Serialize};

use super::ExerciseThresholds;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RepPhase {
    Idle,
    Raised,
}

impl Default for RepPhase {
    fn default() -> Self {
        RepPhase::Idle
    }
}

/// Counts up/down cycles of a tracked angle.
///
/// The raised and lowered thresholds form a hysteresis band: jitter around
/// either edge cannot complete a rep on its own.
#[derive(Debug, Clone)]
pub struct RepCounter {
    phase: RepPhase,
    count: u32,
    raised_above: f64,
    lowered_below: f64,
}

impl RepCounter {
    pub fn new(thresholds: &ExerciseThresholds) -> Self {
        Self {
            phase: RepPhase::Idle,
            count: 0,
            raised_above: thresholds.raised_above,
            lowered_below: thresholds.lowered_below,
        }
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Feeds one angle sample. Returns true when it completed a rep.
    pub fn update(&mut self, angle: f64) -> bool {
        match self.phase {
            RepPhase::Idle if angle > self.raised_above => {
                self.phase = RepPhase::Raised;
                false
            }
            RepPhase::Raised if angle < self.lowered_below => {
                self.phase = RepPhase::Idle;
                self.count = self.count.saturating_add(1);
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.phase = RepPhase::Idle;
        self.count = 0;
    }
}
