use anyhow::{bail, Result};

use super::ExerciseKind;

/// Per-exercise angle thresholds, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseThresholds {
    /// Lower bounds of the 100 / 80 / 60 score bands, descending.
    pub score_bands: [f64; 3],

    /// Rep counter enters the raised phase above this angle...
    pub raised_above: f64,
    /// ...and completes a rep below this one.
    pub lowered_below: f64,
}

/// Configuration for the form tracker with tunable thresholds.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Frames whose overall pose score does not exceed this are skipped.
    pub min_pose_confidence: f64,

    /// Keypoints below this confidence are treated as missing.
    pub min_keypoint_confidence: f64,

    pub arm_raise: ExerciseThresholds,
    pub leg_lift: ExerciseThresholds,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_pose_confidence: 0.2,
            min_keypoint_confidence: 0.1,
            arm_raise: ExerciseThresholds {
                score_bands: [160.0, 140.0, 120.0],
                raised_above: 150.0,
                lowered_below: 60.0,
            },
            leg_lift: ExerciseThresholds {
                score_bands: [150.0, 130.0, 110.0],
                raised_above: 130.0,
                lowered_below: 90.0,
            },
        }
    }
}

impl TrackerConfig {
    pub fn thresholds(&self, exercise: ExerciseKind) -> &ExerciseThresholds {
        match exercise {
            ExerciseKind::ArmRaise => &self.arm_raise,
            ExerciseKind::LegLift => &self.leg_lift,
        }
    }

    /// Rejects confidence floors outside [0, 1). A floor of 1 or more would
    /// skip every frame.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.min_pose_confidence) {
            bail!("minimum pose confidence must be in [0, 1)");
        }
        if !(0.0..1.0).contains(&self.min_keypoint_confidence) {
            bail!("minimum keypoint confidence must be in [0, 1)");
        }
        Ok(())
    }
}
