use serde::Serialize;

use crate::pose::PoseEstimate;

use super::{
    angle::joint_angle, scoring::score_form, ExerciseKind, FormReading, RepCounter, RepPhase,
    TrackerConfig,
};

/// Live per-exercise state for one analysis run.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    exercise: ExerciseKind,
    counter: RepCounter,
    last_angle: Option<f64>,
}

impl ExerciseSession {
    pub fn new(exercise: ExerciseKind, config: &TrackerConfig) -> Self {
        Self {
            exercise,
            counter: RepCounter::new(config.thresholds(exercise)),
            last_angle: None,
        }
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    pub fn rep_count(&self) -> u32 {
        self.counter.count()
    }

    pub fn in_upward_phase(&self) -> bool {
        self.counter.phase() == RepPhase::Raised
    }

    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }

    /// Scores one angle sample and advances the rep counter.
    pub fn record_angle(&mut self, angle: f64, config: &TrackerConfig) -> FormReading {
        let reading = score_form(self.exercise, angle, config.thresholds(self.exercise));
        self.counter.update(angle);
        self.last_angle = Some(angle);
        reading
    }

    pub fn reset(&mut self) {
        self.counter.reset();
        self.last_angle = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepCounts {
    pub arm_raise: u32,
    pub leg_lift: u32,
}

impl RepCounts {
    pub fn get(&self, exercise: ExerciseKind) -> u32 {
        match exercise {
            ExerciseKind::ArmRaise => self.arm_raise,
            ExerciseKind::LegLift => self.leg_lift,
        }
    }
}

/// What happened to a single frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Scored(FormReading),
    LowConfidence,
    MissingKeypoint,
}

/// Holds exactly one `ExerciseSession` per exercise kind and routes frames
/// to the one currently selected.
#[derive(Debug, Clone)]
pub struct FormTracker {
    config: TrackerConfig,
    arm_raise: ExerciseSession,
    leg_lift: ExerciseSession,
}

impl FormTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            arm_raise: ExerciseSession::new(ExerciseKind::ArmRaise, &config),
            leg_lift: ExerciseSession::new(ExerciseKind::LegLift, &config),
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn session(&self, exercise: ExerciseKind) -> &ExerciseSession {
        match exercise {
            ExerciseKind::ArmRaise => &self.arm_raise,
            ExerciseKind::LegLift => &self.leg_lift,
        }
    }

    pub fn rep_counts(&self) -> RepCounts {
        RepCounts {
            arm_raise: self.arm_raise.rep_count(),
            leg_lift: self.leg_lift.rep_count(),
        }
    }

    /// Processes one estimate for `exercise`. Skipped frames leave every
    /// session untouched.
    pub fn process(&mut self, exercise: ExerciseKind, pose: &PoseEstimate) -> FrameOutcome {
        if pose.score <= self.config.min_pose_confidence {
            return FrameOutcome::LowConfidence;
        }

        let Some((proximal, joint, distal)) =
            pose.joint_triple(exercise.joint_triple(), self.config.min_keypoint_confidence)
        else {
            return FrameOutcome::MissingKeypoint;
        };

        let angle = joint_angle(proximal, joint, distal);
        let session = match exercise {
            ExerciseKind::ArmRaise => &mut self.arm_raise,
            ExerciseKind::LegLift => &mut self.leg_lift,
        };
        FrameOutcome::Scored(session.record_angle(angle, &self.config))
    }

    pub fn reset(&mut self) {
        self.arm_raise.reset();
        self.leg_lift.reset();
    }
}
