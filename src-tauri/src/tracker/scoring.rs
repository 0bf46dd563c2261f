use serde::{Serialize, Serializer};

use super::{ExerciseKind, ExerciseThresholds};

/// Fixed set of coaching messages shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    NoDetection,
    PerfectForm,
    PerfectLegLift,
    GoodForm,
    RaiseArmsABitHigher,
    RaiseArmsHigher,
    LiftLegHigher,
    LiftLegMuchHigher,
}

impl Feedback {
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::NoDetection => "Perform the exercise in view of the camera",
            Feedback::PerfectForm => "Perfect form!",
            Feedback::PerfectLegLift => "Perfect leg lift!",
            Feedback::GoodForm => "Good form!",
            Feedback::RaiseArmsABitHigher => "Raise your arms a bit higher",
            Feedback::RaiseArmsHigher => "Try to raise your arms higher",
            Feedback::LiftLegHigher => "Lift your leg higher",
            Feedback::LiftLegMuchHigher => "Try to lift your leg higher",
        }
    }
}

impl Serialize for Feedback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Per-frame tracker output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReading {
    pub exercise: ExerciseKind,
    /// Joint angle in degrees; `None` until a frame has been scored.
    pub angle: Option<f64>,
    /// One of 100, 80, 60, 40, or 0 when nothing was detected.
    pub score: u8,
    pub feedback: Feedback,
}

impl FormReading {
    pub fn no_detection(exercise: ExerciseKind) -> Self {
        Self {
            exercise,
            angle: None,
            score: 0,
            feedback: Feedback::NoDetection,
        }
    }

    pub fn is_detection(&self) -> bool {
        self.angle.is_some()
    }
}

/// Maps an angle onto the exercise's score ladder. Each band includes its
/// lower bound.
pub fn score_form(
    exercise: ExerciseKind,
    angle: f64,
    thresholds: &ExerciseThresholds,
) -> FormReading {
    let [excellent, good, fair] = thresholds.score_bands;
    let band = if angle >= excellent {
        0
    } else if angle >= good {
        1
    } else if angle >= fair {
        2
    } else {
        3
    };

    let (score, feedback) = match (exercise, band) {
        (ExerciseKind::ArmRaise, 0) => (100, Feedback::PerfectForm),
        (ExerciseKind::ArmRaise, 1) => (80, Feedback::GoodForm),
        (ExerciseKind::ArmRaise, 2) => (60, Feedback::RaiseArmsABitHigher),
        (ExerciseKind::ArmRaise, _) => (40, Feedback::RaiseArmsHigher),
        (ExerciseKind::LegLift, 0) => (100, Feedback::PerfectLegLift),
        (ExerciseKind::LegLift, 1) => (80, Feedback::GoodForm),
        (ExerciseKind::LegLift, 2) => (60, Feedback::LiftLegHigher),
        (ExerciseKind::LegLift, _) => (40, Feedback::LiftLegMuchHigher),
    };

    FormReading {
        exercise,
        angle: Some(angle),
        score,
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrackerConfig;

    fn arm(angle: f64) -> FormReading {
        score_form(
            ExerciseKind::ArmRaise,
            angle,
            TrackerConfig::default().thresholds(ExerciseKind::ArmRaise),
        )
    }

    fn leg(angle: f64) -> FormReading {
        score_form(
            ExerciseKind::LegLift,
            angle,
            TrackerConfig::default().thresholds(ExerciseKind::LegLift),
        )
    }

    #[test]
    fn test_arm_raise_ladder() {
        assert_eq!(arm(175.0).score, 100);
        assert_eq!(arm(160.0).score, 100);
        assert_eq!(arm(159.9).score, 80);
        assert_eq!(arm(140.0).score, 80);
        assert_eq!(arm(125.0).score, 60);
        assert_eq!(arm(119.0).score, 40);
        assert_eq!(arm(0.0).score, 40);
    }

    #[test]
    fn test_leg_lift_ladder() {
        assert_eq!(leg(150.0).score, 100);
        assert_eq!(leg(135.0).score, 80);
        assert_eq!(leg(110.0).score, 60);
        assert_eq!(leg(100.0).score, 40);
    }

    #[test]
    fn test_feedback_follows_band() {
        assert_eq!(arm(170.0).feedback.message(), "Perfect form!");
        assert_eq!(arm(150.0).feedback.message(), "Good form!");
        assert_eq!(arm(130.0).feedback.message(), "Raise your arms a bit higher");
        assert_eq!(arm(30.0).feedback.message(), "Try to raise your arms higher");
        assert_eq!(leg(160.0).feedback.message(), "Perfect leg lift!");
        assert_eq!(leg(115.0).feedback.message(), "Lift your leg higher");
        assert_eq!(leg(20.0).feedback.message(), "Try to lift your leg higher");
    }

    #[test]
    fn test_reading_serializes_message_text() {
        let json = serde_json::to_value(arm(170.0)).unwrap();
        assert_eq!(json["exercise"], "arm-raise");
        assert_eq!(json["score"], 100);
        assert_eq!(json["feedback"], "Perfect form!");

        let idle = serde_json::to_value(FormReading::no_detection(ExerciseKind::LegLift)).unwrap();
        assert!(idle["angle"].is_null());
        assert_eq!(idle["score"], 0);
    }
}
