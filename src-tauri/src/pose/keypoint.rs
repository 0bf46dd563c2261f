//! Pose estimator output as consumed by the tracker.
//!
//! Estimates arrive in the PoseNet shape: an overall `score` plus a list of
//! keypoints tagged with their `part` name. The tracker never mutates them.

use serde::{Deserialize, Serialize};

/// The 17 landmarks reported by PoseNet / MoveNet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single landmark with its detection confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub part: BodyPart,
    pub position: Position,
    pub score: f64,
}

impl Keypoint {
    pub fn new(part: BodyPart, x: f64, y: f64, score: f64) -> Self {
        Self {
            part,
            position: Position::new(x, y),
            score,
        }
    }

    pub fn is_valid(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

/// One frame's worth of estimator output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseEstimate {
    /// Overall pose confidence in [0, 1].
    pub score: f64,
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl PoseEstimate {
    pub fn new(score: f64, keypoints: Vec<Keypoint>) -> Self {
        Self { score, keypoints }
    }

    /// Looks up a landmark, treating low-confidence detections as absent.
    pub fn keypoint(&self, part: BodyPart, min_confidence: f64) -> Option<&Keypoint> {
        self.keypoints
            .iter()
            .find(|k| k.part == part)
            .filter(|k| k.is_valid(min_confidence))
    }

    /// Resolves an ordered (proximal, joint, distal) triple, or `None` if any
    /// of the three is missing.
    pub fn joint_triple(
        &self,
        parts: [BodyPart; 3],
        min_confidence: f64,
    ) -> Option<(Position, Position, Position)> {
        let proximal = self.keypoint(parts[0], min_confidence)?;
        let joint = self.keypoint(parts[1], min_confidence)?;
        let distal = self.keypoint(parts[2], min_confidence)?;
        Some((proximal.position, joint.position, distal.position))
    }
}
