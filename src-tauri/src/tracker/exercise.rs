use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

use crate::pose::BodyPart;

/// Exercises the operator can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    ArmRaise,
    LegLift,
}

impl Default for ExerciseKind {
    fn default() -> Self {
        ExerciseKind::ArmRaise
    }
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 2] = [ExerciseKind::ArmRaise, ExerciseKind::LegLift];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::ArmRaise => "arm-raise",
            ExerciseKind::LegLift => "leg-lift",
        }
    }

    /// Ordered (proximal, joint, distal) landmarks whose angle is tracked.
    pub fn joint_triple(&self) -> [BodyPart; 3] {
        match self {
            ExerciseKind::ArmRaise => [
                BodyPart::LeftShoulder,
                BodyPart::LeftElbow,
                BodyPart::LeftWrist,
            ],
            ExerciseKind::LegLift => [BodyPart::LeftHip, BodyPart::LeftKnee, BodyPart::LeftAnkle],
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "arm-raise" => Ok(ExerciseKind::ArmRaise),
            "leg-lift" => Ok(ExerciseKind::LegLift),
            other => Err(anyhow!("unknown exercise '{other}'")),
        }
    }
}
