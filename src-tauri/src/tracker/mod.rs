pub mod angle;
pub mod config;
pub mod exercise;
pub mod reps;
pub mod scoring;
pub mod session;

pub use angle::joint_angle;
pub use config::{ExerciseThresholds, TrackerConfig};
pub use exercise::ExerciseKind;
pub use reps::{RepCounter, RepPhase};
pub use scoring::{score_form, Feedback, FormReading};
pub use session::{ExerciseSession, FormTracker, FrameOutcome, RepCounts};
