use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tracker::{ExerciseKind, FormReading, RepCounts};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TrackerStatus {
    Idle,
    Running,
    Stopped,
}

impl Default for TrackerStatus {
    fn default() -> Self {
        TrackerStatus::Idle
    }
}

/// Everything the display needs, republished after every scored frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSnapshot {
    pub status: TrackerStatus,
    pub session_id: Option<String>,
    pub exercise: ExerciseKind,
    pub reading: FormReading,
    /// Reps for the selected exercise.
    pub rep_count: u32,
    pub rep_counts: RepCounts,
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub started_at: Option<DateTime<Utc>>,
}

impl AnalysisSnapshot {
    pub fn idle(exercise: ExerciseKind) -> Self {
        Self {
            status: TrackerStatus::Idle,
            session_id: None,
            exercise,
            reading: FormReading::no_detection(exercise),
            rep_count: 0,
            rep_counts: RepCounts {
                arm_raise: 0,
                leg_lift: 0,
            },
            frames_processed: 0,
            frames_skipped: 0,
            started_at: None,
        }
    }

    pub fn started(session_id: String, exercise: ExerciseKind, started_at: DateTime<Utc>) -> Self {
        Self {
            status: TrackerStatus::Running,
            session_id: Some(session_id),
            started_at: Some(started_at),
            ..Self::idle(exercise)
        }
    }

    pub fn select_exercise(&mut self, exercise: ExerciseKind) {
        self.exercise = exercise;
        self.reading = FormReading::no_detection(exercise);
        self.rep_count = self.rep_counts.get(exercise);
    }

    pub fn apply_reading(&mut self, reading: FormReading, rep_counts: RepCounts) {
        self.exercise = reading.exercise;
        self.rep_count = rep_counts.get(reading.exercise);
        self.rep_counts = rep_counts;
        self.reading = reading;
    }
}
