//! Summary of one Start/Stop analysis run.
//!
//! The live per-frame state never reaches the database; only the totals
//! recorded when the run ends do.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracker::ExerciseKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStatus {
    Running,
    Completed,
    Interrupted,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Running => "Running",
            AnalysisStatus::Completed => "Completed",
            AnalysisStatus::Interrupted => "Interrupted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSession {
    pub id: String,
    /// Exercise selected when the run started.
    pub exercise: ExerciseKind,
    pub status: AnalysisStatus,
    pub started_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub arm_raise_reps: u32,
    pub leg_lift_reps: u32,
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub average_form_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisSession {
    pub fn started(id: String, exercise: ExerciseKind, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            exercise,
            status: AnalysisStatus::Running,
            started_at,
            stopped_at: None,
            arm_raise_reps: 0,
            leg_lift_reps: 0,
            frames_processed: 0,
            frames_skipped: 0,
            average_form_score: None,
            created_at: started_at,
            updated_at: started_at,
        }
    }

    pub fn total_reps(&self) -> u32 {
        self.arm_raise_reps.saturating_add(self.leg_lift_reps)
    }
}
