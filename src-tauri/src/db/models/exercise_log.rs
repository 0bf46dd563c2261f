use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A manually logged exercise session, the input to recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub id: String,
    /// Free-text exercise name as entered by the user.
    pub exercise: String,
    pub logged_on: NaiveDate,
    pub duration_mins: u32,
    /// Fraction of the planned sets completed, 0.0 to 1.0.
    pub completion_rate: f64,
    /// Self-reported or tracker-derived performance, 0.0 to 1.0.
    pub performance_score: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for logging an exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLogInput {
    pub exercise: String,
    pub logged_on: Option<NaiveDate>,
    pub duration_mins: u32,
    pub completion_rate: f64,
    pub performance_score: f64,
    #[serde(default)]
    pub notes: Option<String>,
}
