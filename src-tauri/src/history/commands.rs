use chrono::{Local, NaiveDate};
use tauri::State;

use crate::{
    db::{ExerciseLog, ExerciseLogInput, Medication, MedicationInput},
    history::{
        exercise_minutes_on, progress_report, score_daily_activity, DailyActivity, DailyReward,
        ProgressReport, RecommendationConfig, RewardConfig,
    },
    AppState,
};

#[tauri::command]
pub async fn log_exercise(
    state: State<'_, AppState>,
    input: ExerciseLogInput,
) -> Result<ExerciseLog, String> {
    state
        .db
        .insert_exercise_log(input)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_exercise_logs(state: State<'_, AppState>) -> Result<Vec<ExerciseLog>, String> {
    state.db.list_exercise_logs().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_exercise_log(state: State<'_, AppState>, log_id: String) -> Result<(), String> {
    state
        .db
        .delete_exercise_log(&log_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_recommendations(state: State<'_, AppState>) -> Result<ProgressReport, String> {
    let logs = state.db.list_exercise_logs().await.map_err(|e| e.to_string())?;
    Ok(progress_report(
        &logs,
        Local::now().date_naive(),
        &RecommendationConfig::default(),
    ))
}

#[tauri::command]
pub async fn add_medication(
    state: State<'_, AppState>,
    input: MedicationInput,
) -> Result<Medication, String> {
    state
        .db
        .insert_medication(input)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_medications(state: State<'_, AppState>) -> Result<Vec<Medication>, String> {
    state.db.list_medications().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_medication(
    state: State<'_, AppState>,
    medication_id: String,
) -> Result<(), String> {
    state
        .db
        .delete_medication(&medication_id)
        .await
        .map_err(|e| e.to_string())
}

/// Scores a day's activity. Exercise minutes default to the total logged
/// for that day.
#[tauri::command]
pub async fn get_daily_reward(
    state: State<'_, AppState>,
    day: Option<NaiveDate>,
    exercise_minutes: Option<u32>,
    took_medication: bool,
    healthy_meals: u32,
) -> Result<DailyReward, String> {
    let config = RewardConfig::default();
    let exercise_minutes = match exercise_minutes {
        Some(minutes) => minutes,
        None => {
            let logs = state.db.list_exercise_logs().await.map_err(|e| e.to_string())?;
            let day = day.unwrap_or_else(|| Local::now().date_naive());
            exercise_minutes_on(&logs, day, &config)
        }
    };

    score_daily_activity(
        &DailyActivity {
            exercise_minutes,
            took_medication,
            healthy_meals,
        },
        &config,
    )
    .map_err(|e| e.to_string())
}
