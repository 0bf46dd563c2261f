use tauri::{AppHandle, Emitter, State};
use tokio::time::Duration;

use crate::{
    analysis::{AnalysisController, AnalysisSnapshot, FrameSource},
    db::AnalysisSession,
    pose::{PoseEstimate, ReplaySource},
    tracker::ExerciseKind,
    AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> AnalysisController {
    state.analysis.clone()
}

#[tauri::command]
pub async fn get_analysis_state(state: State<'_, AppState>) -> Result<AnalysisSnapshot, String> {
    Ok(controller_from_state(&state).snapshot())
}

#[tauri::command]
pub async fn start_analysis(
    state: State<'_, AppState>,
    exercise: Option<ExerciseKind>,
) -> Result<AnalysisSnapshot, String> {
    let controller = controller_from_state(&state);
    let settings = state.settings.tracker();
    let exercise = exercise.unwrap_or_else(|| controller.selected_exercise());
    controller
        .start(exercise, FrameSource::Live, settings.tracker_config())
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn stop_analysis(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<Option<AnalysisSession>, String> {
    let controller = controller_from_state(&state);
    let session = controller.stop().await.map_err(|e| e.to_string())?;

    if let Some(session) = &session {
        app_handle
            .emit("analysis-completed", session)
            .map_err(|e| e.to_string())?;
    }

    Ok(session)
}

#[tauri::command]
pub async fn select_exercise(
    state: State<'_, AppState>,
    exercise: ExerciseKind,
) -> Result<AnalysisSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.select_exercise(exercise);
    Ok(controller.snapshot())
}

/// Receives one estimate from the in-page pose estimator.
#[tauri::command]
pub async fn submit_pose(state: State<'_, AppState>, pose: PoseEstimate) -> Result<bool, String> {
    controller_from_state(&state)
        .submit_pose(pose)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_analysis_sessions(
    state: State<'_, AppState>,
    limit: Option<usize>,
    offset: Option<usize>,
) -> Result<Vec<AnalysisSession>, String> {
    state
        .db
        .list_analysis_sessions(limit.unwrap_or(50), offset.unwrap_or(0))
        .await
        .map_err(|e| e.to_string())
}

/// Runs a recorded session through the tracker at the configured pace. As
/// with a live run, the session is recorded on `stop_analysis`.
#[tauri::command]
pub async fn start_replay(
    state: State<'_, AppState>,
    path: String,
    exercise: Option<ExerciseKind>,
) -> Result<AnalysisSnapshot, String> {
    let controller = controller_from_state(&state);
    let settings = state.settings.tracker();
    let frame_interval = settings.replay_frame_interval_ms.map(Duration::from_millis);
    let source = ReplaySource::open(&path, frame_interval)
        .await
        .map_err(|e| e.to_string())?;
    let exercise = exercise.unwrap_or_else(|| controller.selected_exercise());
    controller
        .start(exercise, FrameSource::Replay(source), settings.tracker_config())
        .await
        .map_err(|e| e.to_string())
}
