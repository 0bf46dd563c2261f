pub mod analysis;
pub mod db;
pub mod history;
pub mod pose;
pub mod settings;
pub mod tracker;
mod utils;

/// Initializes `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use anyhow::Context;
    use log::{error, info};
    use tauri::{Emitter, Manager, State};

    use crate::{
        analysis::{
            commands::{
                get_analysis_state, list_analysis_sessions, select_exercise, start_analysis,
                start_replay, stop_analysis, submit_pose,
            },
            AnalysisController,
        },
        db::Database,
        history::commands::{
            add_medication, delete_exercise_log, delete_medication, get_daily_reward,
            get_recommendations, list_exercise_logs, list_medications, log_exercise,
        },
        settings::{debug_mode, SettingsStore, TrackerSettings},
    };

    pub(crate) struct AppState {
        pub(crate) db: Database,
        pub(crate) analysis: AnalysisController,
        pub(crate) settings: SettingsStore,
    }

    #[tauri::command]
    fn get_tracker_settings(state: State<AppState>) -> Result<TrackerSettings, String> {
        Ok(state.settings.tracker())
    }

    #[tauri::command]
    fn set_tracker_settings(
        settings: TrackerSettings,
        state: State<AppState>,
    ) -> Result<(), String> {
        state
            .settings
            .update_tracker(settings.clone())
            .map_err(|e| e.to_string())?;
        state.analysis.select_exercise(settings.exercise);
        Ok(())
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        crate::init_logging();

        info!("Rehab Coach starting up...");

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .setup(|app| {
                let result = (|| -> anyhow::Result<()> {
                    let app_data_dir = app
                        .path()
                        .app_data_dir()
                        .map_err(|err| anyhow::anyhow!(err))?;
                    std::fs::create_dir_all(&app_data_dir)?;

                    let database = Database::new(app_data_dir.join("rehab-coach.sqlite3"))?;

                    let settings_store = SettingsStore::new(app_data_dir.join("settings.json"))?;
                    let tracker_settings = settings_store.tracker();

                    let controller =
                        AnalysisController::new(database.clone(), tracker_settings.exercise, debug_mode());

                    // Finalize runs that were active when the app last exited.
                    {
                        let controller = controller.clone();
                        tauri::async_runtime::block_on(async move {
                            controller.recover_interrupted().await
                        })
                        .context("failed to recover interrupted analyses")?;
                    }

                    // Forward every published snapshot to the webview.
                    {
                        let mut snapshots = controller.subscribe();
                        let app_handle = app.handle().clone();
                        tauri::async_runtime::spawn(async move {
                            while snapshots.changed().await.is_ok() {
                                let snapshot = snapshots.borrow_and_update().clone();
                                if let Err(err) = app_handle.emit("analysis-state-changed", snapshot) {
                                    error!("Failed to emit analysis state: {err}");
                                }
                            }
                        });
                    }

                    app.manage(AppState {
                        db: database,
                        analysis: controller,
                        settings: settings_store,
                    });

                    Ok(())
                })();

                result.map_err(|err| err.into())
            })
            .invoke_handler(tauri::generate_handler![
                get_analysis_state,
                start_analysis,
                start_replay,
                stop_analysis,
                select_exercise,
                submit_pose,
                list_analysis_sessions,
                log_exercise,
                list_exercise_logs,
                delete_exercise_log,
                get_recommendations,
                add_medication,
                list_medications,
                delete_medication,
                get_daily_reward,
                get_tracker_settings,
                set_tracker_settings,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}

#[cfg(feature = "desktop")]
pub(crate) use desktop::AppState;
