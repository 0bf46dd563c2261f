pub mod analysis_sessions;
pub mod exercise_logs;
pub mod medications;
