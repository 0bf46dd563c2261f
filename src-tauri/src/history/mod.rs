#[cfg(feature = "desktop")]
pub mod commands;
pub mod recommendations;
pub mod rewards;

pub use recommendations::{
    exercise_recommendations, predict_milestones, progress_report, Milestone, ProgressReport,
    RecommendationConfig,
};
pub use rewards::{
    exercise_minutes_on, score_daily_activity, Badge, DailyActivity, DailyReward, RewardConfig,
};
