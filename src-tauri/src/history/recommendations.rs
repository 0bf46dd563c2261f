use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::db::ExerciseLog;

/// Tunable thresholds for recommendations and milestone projection.
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Fewer logged sessions than this triggers a frequency nudge.
    pub min_sessions: usize,
    pub min_completion_rate: f64,
    pub min_duration_mins: f64,
    /// Entries needed before a trend is projected.
    pub milestone_min_entries: usize,
    pub milestone_target_score: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_sessions: 3,
            min_completion_rate: 0.7,
            min_duration_mins: 10.0,
            milestone_min_entries: 5,
            milestone_target_score: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub exercise: String,
    pub predicted_date: NaiveDate,
    pub target_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub recommendations: Vec<String>,
    pub milestones: Vec<Milestone>,
}

#[derive(Default)]
struct ExerciseStats {
    count: usize,
    total_duration: f64,
    total_completion: f64,
}

/// Per-exercise nudges, exercises in name order.
pub fn exercise_recommendations(logs: &[ExerciseLog], config: &RecommendationConfig) -> Vec<String> {
    let mut stats: BTreeMap<&str, ExerciseStats> = BTreeMap::new();
    for log in logs {
        let entry = stats.entry(log.exercise.as_str()).or_default();
        entry.count += 1;
        entry.total_duration += f64::from(log.duration_mins);
        entry.total_completion += log.completion_rate;
    }

    let mut recommendations = Vec::new();
    for (exercise, stat) in stats {
        let avg_duration = stat.total_duration / stat.count as f64;
        let avg_completion = stat.total_completion / stat.count as f64;

        if stat.count < config.min_sessions {
            recommendations.push(format!("Try to do more {exercise} sessions"));
        }
        if avg_completion < config.min_completion_rate {
            recommendations.push(format!("Focus on completing full sets of {exercise}"));
        }
        if avg_duration < config.min_duration_mins {
            recommendations.push(format!("Gradually increase duration of {exercise}"));
        }
    }
    recommendations
}

/// Projects when each exercise's performance score reaches the target,
/// extrapolating the mean step between consecutive entries.
///
/// Exercises appear in order of their first log entry. Exercises with too
/// few entries, a flat or falling trend, or a score already at the target
/// get no milestone.
pub fn predict_milestones(
    logs: &[ExerciseLog],
    today: NaiveDate,
    config: &RecommendationConfig,
) -> Vec<Milestone> {
    let mut order: Vec<&str> = Vec::new();
    let mut scores: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for log in logs {
        let series = scores.entry(log.exercise.as_str()).or_insert_with(|| {
            order.push(log.exercise.as_str());
            Vec::new()
        });
        series.push(log.performance_score);
    }

    let mut milestones = Vec::new();
    for exercise in order {
        let series = &scores[exercise];
        if series.len() < config.milestone_min_entries {
            continue;
        }

        let steps = series.len() - 1;
        let avg_improvement =
            series.windows(2).map(|pair| pair[1] - pair[0]).sum::<f64>() / steps as f64;
        let current = series[steps];

        if avg_improvement <= 0.0 || current >= config.milestone_target_score {
            continue;
        }

        let days = ((config.milestone_target_score - current) / avg_improvement).ceil() as u64;
        let Some(predicted_date) = today.checked_add_days(Days::new(days)) else {
            continue;
        };

        milestones.push(Milestone {
            exercise: exercise.to_string(),
            predicted_date,
            target_score: config.milestone_target_score,
        });
    }
    milestones
}

pub fn progress_report(
    logs: &[ExerciseLog],
    today: NaiveDate,
    config: &RecommendationConfig,
) -> ProgressReport {
    ProgressReport {
        recommendations: exercise_recommendations(logs, config),
        milestones: predict_milestones(logs, today, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn log(exercise: &str, duration_mins: u32, completion_rate: f64, score: f64) -> ExerciseLog {
        ExerciseLog {
            id: uuid::Uuid::new_v4().to_string(),
            exercise: exercise.into(),
            logged_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration_mins,
            completion_rate,
            performance_score: score,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_no_history_no_output() {
        let config = RecommendationConfig::default();
        let report = progress_report(&[], today(), &config);
        assert!(report.recommendations.is_empty());
        assert!(report.milestones.is_empty());
    }

    #[test]
    fn test_recommendation_rules() {
        let logs = vec![
            log("walking", 5, 0.5, 0.3),
            log("arm raise", 20, 0.9, 0.5),
            log("arm raise", 20, 0.8, 0.5),
            log("arm raise", 20, 0.95, 0.6),
        ];
        let recs = exercise_recommendations(&logs, &RecommendationConfig::default());
        assert_eq!(
            recs,
            vec![
                "Try to do more walking sessions".to_string(),
                "Focus on completing full sets of walking".to_string(),
                "Gradually increase duration of walking".to_string(),
            ]
        );
    }

    #[test]
    fn test_milestone_projection() {
        let logs: Vec<_> = [0.0, 0.125, 0.25, 0.375, 0.5]
            .iter()
            .map(|score| log("leg lift", 15, 0.9, *score))
            .collect();

        // (0.75 - 0.5) / 0.125 is exactly 2 days.
        let config = RecommendationConfig {
            milestone_target_score: 0.75,
            ..RecommendationConfig::default()
        };
        let milestones = predict_milestones(&logs, today(), &config);
        assert_eq!(milestones.len(), 1);
        assert_eq!(
            milestones[0].predicted_date,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
        );
        assert_eq!(milestones[0].target_score, 0.75);

        // (0.8 - 0.5) / 0.125 = 2.4, a partial day rounds up to 3.
        let milestones = predict_milestones(&logs, today(), &RecommendationConfig::default());
        assert_eq!(
            milestones[0].predicted_date,
            NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()
        );
    }

    #[test]
    fn test_milestone_needs_enough_rising_entries() {
        let config = RecommendationConfig::default();
        let short: Vec<_> = [0.1, 0.2, 0.3, 0.4]
            .iter()
            .map(|s| log("a", 15, 0.9, *s))
            .collect();
        assert!(predict_milestones(&short, today(), &config).is_empty());

        let falling: Vec<_> = [0.6, 0.5, 0.5, 0.4, 0.3]
            .iter()
            .map(|s| log("a", 15, 0.9, *s))
            .collect();
        assert!(predict_milestones(&falling, today(), &config).is_empty());

        let done: Vec<_> = [0.6, 0.7, 0.8, 0.85, 0.9]
            .iter()
            .map(|s| log("a", 15, 0.9, *s))
            .collect();
        assert!(predict_milestones(&done, today(), &config).is_empty());
    }

    #[test]
    fn test_milestones_follow_first_appearance() {
        let mut logs = Vec::new();
        for i in 0..5 {
            logs.push(log("zumba", 30, 1.0, 0.1 + 0.1 * i as f64));
            logs.push(log("arm raise", 30, 1.0, 0.2 + 0.05 * i as f64));
        }
        let milestones = predict_milestones(&logs, today(), &RecommendationConfig::default());
        let names: Vec<_> = milestones.iter().map(|m| m.exercise.as_str()).collect();
        assert_eq!(names, vec!["zumba", "arm raise"]);
    }
}
