//! Daily activity points and the badge they unlock.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::db::ExerciseLog;

/// Point values and badge thresholds.
#[derive(Debug, Clone)]
pub struct RewardConfig {
    pub points_per_exercise_minute: u32,
    pub medication_bonus: u32,
    pub points_per_healthy_meal: u32,
    /// Minimum points for gold, silver and bronze, descending.
    pub badge_thresholds: [u32; 3],
    pub max_exercise_minutes: u32,
    pub max_healthy_meals: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            points_per_exercise_minute: 2,
            medication_bonus: 50,
            points_per_healthy_meal: 10,
            badge_thresholds: [300, 150, 50],
            max_exercise_minutes: 120,
            max_healthy_meals: 5,
        }
    }
}

/// One day's self-reported activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub exercise_minutes: u32,
    pub took_medication: bool,
    pub healthy_meals: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Gold,
    Silver,
    Bronze,
}

impl Badge {
    pub fn title(&self) -> &'static str {
        match self {
            Badge::Gold => "Gold Badge: Health Champion",
            Badge::Silver => "Silver Badge: Consistent Achiever",
            Badge::Bronze => "Bronze Badge: Wellness Starter",
        }
    }
}

impl Serialize for Badge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReward {
    pub points: u32,
    /// Highest badge reached, if any. At most one is awarded per day.
    pub badge: Option<Badge>,
}

pub fn score_daily_activity(activity: &DailyActivity, config: &RewardConfig) -> Result<DailyReward> {
    if activity.exercise_minutes > config.max_exercise_minutes {
        bail!(
            "exercise minutes must be at most {}",
            config.max_exercise_minutes
        );
    }
    if activity.healthy_meals > config.max_healthy_meals {
        bail!("healthy meals must be at most {}", config.max_healthy_meals);
    }

    let mut points = activity.exercise_minutes * config.points_per_exercise_minute;
    if activity.took_medication {
        points += config.medication_bonus;
    }
    points += activity.healthy_meals * config.points_per_healthy_meal;

    let [gold, silver, bronze] = config.badge_thresholds;
    let badge = if points >= gold {
        Some(Badge::Gold)
    } else if points >= silver {
        Some(Badge::Silver)
    } else if points >= bronze {
        Some(Badge::Bronze)
    } else {
        None
    };

    Ok(DailyReward { points, badge })
}

/// Total logged exercise on `day`, capped at the daily maximum.
pub fn exercise_minutes_on(logs: &[ExerciseLog], day: NaiveDate, config: &RewardConfig) -> u32 {
    logs.iter()
        .filter(|log| log.logged_on == day)
        .fold(0u32, |total, log| total.saturating_add(log.duration_mins))
        .min(config.max_exercise_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn activity(minutes: u32, took_medication: bool, meals: u32) -> DailyActivity {
        DailyActivity {
            exercise_minutes: minutes,
            took_medication,
            healthy_meals: meals,
        }
    }

    #[test]
    fn test_points_and_badges() {
        let config = RewardConfig::default();

        let reward = score_daily_activity(&activity(30, true, 3), &config).unwrap();
        assert_eq!(reward.points, 140);
        assert_eq!(reward.badge, Some(Badge::Bronze));

        let reward = score_daily_activity(&activity(120, true, 5), &config).unwrap();
        assert_eq!(reward.points, 340);
        assert_eq!(reward.badge, Some(Badge::Gold));

        let reward = score_daily_activity(&activity(50, false, 5), &config).unwrap();
        assert_eq!(reward.points, 150);
        assert_eq!(reward.badge, Some(Badge::Silver));

        let reward = score_daily_activity(&activity(20, false, 0), &config).unwrap();
        assert_eq!(reward.points, 40);
        assert_eq!(reward.badge, None);
    }

    #[test]
    fn test_out_of_range_activity_is_rejected() {
        let config = RewardConfig::default();
        assert!(score_daily_activity(&activity(121, false, 0), &config).is_err());
        assert!(score_daily_activity(&activity(0, false, 6), &config).is_err());
    }

    #[test]
    fn test_badge_serializes_as_title() {
        let reward = DailyReward {
            points: 300,
            badge: Some(Badge::Gold),
        };
        let json = serde_json::to_value(reward).unwrap();
        assert_eq!(json["badge"], "Gold Badge: Health Champion");
        assert_eq!(json["points"], 300);
    }

    #[test]
    fn test_minutes_summed_for_the_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let log = |on: NaiveDate, mins: u32| ExerciseLog {
            id: uuid::Uuid::new_v4().to_string(),
            exercise: "walking".into(),
            logged_on: on,
            duration_mins: mins,
            completion_rate: 1.0,
            performance_score: 0.5,
            notes: None,
            created_at: Utc::now(),
        };
        let other = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let logs = vec![log(day, 20), log(other, 60), log(day, 25)];
        let config = RewardConfig::default();
        assert_eq!(exercise_minutes_on(&logs, day, &config), 45);

        let long = vec![log(day, 90), log(day, 90)];
        assert_eq!(exercise_minutes_on(&long, day, &config), 120);
    }
}
