use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::tracker::{ExerciseKind, TrackerConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerSettings {
    /// Exercise preselected when the app opens.
    pub exercise: ExerciseKind,
    pub min_pose_confidence: f64,
    /// Playback pacing for recorded sessions; `None` replays as fast as possible.
    pub replay_frame_interval_ms: Option<u64>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            exercise: ExerciseKind::default(),
            min_pose_confidence: TrackerConfig::default().min_pose_confidence,
            replay_frame_interval_ms: Some(33),
        }
    }
}

impl TrackerSettings {
    pub fn validate(&self) -> Result<()> {
        self.tracker_config().validate()
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            min_pose_confidence: self.min_pose_confidence,
            ..TrackerConfig::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    tracker: TrackerSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn tracker(&self) -> TrackerSettings {
        self.data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .tracker
            .clone()
    }

    pub fn update_tracker(&self, settings: TrackerSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.tracker = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

/// `REHAB_COACH_DEBUG=1` turns on per-frame logging in the analysis loop.
pub fn debug_mode() -> bool {
    std::env::var("REHAB_COACH_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
