use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prescribed medication on the user's list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    /// Free text, e.g. "Morning, Night".
    pub schedule: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationInput {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub schedule: String,
}
