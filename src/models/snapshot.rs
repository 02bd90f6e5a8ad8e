use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CourseProgress;

/// The persisted form of the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub progress: Vec<CourseProgress>,
    pub last_update_date: DateTime<Utc>,
}

impl ProgressSnapshot {
    pub fn new(progress: Vec<CourseProgress>) -> Self {
        Self {
            progress,
            last_update_date: Utc::now(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}
