//! Job control records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recurring job tracked by a control record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlType {
    CalendarRefresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlStatus {
    #[default]
    Success,
    Failed,
}

/// Marker of a completed run of a recurring job.
///
/// The latest `Success` record of a job decides whether it already ran today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRecord {
    pub id: String,
    pub job_type: ControlType,
    pub timestamp: DateTime<Utc>,
    pub status: ControlStatus,
    pub message: Option<String>,
}

impl ControlRecord {
    pub fn success(job_type: ControlType, timestamp: DateTime<Utc>, message: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job_type,
            timestamp,
            status: ControlStatus::Success,
            message: Some(message.to_string()),
        }
    }
}
