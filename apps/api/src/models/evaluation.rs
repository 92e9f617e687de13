use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRow {
    pub id: i32,
    pub candidate_id: i32,
    pub test_type: String,
    /// Free-form question objects as authored by the HR user.
    pub questions: Value,
    pub responses: Value,
    pub score: Option<i32>,
    /// Seconds.
    pub response_time: Option<i32>,
    pub behavioral_cues: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
