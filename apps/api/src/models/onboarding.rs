use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRow {
    pub id: i32,
    pub candidate_id: Option<i32>,
    pub user_id: Option<String>,
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub start_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingTaskRow {
    pub id: i32,
    pub employee_id: i32,
    pub task_type: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
