use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub department: String,
    pub experience_level: String,
    pub skills: Vec<String>,
    pub requirements: String,
    pub benefits: Option<String>,
    pub status: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    pub resume_text: Option<String>,
    pub job_posting_id: Option<i32>,
    pub status: String,
    pub skill_match_score: Option<i32>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRow {
    pub id: i32,
    pub candidate_id: i32,
    pub interviewer_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub feedback: Option<Value>,
    pub created_at: DateTime<Utc>,
}
