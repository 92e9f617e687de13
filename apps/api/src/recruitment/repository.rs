use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::models::recruitment::{CandidateRow, InterviewRow, JobPostingRow};

#[derive(Debug)]
pub struct NewJobPosting {
    pub title: String,
    pub description: String,
    pub department: String,
    pub experience_level: String,
    pub skills: Vec<String>,
    pub requirements: String,
    pub benefits: Option<String>,
    pub status: String,
    pub created_by: String,
}

#[derive(Debug)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    pub resume_text: Option<String>,
    pub job_posting_id: Option<i32>,
    pub skill_match_score: Option<i32>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct NewInterview {
    pub candidate_id: i32,
    pub interviewer_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub feedback: Option<Value>,
}

// ── Job postings ────────────────────────────────────────────────────────────

pub async fn insert_job_posting(
    pool: &PgPool,
    posting: &NewJobPosting,
) -> Result<JobPostingRow, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>(
        r#"
        INSERT INTO job_postings
            (title, description, department, experience_level, skills,
             requirements, benefits, status, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&posting.title)
    .bind(&posting.description)
    .bind(&posting.department)
    .bind(&posting.experience_level)
    .bind(&posting.skills)
    .bind(&posting.requirements)
    .bind(&posting.benefits)
    .bind(&posting.status)
    .bind(&posting.created_by)
    .fetch_one(pool)
    .await
}

pub async fn list_job_postings(pool: &PgPool) -> Result<Vec<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_job_posting(pool: &PgPool, id: i32) -> Result<Option<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

// ── Candidates ──────────────────────────────────────────────────────────────

pub async fn insert_candidate(
    pool: &PgPool,
    candidate: &NewCandidate,
) -> Result<CandidateRow, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        INSERT INTO candidates
            (name, email, phone, resume_url, resume_text, job_posting_id,
             skill_match_score, tags, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&candidate.name)
    .bind(&candidate.email)
    .bind(&candidate.phone)
    .bind(&candidate.resume_url)
    .bind(&candidate.resume_text)
    .bind(candidate.job_posting_id)
    .bind(candidate.skill_match_score)
    .bind(&candidate.tags)
    .bind(&candidate.notes)
    .fetch_one(pool)
    .await
}

pub async fn get_candidate(pool: &PgPool, id: i32) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// For one posting: ranked by skill match, best first. Otherwise newest first.
pub async fn list_candidates(
    pool: &PgPool,
    job_posting_id: Option<i32>,
) -> Result<Vec<CandidateRow>, sqlx::Error> {
    match job_posting_id {
        Some(id) => {
            sqlx::query_as::<_, CandidateRow>(
                r#"
                SELECT * FROM candidates
                WHERE job_posting_id = $1
                ORDER BY skill_match_score DESC NULLS LAST, created_at ASC
                "#,
            )
            .bind(id)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        }
    }
}

/// Appends tags the candidate does not already carry.
pub async fn append_candidate_tags(
    pool: &PgPool,
    id: i32,
    tags: &[String],
) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates
        SET tags = tags || ARRAY(
            SELECT DISTINCT t FROM unnest($2::text[]) AS t
            WHERE NOT (t = ANY(candidates.tags))
        )
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(tags)
    .fetch_optional(pool)
    .await
}

// ── Interviews ──────────────────────────────────────────────────────────────

pub async fn insert_interview(
    pool: &PgPool,
    interview: &NewInterview,
) -> Result<InterviewRow, sqlx::Error> {
    sqlx::query_as::<_, InterviewRow>(
        r#"
        INSERT INTO interviews
            (candidate_id, interviewer_id, scheduled_at, status, notes, feedback)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(interview.candidate_id)
    .bind(&interview.interviewer_id)
    .bind(interview.scheduled_at)
    .bind(&interview.status)
    .bind(&interview.notes)
    .bind(&interview.feedback)
    .fetch_one(pool)
    .await
}

/// Latest scheduled first, optionally for one candidate.
pub async fn list_interviews(
    pool: &PgPool,
    candidate_id: Option<i32>,
) -> Result<Vec<InterviewRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewRow>(
        r#"
        SELECT * FROM interviews
        WHERE ($1::int IS NULL OR candidate_id = $1)
        ORDER BY scheduled_at DESC
        "#,
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}
