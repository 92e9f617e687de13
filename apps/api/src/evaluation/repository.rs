use serde_json::Value;
use sqlx::PgPool;

use crate::models::evaluation::AssessmentRow;

/// Scored submission written back onto an assessment.
pub struct CompletedAssessment<'a> {
    pub responses: &'a Value,
    pub score: i32,
    pub response_time: i32,
    pub behavioral_cues: &'a [String],
}

pub async fn insert_assessment(
    pool: &PgPool,
    candidate_id: i32,
    test_type: &str,
    questions: &Value,
) -> Result<AssessmentRow, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        r#"
        INSERT INTO assessments (candidate_id, test_type, questions, responses)
        VALUES ($1, $2, $3, '[]'::jsonb)
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(test_type)
    .bind(questions)
    .fetch_one(pool)
    .await
}

pub async fn get_assessment(pool: &PgPool, id: i32) -> Result<Option<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>("SELECT * FROM assessments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Newest first, optionally for one candidate.
pub async fn list_assessments(
    pool: &PgPool,
    candidate_id: Option<i32>,
) -> Result<Vec<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        r#"
        SELECT * FROM assessments
        WHERE ($1::int IS NULL OR candidate_id = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

pub async fn complete_assessment(
    pool: &PgPool,
    id: i32,
    completed: &CompletedAssessment<'_>,
) -> Result<Option<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        r#"
        UPDATE assessments
        SET responses = $2,
            score = $3,
            response_time = $4,
            behavioral_cues = $5,
            completed_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(completed.responses)
    .bind(completed.score)
    .bind(completed.response_time)
    .bind(completed.behavioral_cues)
    .fetch_optional(pool)
    .await
}
