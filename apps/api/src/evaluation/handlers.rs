//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::repository::{
    complete_assessment, get_assessment, insert_assessment, list_assessments, CompletedAssessment,
};
use crate::evaluation::scoring::{
    analyze_behavioral_cues, score_assessment, BehavioralAnalysis, ScoringResult,
};
use crate::models::evaluation::AssessmentRow;
use crate::recruitment::repository::{append_candidate_tags, get_candidate};
use crate::state::AppState;
use crate::validation::required;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTestRequest {
    pub candidate_id: Option<i32>,
    pub test_type: Option<String>,
    pub questions: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTestRequest {
    pub assessment_id: Option<i32>,
    pub responses: Option<Value>,
    /// Average seconds per response.
    pub response_time: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentFilter {
    pub candidate_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ScoreTestResponse {
    pub assessment: AssessmentRow,
    pub scoring: ScoringResult,
    pub behavioral: BehavioralAnalysis,
}

/// Questions and responses must be JSON arrays.
fn require_array(value: Option<Value>, field: &str) -> Result<Value, AppError> {
    match value {
        Some(v @ Value::Array(_)) => Ok(v),
        Some(_) => Err(AppError::Validation(format!("{field} must be an array"))),
        None => Err(AppError::Validation(format!("{field} is required"))),
    }
}

/// POST /api/evaluation/send-test
pub async fn handle_send_test(
    State(state): State<AppState>,
    Json(request): Json<SendTestRequest>,
) -> Result<Json<AssessmentRow>, AppError> {
    let candidate_id = request
        .candidate_id
        .ok_or_else(|| AppError::Validation("candidateId is required".to_string()))?;
    let test_type = required(request.test_type, "testType")?;
    let questions = require_array(request.questions, "questions")?;

    if get_candidate(&state.db, candidate_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Candidate {candidate_id} not found")));
    }

    let assessment = insert_assessment(&state.db, candidate_id, &test_type, &questions).await?;
    // Delivery to the candidate (email with a test link) is not wired up.
    info!(
        "Created {} assessment {} for candidate {}",
        assessment.test_type, assessment.id, candidate_id
    );
    Ok(Json(assessment))
}

/// POST /api/evaluation/score-test
///
/// Scores the submitted responses and analyses behavioural cues in parallel,
/// stores both on the assessment and adds the traits to the candidate's tags.
pub async fn handle_score_test(
    State(state): State<AppState>,
    Json(request): Json<ScoreTestRequest>,
) -> Result<Json<ScoreTestResponse>, AppError> {
    let assessment_id = request
        .assessment_id
        .ok_or_else(|| AppError::Validation("assessmentId is required".to_string()))?;
    let responses = require_array(request.responses, "responses")?;
    let response_time = request.response_time.unwrap_or(0).max(0);

    let assessment = get_assessment(&state.db, assessment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))?;

    let (scoring, behavioral) = tokio::try_join!(
        score_assessment(&assessment.questions, &responses, &state.llm),
        analyze_behavioral_cues(&responses, response_time, &state.llm),
    )?;

    let updated = complete_assessment(
        &state.db,
        assessment_id,
        &CompletedAssessment {
            responses: &responses,
            score: scoring.score,
            response_time,
            behavioral_cues: &behavioral.traits,
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))?;

    if append_candidate_tags(&state.db, assessment.candidate_id, &behavioral.traits)
        .await?
        .is_none()
    {
        warn!(
            "Candidate {} vanished while scoring assessment {}",
            assessment.candidate_id, assessment_id
        );
    }

    info!("Scored assessment {assessment_id}: {}", scoring.score);

    Ok(Json(ScoreTestResponse {
        assessment: updated,
        scoring,
        behavioral,
    }))
}

/// GET /api/evaluation/assessments?candidateId=
pub async fn handle_list_assessments(
    State(state): State<AppState>,
    Query(filter): Query<AssessmentFilter>,
) -> Result<Json<Vec<AssessmentRow>>, AppError> {
    Ok(Json(list_assessments(&state.db, filter.candidate_id).await?))
}
