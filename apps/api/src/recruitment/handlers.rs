//! Axum route handlers for the Recruitment API.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::evaluation::repository::list_assessments;
use crate::models::recruitment::{CandidateRow, InterviewRow, JobPostingRow};
use crate::models::DEFAULT_HR_USER_ID;
use crate::recruitment::job_description::{
    generate_job_description, GenerateJdRequest, GeneratedJobDescription, JdBrief,
};
use crate::recruitment::repository::{
    get_candidate, get_job_posting, insert_candidate, insert_interview, insert_job_posting,
    list_candidates, list_interviews, list_job_postings, NewCandidate, NewInterview,
    NewJobPosting,
};
use crate::recruitment::resume_upload::{
    extract_resume_text, store_resume, validate_resume, ResumeFile,
};
use crate::recruitment::screening::{screen_resume, ScreeningResult};
use crate::recruitment::summary::generate_candidate_summary;
use crate::state::AppState;
use crate::validation::{optional, parse_id, required};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPostingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub experience_level: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub status: Option<String>,
    pub created_by: Option<String>,
}

impl TryFrom<CreateJobPostingRequest> for NewJobPosting {
    type Error = AppError;

    fn try_from(req: CreateJobPostingRequest) -> Result<Self, Self::Error> {
        Ok(NewJobPosting {
            title: required(req.title, "title")?,
            description: required(req.description, "description")?,
            department: required(req.department, "department")?,
            experience_level: required(req.experience_level, "experienceLevel")?,
            skills: req
                .skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            requirements: required(req.requirements, "requirements")?,
            benefits: optional(req.benefits),
            status: optional(req.status).unwrap_or_else(|| "active".to_string()),
            created_by: optional(req.created_by)
                .unwrap_or_else(|| DEFAULT_HR_USER_ID.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterviewRequest {
    pub candidate_id: Option<i32>,
    pub interviewer_id: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub feedback: Option<Value>,
}

impl TryFrom<ScheduleInterviewRequest> for NewInterview {
    type Error = AppError;

    fn try_from(req: ScheduleInterviewRequest) -> Result<Self, Self::Error> {
        Ok(NewInterview {
            candidate_id: req
                .candidate_id
                .ok_or_else(|| AppError::Validation("candidateId is required".to_string()))?,
            interviewer_id: optional(req.interviewer_id)
                .unwrap_or_else(|| DEFAULT_HR_USER_ID.to_string()),
            scheduled_at: req
                .scheduled_at
                .ok_or_else(|| AppError::Validation("scheduledAt is required".to_string()))?,
            status: optional(req.status).unwrap_or_else(|| "scheduled".to_string()),
            notes: optional(req.notes),
            feedback: req.feedback,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilter {
    pub job_posting_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ScreenResumeResponse {
    pub candidate: CandidateRow,
    pub screening: ScreeningResult,
}

#[derive(Debug, Serialize)]
pub struct CandidateSummaryResponse {
    pub summary: String,
}

/// Fields collected from the screen-resume multipart form.
#[derive(Debug, Default)]
struct ScreenResumeForm {
    resume: Option<ResumeFile>,
    job_posting_id: Option<String>,
    candidate_name: Option<String>,
    candidate_email: Option<String>,
    candidate_phone: Option<String>,
}

impl ScreenResumeForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ScreenResumeForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "resume" {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                form.resume = Some(ResumeFile::new(
                    file_name.as_deref(),
                    content_type.as_deref(),
                    bytes,
                ));
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
            match name.as_str() {
                "jobPostingId" => form.job_posting_id = Some(value),
                "candidateName" => form.candidate_name = Some(value),
                "candidateEmail" => form.candidate_email = Some(value),
                "candidatePhone" => form.candidate_phone = Some(value),
                _ => {}
            }
        }

        Ok(form)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/recruitment/generate-jd
pub async fn handle_generate_jd(
    State(state): State<AppState>,
    Json(request): Json<GenerateJdRequest>,
) -> Result<Json<GeneratedJobDescription>, AppError> {
    let brief = JdBrief::try_from(request)?;
    let generated = generate_job_description(&brief, &state.llm).await?;
    Ok(Json(generated))
}

/// POST /api/recruitment/job-postings
pub async fn handle_create_job_posting(
    State(state): State<AppState>,
    Json(request): Json<CreateJobPostingRequest>,
) -> Result<Json<JobPostingRow>, AppError> {
    let posting = NewJobPosting::try_from(request)?;
    let row = insert_job_posting(&state.db, &posting).await?;
    info!("Created job posting {} ({})", row.id, row.title);
    Ok(Json(row))
}

/// GET /api/recruitment/job-postings
pub async fn handle_list_job_postings(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobPostingRow>>, AppError> {
    Ok(Json(list_job_postings(&state.db).await?))
}

/// GET /api/recruitment/job-postings/:id
pub async fn handle_get_job_posting(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JobPostingRow>, AppError> {
    get_job_posting(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job posting {id} not found")))
}

/// POST /api/recruitment/screen-resume
///
/// Multipart form: `resume` file plus `jobPostingId`, `candidateName`,
/// `candidateEmail` and optional `candidatePhone`. Screens the resume against
/// the posting's requirements and records the candidate with the result.
pub async fn handle_screen_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreenResumeResponse>, AppError> {
    let form = ScreenResumeForm::read(multipart).await?;

    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_posting_id = parse_id(&required(form.job_posting_id, "jobPostingId")?, "jobPostingId")?;
    let candidate_name = required(form.candidate_name, "candidateName")?;
    let candidate_email = required(form.candidate_email, "candidateEmail")?;
    validate_resume(&resume, state.config.max_upload_bytes)?;

    let posting = get_job_posting(&state.db, job_posting_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {job_posting_id} not found")))?;

    let resume_text = extract_resume_text(&resume, &candidate_name).await;
    let screening = screen_resume(&resume_text, &posting.requirements, &state.llm).await?;
    let resume_key = store_resume(&state.s3, &state.config.s3_bucket, &resume).await?;

    let candidate = insert_candidate(
        &state.db,
        &NewCandidate {
            name: candidate_name,
            email: candidate_email,
            phone: optional(form.candidate_phone),
            resume_url: Some(resume_key),
            resume_text: Some(resume_text),
            job_posting_id: Some(posting.id),
            skill_match_score: Some(screening.score),
            tags: screening.matched_skills.clone(),
            notes: Some(screening.summary.clone()),
        },
    )
    .await?;

    info!(
        "Screened candidate {} for posting {}: score {}",
        candidate.id, posting.id, screening.score
    );

    Ok(Json(ScreenResumeResponse {
        candidate,
        screening,
    }))
}

/// GET /api/recruitment/rank-candidates/:job_posting_id
pub async fn handle_rank_candidates(
    State(state): State<AppState>,
    Path(job_posting_id): Path<i32>,
) -> Result<Json<Vec<CandidateRow>>, AppError> {
    Ok(Json(list_candidates(&state.db, Some(job_posting_id)).await?))
}

/// POST /api/recruitment/schedule-interview
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    Json(request): Json<ScheduleInterviewRequest>,
) -> Result<Json<InterviewRow>, AppError> {
    let interview = NewInterview::try_from(request)?;

    if get_candidate(&state.db, interview.candidate_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Candidate {} not found",
            interview.candidate_id
        )));
    }

    let row = insert_interview(&state.db, &interview).await?;
    info!("Scheduled interview {} for candidate {}", row.id, row.candidate_id);
    Ok(Json(row))
}

/// GET /api/recruitment/candidate-summary/:candidate_id
pub async fn handle_candidate_summary(
    State(state): State<AppState>,
    Path(candidate_id): Path<i32>,
) -> Result<Json<CandidateSummaryResponse>, AppError> {
    let candidate = get_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let assessments = list_assessments(&state.db, Some(candidate_id)).await?;
    let interviews = list_interviews(&state.db, Some(candidate_id)).await?;

    let summary =
        generate_candidate_summary(&candidate, &assessments, &interviews, &state.llm).await?;
    Ok(Json(CandidateSummaryResponse { summary }))
}

/// GET /api/candidates?jobPostingId=
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(filter): Query<CandidateFilter>,
) -> Result<Json<Vec<CandidateRow>>, AppError> {
    Ok(Json(list_candidates(&state.db, filter.job_posting_id).await?))
}

/// GET /api/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<InterviewRow>>, AppError> {
    Ok(Json(list_interviews(&state.db, None).await?))
}
