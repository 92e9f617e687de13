//! Narrative candidate summaries for the hiring panel.

use crate::errors::AppError;
use crate::llm_client::prompts::pretty_json;
use crate::llm_client::LlmClient;
use crate::models::evaluation::AssessmentRow;
use crate::models::recruitment::{CandidateRow, InterviewRow};
use crate::recruitment::prompts::{SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};

/// The resume text is left out: the screening notes already condense it and
/// it can dwarf the rest of the prompt.
pub fn build_summary_prompt(
    candidate: &CandidateRow,
    assessments: &[AssessmentRow],
    interviews: &[InterviewRow],
) -> String {
    let mut profile = candidate.clone();
    profile.resume_text = None;

    SUMMARY_PROMPT_TEMPLATE
        .replace("{candidate}", &pretty_json(&profile))
        .replace("{assessments}", &pretty_json(&assessments))
        .replace("{interviews}", &pretty_json(&interviews))
}

pub async fn generate_candidate_summary(
    candidate: &CandidateRow,
    assessments: &[AssessmentRow],
    interviews: &[InterviewRow],
    llm: &LlmClient,
) -> Result<String, AppError> {
    llm.call_text(
        &build_summary_prompt(candidate, assessments, interviews),
        SUMMARY_SYSTEM,
    )
    .await
    .map_err(|e| AppError::Llm(format!("Candidate summary failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candidate() -> CandidateRow {
        CandidateRow {
            id: 3,
            name: "Priya Natarajan".into(),
            email: "priya@example.com".into(),
            phone: None,
            resume_url: Some("resumes/abc/cv.pdf".into()),
            resume_text: Some("VERY LONG RESUME BODY".into()),
            job_posting_id: Some(1),
            status: "screening".into(),
            skill_match_score: Some(88),
            tags: vec!["Rust".into(), "analytical".into()],
            notes: Some("Strong match".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_prompt_includes_profile_without_resume_body() {
        let prompt = build_summary_prompt(&candidate(), &[], &[]);
        assert!(prompt.contains("Priya Natarajan"));
        assert!(prompt.contains("\"skillMatchScore\": 88"));
        assert!(!prompt.contains("VERY LONG RESUME BODY"));
        assert!(prompt.contains("ASSESSMENTS:\n[]"));
    }
}
