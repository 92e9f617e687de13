//! Resume screening against a posting's requirements.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;
use crate::recruitment::prompts::{SCREENER_PERSONA, SCREENING_PROMPT_TEMPLATE};

/// Screening verdict as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningResult {
    /// 0 – 100.
    pub score: i32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: String,
}

/// Model output before normalisation; every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawScreening {
    score: Option<f64>,
    matched_skills: Vec<String>,
    missing_skills: Vec<String>,
    summary: String,
}

impl From<RawScreening> for ScreeningResult {
    fn from(raw: RawScreening) -> Self {
        ScreeningResult {
            score: clamp_score(raw.score.unwrap_or(0.0)),
            matched_skills: raw.matched_skills,
            missing_skills: raw.missing_skills,
            summary: raw.summary,
        }
    }
}

/// Rounds a model-reported score into 0 – 100.
pub fn clamp_score(score: f64) -> i32 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as i32
}

pub fn build_screening_prompt(resume_text: &str, requirements: &str) -> String {
    SCREENING_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{requirements}", requirements)
}

pub async fn screen_resume(
    resume_text: &str,
    requirements: &str,
    llm: &LlmClient,
) -> Result<ScreeningResult, AppError> {
    let raw: RawScreening = llm
        .call_json(
            &build_screening_prompt(resume_text, requirements),
            &json_system(SCREENER_PERSONA),
        )
        .await
        .map_err(|e| AppError::Llm(format!("Resume screening failed: {e}")))?;
    Ok(raw.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(140.0), 100);
        assert_eq!(clamp_score(-3.0), 0);
        assert_eq!(clamp_score(72.6), 73);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn test_raw_screening_normalises() {
        let raw: RawScreening = serde_json::from_str(
            r#"{"score": 104.2, "matchedSkills": ["Rust"], "summary": "Strong systems background"}"#,
        )
        .unwrap();
        let result = ScreeningResult::from(raw);
        assert_eq!(result.score, 100);
        assert_eq!(result.matched_skills, vec!["Rust"]);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_raw_screening_null_score_is_zero() {
        let raw: RawScreening = serde_json::from_str(r#"{"score": null}"#).unwrap();
        assert_eq!(ScreeningResult::from(raw).score, 0);
    }

    #[test]
    fn test_screening_result_serializes_camel_case() {
        let json = serde_json::to_value(ScreeningResult {
            score: 80,
            matched_skills: vec!["SQL".into()],
            missing_skills: vec!["Kafka".into()],
            summary: String::new(),
        })
        .unwrap();
        assert_eq!(json["matchedSkills"][0], "SQL");
        assert_eq!(json["missingSkills"][0], "Kafka");
    }

    #[test]
    fn test_screening_prompt_embeds_both_sides() {
        let prompt = build_screening_prompt("Ten years of Go", "5+ years backend");
        assert!(prompt.contains("RESUME:\nTen years of Go"));
        assert!(prompt.contains("JOB REQUIREMENTS:\n5+ years backend"));
    }
}
