//! AI scoring and behavioural analysis of assessment responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::evaluation::prompts::{
    BEHAVIORAL_PERSONA, BEHAVIORAL_PROMPT_TEMPLATE, EVALUATOR_PERSONA, SCORING_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{json_system, pretty_json};
use crate::llm_client::LlmClient;
use crate::recruitment::screening::clamp_score;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    /// 0 – 100.
    pub score: i32,
    pub feedback: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehavioralAnalysis {
    pub traits: Vec<String>,
    /// 0.0 – 1.0.
    pub confidence: f64,
    pub summary: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawScoring {
    score: Option<f64>,
    feedback: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBehavioral {
    traits: Vec<String>,
    confidence: Option<f64>,
    summary: String,
}

impl From<RawScoring> for ScoringResult {
    fn from(raw: RawScoring) -> Self {
        ScoringResult {
            score: clamp_score(raw.score.unwrap_or(0.0)),
            feedback: raw.feedback,
        }
    }
}

impl From<RawBehavioral> for BehavioralAnalysis {
    fn from(raw: RawBehavioral) -> Self {
        let confidence = raw.confidence.unwrap_or(0.0);
        BehavioralAnalysis {
            traits: dedup_traits(raw.traits),
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
            summary: raw.summary,
        }
    }
}

/// Trims traits and drops blanks and case-insensitive repeats, keeping order.
fn dedup_traits(traits: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    traits
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

pub fn build_scoring_prompt(questions: &Value, responses: &Value) -> String {
    SCORING_PROMPT_TEMPLATE
        .replace("{questions}", &pretty_json(questions))
        .replace("{responses}", &pretty_json(responses))
}

pub fn build_behavioral_prompt(responses: &Value, response_time_secs: i32) -> String {
    BEHAVIORAL_PROMPT_TEMPLATE
        .replace("{responses}", &pretty_json(responses))
        .replace("{response_time}", &response_time_secs.to_string())
}

pub async fn score_assessment(
    questions: &Value,
    responses: &Value,
    llm: &LlmClient,
) -> Result<ScoringResult, AppError> {
    let raw: RawScoring = llm
        .call_json(
            &build_scoring_prompt(questions, responses),
            &json_system(EVALUATOR_PERSONA),
        )
        .await
        .map_err(|e| AppError::Llm(format!("Assessment scoring failed: {e}")))?;
    Ok(raw.into())
}

pub async fn analyze_behavioral_cues(
    responses: &Value,
    response_time_secs: i32,
    llm: &LlmClient,
) -> Result<BehavioralAnalysis, AppError> {
    let raw: RawBehavioral = llm
        .call_json(
            &build_behavioral_prompt(responses, response_time_secs),
            &json_system(BEHAVIORAL_PERSONA),
        )
        .await
        .map_err(|e| AppError::Llm(format!("Behavioral analysis failed: {e}")))?;
    Ok(raw.into())
}
