//! AI job description drafting.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;
use crate::recruitment::prompts::{JD_PROMPT_TEMPLATE, JD_WRITER_PERSONA};
use crate::validation::{optional, required};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateJdRequest {
    pub title: Option<String>,
    pub department: Option<String>,
    pub experience_level: Option<String>,
    /// Free text, usually comma separated.
    pub skills: Option<String>,
    pub culture: Option<String>,
}

/// A validated drafting brief.
#[derive(Debug, Clone, PartialEq)]
pub struct JdBrief {
    pub title: String,
    pub department: String,
    pub experience_level: String,
    pub skills: String,
    pub culture: String,
}

impl TryFrom<GenerateJdRequest> for JdBrief {
    type Error = AppError;

    fn try_from(req: GenerateJdRequest) -> Result<Self, Self::Error> {
        Ok(JdBrief {
            title: required(req.title, "title")?,
            department: required(req.department, "department")?,
            experience_level: required(req.experience_level, "experienceLevel")?,
            skills: required(req.skills, "skills")?,
            culture: optional(req.culture).unwrap_or_default(),
        })
    }
}

/// Draft sections. Sections the model omits come back empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedJobDescription {
    pub description: String,
    pub requirements: String,
    pub benefits: String,
}

pub fn build_jd_prompt(brief: &JdBrief) -> String {
    JD_PROMPT_TEMPLATE
        .replace("{title}", &brief.title)
        .replace("{department}", &brief.department)
        .replace("{experience_level}", &brief.experience_level)
        .replace("{skills}", &brief.skills)
        .replace("{culture}", &brief.culture)
}

pub async fn generate_job_description(
    brief: &JdBrief,
    llm: &LlmClient,
) -> Result<GeneratedJobDescription, AppError> {
    llm.call_json::<GeneratedJobDescription>(&build_jd_prompt(brief), &json_system(JD_WRITER_PERSONA))
        .await
        .map_err(|e| AppError::Llm(format!("Job description generation failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateJdRequest {
        GenerateJdRequest {
            title: Some("Senior Backend Engineer".into()),
            department: Some("Engineering".into()),
            experience_level: Some("Senior".into()),
            skills: Some("Rust, PostgreSQL".into()),
            culture: None,
        }
    }

    #[test]
    fn test_brief_defaults_culture_to_empty() {
        let brief = JdBrief::try_from(request()).unwrap();
        assert_eq!(brief.culture, "");
        assert_eq!(brief.skills, "Rust, PostgreSQL");
    }

    #[test]
    fn test_brief_requires_skills() {
        let mut req = request();
        req.skills = Some("  ".into());
        assert!(matches!(JdBrief::try_from(req), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let brief = JdBrief::try_from(request()).unwrap();
        let prompt = build_jd_prompt(&brief);
        assert!(prompt.contains("Title: Senior Backend Engineer"));
        assert!(prompt.contains("Required Skills: Rust, PostgreSQL"));
        for placeholder in ["{title}", "{department}", "{experience_level}", "{skills}", "{culture}"] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
    }

    #[test]
    fn test_generated_sections_default_when_missing() {
        let parsed: GeneratedJobDescription =
            serde_json::from_str(r#"{"description": "Build things"}"#).unwrap();
        assert_eq!(parsed.description, "Build things");
        assert_eq!(parsed.requirements, "");
        assert_eq!(parsed.benefits, "");
    }
}
