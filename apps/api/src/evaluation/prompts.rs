// LLM prompt constants for the evaluation module.

pub const EVALUATOR_PERSONA: &str = "You are an expert assessment evaluator. \
    Score responses objectively and provide constructive feedback.";

/// Replace `{questions}` and `{responses}`.
pub const SCORING_PROMPT_TEMPLATE: &str = r#"Score this assessment based on the questions and responses.

QUESTIONS:
{questions}

RESPONSES:
{responses}

Return a JSON object with this EXACT schema:
{
  "score": 85,
  "feedback": ["feedback1", "feedback2", "feedback3"]
}

score is an integer from 0 to 100 based on correctness, quality, and completeness of responses."#;

pub const BEHAVIORAL_PERSONA: &str = "You are an expert behavioral psychologist specializing in candidate assessment. \
    Provide objective analysis based on response patterns.";

/// Replace `{responses}` and `{response_time}`.
pub const BEHAVIORAL_PROMPT_TEMPLATE: &str = r#"Analyze these assessment responses for behavioral cues and personality traits.

RESPONSES:
{responses}

AVERAGE RESPONSE TIME: {response_time} seconds

Return a JSON object with this EXACT schema:
{
  "traits": ["trait1", "trait2", "trait3"],
  "confidence": 0.85,
  "summary": "Brief analysis of the candidate's behavioral patterns and personality traits"
}

Focus on communication style, problem-solving approach, teamwork indicators, and decision-making patterns.
confidence is a number from 0 to 1."#;
