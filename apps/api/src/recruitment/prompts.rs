// LLM prompt constants for the recruitment module.

pub const JD_WRITER_PERSONA: &str =
    "You are an expert HR professional who creates compelling job descriptions that attract top talent.";

/// Replace `{title}`, `{department}`, `{experience_level}`, `{skills}` and `{culture}`.
pub const JD_PROMPT_TEMPLATE: &str = r#"Create a comprehensive job description for the following role:

Title: {title}
Department: {department}
Experience Level: {experience_level}
Required Skills: {skills}
Company Culture & Benefits: {culture}

Return a JSON object with this EXACT schema:
{
  "description": "A compelling job description with role overview, key responsibilities, and what the candidate will work on",
  "requirements": "Detailed requirements including skills, experience, education, and qualifications",
  "benefits": "Benefits package and company culture highlights that will attract top talent"
}

Make the content professional, engaging, and tailored to attract qualified candidates for this specific role."#;

pub const SCREENER_PERSONA: &str = "You are an expert talent acquisition specialist. \
    Analyze resumes objectively and provide detailed assessments.";

/// Replace `{resume_text}` and `{requirements}`.
pub const SCREENING_PROMPT_TEMPLATE: &str = r#"Analyze this resume against the job requirements and provide a detailed assessment.

RESUME:
{resume_text}

JOB REQUIREMENTS:
{requirements}

Return a JSON object with this EXACT schema:
{
  "score": 85,
  "matchedSkills": ["skill1", "skill2"],
  "missingSkills": ["skill3", "skill4"],
  "summary": "Brief assessment summary explaining the score and key findings"
}

score is an integer from 0 to 100 measuring how well the candidate matches the requirements."#;

pub const SUMMARY_SYSTEM: &str =
    "You are an expert HR analyst who creates clear, actionable candidate summaries for hiring panels.";

/// Replace `{candidate}`, `{assessments}` and `{interviews}`.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Generate a comprehensive candidate summary for the hiring panel.

CANDIDATE PROFILE:
{candidate}

ASSESSMENTS:
{assessments}

INTERVIEWS:
{interviews}

Write a concise but comprehensive summary that highlights:
- Key strengths and qualifications
- Assessment results and behavioral insights
- Interview feedback and performance
- Overall recommendation and fit for the role

Keep it professional and actionable for hiring decision-makers."#;
