// Hiring & recruitment: job postings, AI job descriptions, resume screening,
// candidate ranking, interviews and hiring-panel summaries.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod job_description;
pub mod prompts;
pub mod repository;
pub mod resume_upload;
pub mod screening;
pub mod summary;
