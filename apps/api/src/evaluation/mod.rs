// Candidate evaluation: assessments sent to candidates, AI scoring of their
// responses and behavioural analysis.

pub mod handlers;
pub mod prompts;
pub mod repository;
pub mod scoring;
