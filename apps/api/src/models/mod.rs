pub mod evaluation;
pub mod onboarding;
pub mod recruitment;
pub mod support;

/// The seeded HR manager that owns postings and interviews when the caller
/// does not name one. There is no authentication layer.
pub const DEFAULT_HR_USER_ID: &str = "hr-manager";
