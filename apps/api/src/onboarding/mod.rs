// Onboarding: new employees and their checklist of onboarding tasks.

pub mod handlers;
pub mod repository;
pub mod tasks;
