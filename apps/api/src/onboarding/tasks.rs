//! The onboarding checklist every new employee starts with, and task status rules.

use chrono::{DateTime, Utc};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskTemplate {
    pub task_type: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const DEFAULT_TASKS: [TaskTemplate; 5] = [
    TaskTemplate {
        task_type: "welcome_kit",
        title: "Send Welcome Kit",
        description: "Email welcome package and company information",
    },
    TaskTemplate {
        task_type: "system_setup",
        title: "System Account Setup",
        description: "Create email, Slack, and HRMS accounts",
    },
    TaskTemplate {
        task_type: "documentation",
        title: "Complete Documentation",
        description: "Fill out required HR forms and policies",
    },
    TaskTemplate {
        task_type: "orientation",
        title: "Schedule Orientation",
        description: "Attend company orientation and team introductions",
    },
    TaskTemplate {
        task_type: "equipment",
        title: "Equipment Setup",
        description: "Receive and configure work equipment",
    },
];

pub const TASK_STATUSES: [&str; 3] = ["pending", "in_progress", "completed"];
pub const STATUS_COMPLETED: &str = "completed";

/// A validated partial update. `None` leaves the column as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub status: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Set when the task leaves `completed`; wins over `completed_at`.
    pub clear_completed_at: bool,
}

impl TaskUpdate {
    /// Validates the status and stamps `completed_at` when a task is marked
    /// completed without one. Any other status clears the stamp.
    pub fn normalise(mut self, now: DateTime<Utc>) -> Result<Self, AppError> {
        if self.status.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.completed_at.is_none()
        {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        if let Some(status) = self.status.as_deref() {
            if !TASK_STATUSES.contains(&status) {
                return Err(AppError::Validation(format!(
                    "status must be one of: {}",
                    TASK_STATUSES.join(", ")
                )));
            }
            if status == STATUS_COMPLETED {
                self.completed_at.get_or_insert(now);
            } else {
                self.completed_at = None;
                self.clear_completed_at = true;
            }
        }

        Ok(self)
    }
}
