//! Axum route handlers for the Onboarding API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::onboarding::{EmployeeRow, OnboardingTaskRow};
use crate::onboarding::repository::{
    list_employees, list_tasks, start_onboarding, update_task, NewEmployee,
};
use crate::onboarding::tasks::TaskUpdate;
use crate::state::AppState;
use crate::validation::{optional, required};

const DEFAULT_EMPLOYEE_STATUS: &str = "onboarding";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOnboardingRequest {
    pub candidate_id: Option<i32>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl TryFrom<StartOnboardingRequest> for NewEmployee {
    type Error = AppError;

    fn try_from(req: StartOnboardingRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            candidate_id: req.candidate_id,
            user_id: optional(req.user_id),
            name: required(req.name, "name")?,
            email: required(req.email, "email")?,
            department: required(req.department, "department")?,
            position: required(req.position, "position")?,
            start_date: req
                .start_date
                .ok_or_else(|| AppError::Validation("startDate is required".to_string()))?,
            status: optional(req.status).unwrap_or_else(|| DEFAULT_EMPLOYEE_STATUS.to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StartOnboardingResponse {
    pub employee: EmployeeRow,
    pub tasks: Vec<OnboardingTaskRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub employee_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub status: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<UpdateTaskRequest> for TaskUpdate {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            status: optional(req.status),
            title: optional(req.title),
            description: optional(req.description),
            completed_at: req.completed_at,
            clear_completed_at: false,
        }
    }
}

/// POST /api/onboarding/start
pub async fn handle_start_onboarding(
    State(state): State<AppState>,
    Json(request): Json<StartOnboardingRequest>,
) -> Result<Json<StartOnboardingResponse>, AppError> {
    let employee = NewEmployee::try_from(request)?;
    let (employee, tasks) = start_onboarding(&state.db, &employee).await?;
    info!(
        "Started onboarding for employee {} with {} tasks",
        employee.id,
        tasks.len()
    );
    Ok(Json(StartOnboardingResponse { employee, tasks }))
}

/// GET /api/onboarding/tasks?employeeId=
pub async fn handle_list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<OnboardingTaskRow>>, AppError> {
    Ok(Json(list_tasks(&state.db, filter.employee_id).await?))
}

/// PATCH /api/onboarding/tasks/:id
pub async fn handle_update_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<OnboardingTaskRow>, AppError> {
    let update = TaskUpdate::from(request).normalise(Utc::now())?;
    let task = update_task(&state.db, id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))?;
    Ok(Json(task))
}

/// GET /api/onboarding/employees
pub async fn handle_list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeRow>>, AppError> {
    Ok(Json(list_employees(&state.db).await?))
}
