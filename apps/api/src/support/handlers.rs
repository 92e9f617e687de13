//! Axum route handlers for support documents and reminders.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::support::{DocumentRow, ReminderRow};
use crate::state::AppState;
use crate::support::repository::{
    insert_document, insert_reminder, list_documents, list_reminders, NewDocument, NewReminder,
};
use crate::validation::{optional, required};

const DEFAULT_REMINDER_STATUS: &str = "active";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub file_url: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<CreateDocumentRequest> for NewDocument {
    type Error = AppError;

    fn try_from(req: CreateDocumentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required(req.title, "title")?,
            category: required(req.category, "category")?,
            file_url: required(req.file_url, "fileUrl")?,
            description: optional(req.description),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentFilter {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderRequest {
    pub employee_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl TryFrom<CreateReminderRequest> for NewReminder {
    type Error = AppError;

    fn try_from(req: CreateReminderRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: req.employee_id,
            kind: required(req.kind, "type")?,
            title: required(req.title, "title")?,
            description: optional(req.description),
            due_date: req
                .due_date
                .ok_or_else(|| AppError::Validation("dueDate is required".to_string()))?,
            status: optional(req.status).unwrap_or_else(|| DEFAULT_REMINDER_STATUS.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderFilter {
    pub employee_id: Option<i32>,
}

/// GET /api/support/documents?category=
pub async fn handle_list_documents(
    State(state): State<AppState>,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<Vec<DocumentRow>>, AppError> {
    let category = optional(filter.category);
    Ok(Json(list_documents(&state.db, category.as_deref()).await?))
}

/// POST /api/support/documents
pub async fn handle_create_document(
    State(state): State<AppState>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<Json<DocumentRow>, AppError> {
    let doc = NewDocument::try_from(request)?;
    Ok(Json(insert_document(&state.db, &doc).await?))
}

/// GET /api/support/reminders?employeeId=
pub async fn handle_list_reminders(
    State(state): State<AppState>,
    Query(filter): Query<ReminderFilter>,
) -> Result<Json<Vec<ReminderRow>>, AppError> {
    Ok(Json(list_reminders(&state.db, filter.employee_id).await?))
}

/// POST /api/support/reminders
pub async fn handle_create_reminder(
    State(state): State<AppState>,
    Json(request): Json<CreateReminderRequest>,
) -> Result<Json<ReminderRow>, AppError> {
    let reminder = NewReminder::try_from(request)?;
    Ok(Json(insert_reminder(&state.db, &reminder).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reminder_reads_type_field() {
        let req: CreateReminderRequest = serde_json::from_value(json!({
            "employeeId": 3,
            "type": "document_expiry",
            "title": "Renew work permit",
            "dueDate": "2026-12-01T00:00:00Z"
        }))
        .unwrap();
        let reminder = NewReminder::try_from(req).unwrap();
        assert_eq!(reminder.kind, "document_expiry");
        assert_eq!(reminder.status, "active");
        assert_eq!(reminder.employee_id, Some(3));
    }

    #[test]
    fn test_reminder_requires_due_date() {
        let req: CreateReminderRequest =
            serde_json::from_value(json!({ "type": "review", "title": "Probation review" }))
                .unwrap();
        assert!(matches!(
            NewReminder::try_from(req),
            Err(AppError::Validation(msg)) if msg == "dueDate is required"
        ));
    }

    #[test]
    fn test_document_requires_file_url() {
        let req: CreateDocumentRequest =
            serde_json::from_value(json!({ "title": "Leave policy", "category": "policy" }))
                .unwrap();
        assert!(matches!(
            NewDocument::try_from(req),
            Err(AppError::Validation(msg)) if msg == "fileUrl is required"
        ));
    }
}
