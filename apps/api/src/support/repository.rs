use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::support::{DocumentRow, ReminderRow};

#[derive(Debug)]
pub struct NewDocument {
    pub title: String,
    pub category: String,
    pub file_url: String,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct NewReminder {
    pub employee_id: Option<i32>,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub status: String,
}

pub async fn insert_document(pool: &PgPool, doc: &NewDocument) -> Result<DocumentRow, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>(
        r#"
        INSERT INTO documents (title, category, file_url, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&doc.title)
    .bind(&doc.category)
    .bind(&doc.file_url)
    .bind(&doc.description)
    .fetch_one(pool)
    .await
}

pub async fn list_documents(
    pool: &PgPool,
    category: Option<&str>,
) -> Result<Vec<DocumentRow>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT * FROM documents
        WHERE ($1::text IS NULL OR category = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn insert_reminder(pool: &PgPool, reminder: &NewReminder) -> Result<ReminderRow, sqlx::Error> {
    sqlx::query_as::<_, ReminderRow>(
        r#"
        INSERT INTO reminders (employee_id, type, title, description, due_date, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(reminder.employee_id)
    .bind(&reminder.kind)
    .bind(&reminder.title)
    .bind(&reminder.description)
    .bind(reminder.due_date)
    .bind(&reminder.status)
    .fetch_one(pool)
    .await
}

/// Latest due date first.
pub async fn list_reminders(
    pool: &PgPool,
    employee_id: Option<i32>,
) -> Result<Vec<ReminderRow>, sqlx::Error> {
    sqlx::query_as::<_, ReminderRow>(
        r#"
        SELECT * FROM reminders
        WHERE ($1::int IS NULL OR employee_id = $1)
        ORDER BY due_date DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await
}
