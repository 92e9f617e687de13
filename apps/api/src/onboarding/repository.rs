use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::onboarding::{EmployeeRow, OnboardingTaskRow};
use crate::onboarding::tasks::{TaskUpdate, DEFAULT_TASKS};

#[derive(Debug)]
pub struct NewEmployee {
    pub candidate_id: Option<i32>,
    pub user_id: Option<String>,
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub start_date: DateTime<Utc>,
    pub status: String,
}

/// Inserts the employee and the default checklist in one transaction.
pub async fn start_onboarding(
    pool: &PgPool,
    employee: &NewEmployee,
) -> Result<(EmployeeRow, Vec<OnboardingTaskRow>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, EmployeeRow>(
        r#"
        INSERT INTO employees
            (candidate_id, user_id, name, email, department, position, start_date, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(employee.candidate_id)
    .bind(&employee.user_id)
    .bind(&employee.name)
    .bind(&employee.email)
    .bind(&employee.department)
    .bind(&employee.position)
    .bind(employee.start_date)
    .bind(&employee.status)
    .fetch_one(&mut *tx)
    .await?;

    let mut tasks = Vec::with_capacity(DEFAULT_TASKS.len());
    for template in DEFAULT_TASKS {
        let task = sqlx::query_as::<_, OnboardingTaskRow>(
            r#"
            INSERT INTO onboarding_tasks (employee_id, task_type, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(template.task_type)
        .bind(template.title)
        .bind(template.description)
        .fetch_one(&mut *tx)
        .await?;
        tasks.push(task);
    }

    tx.commit().await?;
    Ok((row, tasks))
}

pub async fn list_employees(pool: &PgPool) -> Result<Vec<EmployeeRow>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Newest first, optionally for one employee.
pub async fn list_tasks(
    pool: &PgPool,
    employee_id: Option<i32>,
) -> Result<Vec<OnboardingTaskRow>, sqlx::Error> {
    sqlx::query_as::<_, OnboardingTaskRow>(
        r#"
        SELECT * FROM onboarding_tasks
        WHERE ($1::int IS NULL OR employee_id = $1)
        ORDER BY created_at DESC, id ASC
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await
}

pub async fn update_task(
    pool: &PgPool,
    id: i32,
    update: &TaskUpdate,
) -> Result<Option<OnboardingTaskRow>, sqlx::Error> {
    sqlx::query_as::<_, OnboardingTaskRow>(
        r#"
        UPDATE onboarding_tasks
        SET status = COALESCE($2, status),
            title = COALESCE($3, title),
            description = COALESCE($4, description),
            completed_at = CASE WHEN $6 THEN NULL ELSE COALESCE($5, completed_at) END
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&update.status)
    .bind(&update.title)
    .bind(&update.description)
    .bind(update.completed_at)
    .bind(update.clear_completed_at)
    .fetch_optional(pool)
    .await
}
