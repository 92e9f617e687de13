use anyhow::anyhow;
use axum::{extract::State, Json};
use chrono::Utc;

use crate::dashboard::stats::{load_stats, DashboardStats, StatsWindow};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/dashboard/stats
pub async fn handle_dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let window = StatsWindow::at(Utc::now())
        .ok_or_else(|| AppError::Internal(anyhow!("current date outside supported range")))?;
    Ok(Json(load_stats(&state.db, &window).await?))
}
