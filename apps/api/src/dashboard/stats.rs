//! Headline counters for the HR dashboard.
//!
//! Counting happens in Postgres. The UTC day and month windows are computed
//! here so their boundaries can be tested without a database.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;

const ACTIVE_CANDIDATE_STATUSES: [&str; 2] = ["applied", "screening"];
const SCHEDULED_INTERVIEW_STATUS: &str = "scheduled";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_candidates: i64,
    pub scheduled_interviews: i64,
    pub new_hires: i64,
    pub ai_queries: i64,
}

/// Half-open `[start, end)` UTC windows around a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    pub day_start: DateTime<Utc>,
    pub day_end: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
    pub month_end: DateTime<Utc>,
}

impl StatsWindow {
    /// `None` only at the edge of chrono's date range.
    pub fn at(now: DateTime<Utc>) -> Option<Self> {
        let today = now.date_naive();
        let first_of_month = today.with_day(1)?;

        Some(Self {
            day_start: midnight(today)?,
            day_end: midnight(today.succ_opt()?)?,
            month_start: midnight(first_of_month)?,
            month_end: midnight(first_of_month.checked_add_months(Months::new(1))?)?,
        })
    }
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// New hires count start dates in the window's month; AI queries count chat
/// messages created on the window's day.
pub async fn load_stats(pool: &PgPool, window: &StatsWindow) -> Result<DashboardStats, sqlx::Error> {
    let active_candidates =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM candidates WHERE status = ANY($1)")
            .bind(&ACTIVE_CANDIDATE_STATUSES[..])
            .fetch_one(pool)
            .await?;

    let scheduled_interviews =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM interviews WHERE status = $1")
            .bind(SCHEDULED_INTERVIEW_STATUS)
            .fetch_one(pool)
            .await?;

    let new_hires = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM employees WHERE start_date >= $1 AND start_date < $2",
    )
    .bind(window.month_start)
    .bind(window.month_end)
    .fetch_one(pool)
    .await?;

    let ai_queries = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM chat_messages WHERE created_at >= $1 AND created_at < $2",
    )
    .bind(window.day_start)
    .bind(window.day_end)
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        active_candidates,
        scheduled_interviews,
        new_hires,
        ai_queries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_window_mid_month() {
        let window = StatsWindow::at(at(2026, 10, 19, 14, 30)).unwrap();
        assert_eq!(window.day_start, at(2026, 10, 19, 0, 0));
        assert_eq!(window.day_end, at(2026, 10, 20, 0, 0));
        assert_eq!(window.month_start, at(2026, 10, 1, 0, 0));
        assert_eq!(window.month_end, at(2026, 11, 1, 0, 0));
    }

    #[test]
    fn test_window_rolls_over_year_end() {
        let window = StatsWindow::at(at(2026, 12, 31, 23, 59)).unwrap();
        assert_eq!(window.day_end, at(2027, 1, 1, 0, 0));
        assert_eq!(window.month_start, at(2026, 12, 1, 0, 0));
        assert_eq!(window.month_end, at(2027, 1, 1, 0, 0));
    }

    #[test]
    fn test_window_first_instant_of_month() {
        let now = at(2026, 3, 1, 0, 0);
        let window = StatsWindow::at(now).unwrap();
        assert_eq!(window.day_start, now);
        assert_eq!(window.month_start, now);
        assert_eq!(window.month_end, at(2026, 4, 1, 0, 0));
    }

    #[test]
    fn test_window_leap_february() {
        let window = StatsWindow::at(at(2028, 2, 29, 12, 0)).unwrap();
        assert_eq!(window.day_end, at(2028, 3, 1, 0, 0));
        assert_eq!(window.month_end, at(2028, 3, 1, 0, 0));
    }

    #[test]
    fn test_serialises_camel_case() {
        let value = serde_json::to_value(DashboardStats {
            active_candidates: 1,
            scheduled_interviews: 2,
            new_hires: 3,
            ai_queries: 4,
        })
        .unwrap();
        assert_eq!(value["activeCandidates"], 1);
        assert_eq!(value["scheduledInterviews"], 2);
        assert_eq!(value["newHires"], 3);
        assert_eq!(value["aiQueries"], 4);
    }
}
