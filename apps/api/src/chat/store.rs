//! Durable record of support-chat exchanges.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::support::ChatMessageRow;

/// Category written for every exchange that goes through the relay.
pub const SUPPORT_KIND: &str = "support";

/// An exchange ready to be recorded: the question and the answer it got.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExchange {
    /// `None` for anonymous connections.
    pub user_id: Option<String>,
    pub message: String,
    pub response: String,
    pub kind: String,
}

impl NewExchange {
    pub fn support(user_id: Option<String>, message: String, response: String) -> Self {
        Self {
            user_id,
            message,
            response,
            kind: SUPPORT_KIND.to_string(),
        }
    }
}

/// Append-only sink for exchanges.
#[async_trait]
pub trait ExchangeStore: Send + Sync {
    async fn record_exchange(&self, exchange: NewExchange) -> Result<ChatMessageRow>;
}

pub struct PgExchangeStore {
    pool: PgPool,
}

impl PgExchangeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExchangeStore for PgExchangeStore {
    async fn record_exchange(&self, exchange: NewExchange) -> Result<ChatMessageRow> {
        let row = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            INSERT INTO chat_messages (user_id, message, response, type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(exchange.user_id)
        .bind(exchange.message)
        .bind(exchange.response)
        .bind(exchange.kind)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Chat history, newest first, optionally for one user.
pub async fn list_messages(
    pool: &PgPool,
    user_id: Option<&str>,
) -> Result<Vec<ChatMessageRow>, sqlx::Error> {
    sqlx::query_as::<_, ChatMessageRow>(
        r#"
        SELECT * FROM chat_messages
        WHERE ($1::varchar IS NULL OR user_id = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
