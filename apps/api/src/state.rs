use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::chat::relay::ChatRelay;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Support-chat relay. Holds the live connection registry.
    pub relay: ChatRelay,
}
