mod chat;
mod config;
mod dashboard;
mod db;
mod errors;
mod evaluation;
mod llm_client;
mod models;
mod onboarding;
mod recruitment;
mod routes;
mod state;
mod support;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::registry::ConnectionRegistry;
use crate::chat::relay::ChatRelay;
use crate::chat::responder::HrAssistant;
use crate::chat::store::PgExchangeStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("hr_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HR API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (migrations run inside create_pool)
    let db = create_pool(&config.database_url).await?;

    // S3 / MinIO for resume uploads
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Support chat: one registry shared by every socket and the relay.
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = ChatRelay::new(
        registry,
        Arc::new(HrAssistant::new(llm.clone())),
        Arc::new(PgExchangeStore::new(db.clone())),
        config.responder_timeout,
    );
    info!(
        "Chat relay ready (responder timeout: {}s)",
        config.responder_timeout.as_secs()
    );

    let state = AppState {
        db,
        s3,
        llm,
        config: config.clone(),
        relay,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "hr-api-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
