pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::dashboard::handlers as dashboard;
use crate::evaluation::handlers as evaluation;
use crate::onboarding::handlers as onboarding;
use crate::recruitment::handlers as recruitment;
use crate::state::AppState;
use crate::support::handlers as support;

/// Headroom over the file limit for the other multipart fields and boundaries.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Support chat
        .route("/ws", get(chat::handle_ws_upgrade))
        .route("/api/support/faq", post(chat::handle_faq))
        .route("/api/support/chat-messages", get(chat::handle_chat_messages))
        // Recruitment
        .route(
            "/api/recruitment/generate-jd",
            post(recruitment::handle_generate_jd),
        )
        .route(
            "/api/recruitment/job-postings",
            get(recruitment::handle_list_job_postings).post(recruitment::handle_create_job_posting),
        )
        .route(
            "/api/recruitment/job-postings/:id",
            get(recruitment::handle_get_job_posting),
        )
        .route(
            "/api/recruitment/screen-resume",
            post(recruitment::handle_screen_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/recruitment/rank-candidates/:job_posting_id",
            get(recruitment::handle_rank_candidates),
        )
        .route(
            "/api/recruitment/schedule-interview",
            post(recruitment::handle_schedule_interview),
        )
        .route(
            "/api/recruitment/candidate-summary/:candidate_id",
            get(recruitment::handle_candidate_summary),
        )
        .route("/api/candidates", get(recruitment::handle_list_candidates))
        .route("/api/interviews", get(recruitment::handle_list_interviews))
        // Evaluation
        .route("/api/evaluation/send-test", post(evaluation::handle_send_test))
        .route("/api/evaluation/score-test", post(evaluation::handle_score_test))
        .route(
            "/api/evaluation/assessments",
            get(evaluation::handle_list_assessments),
        )
        // Onboarding
        .route("/api/onboarding/start", post(onboarding::handle_start_onboarding))
        .route("/api/onboarding/tasks", get(onboarding::handle_list_tasks))
        .route("/api/onboarding/tasks/:id", patch(onboarding::handle_update_task))
        .route("/api/onboarding/employees", get(onboarding::handle_list_employees))
        // Support
        .route(
            "/api/support/documents",
            get(support::handle_list_documents).post(support::handle_create_document),
        )
        .route(
            "/api/support/reminders",
            get(support::handle_list_reminders).post(support::handle_create_reminder),
        )
        // Dashboard
        .route("/api/dashboard/stats", get(dashboard::handle_dashboard_stats))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use aws_sdk_s3::config::{BehaviorVersion, Region};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use sqlx::PgPool;
    use tower::ServiceExt; // oneshot

    use super::*;
    use crate::chat::registry::ConnectionRegistry;
    use crate::chat::relay::ChatRelay;
    use crate::chat::responder::HrAssistant;
    use crate::chat::store::PgExchangeStore;
    use crate::config::Config;
    use crate::llm_client::LlmClient;

    /// State whose pool and clients never connect; only requests rejected
    /// before any I/O are exercised here.
    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://hr:hr@localhost:5432/hr".into(),
            s3_bucket: "resumes".into(),
            s3_endpoint: "http://localhost:9000".into(),
            aws_access_key_id: "test".into(),
            aws_secret_access_key: "test".into(),
            anthropic_api_key: "test".into(),
            port: 8080,
            rust_log: "info".into(),
            responder_timeout: Duration::from_secs(5),
            max_upload_bytes: 1024,
        };
        let db = PgPool::connect_lazy(&config.database_url).unwrap();
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let llm = LlmClient::new(config.anthropic_api_key.clone()).unwrap();
        let relay = ChatRelay::new(
            Arc::new(ConnectionRegistry::new()),
            Arc::new(HrAssistant::new(llm.clone())),
            Arc::new(PgExchangeStore::new(db.clone())),
            config.responder_timeout,
        );

        AppState {
            db,
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            llm,
            config,
            relay,
        }
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn error_body(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = build_router(test_state());
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_faq_blank_query_is_bad_request() {
        let app = build_router(test_state());
        let req = json_request(Method::POST, "/api/support/faq", r#"{"query":"   "}"#);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = error_body(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_faq_missing_query_is_bad_request() {
        let app = build_router(test_state());
        let req = json_request(Method::POST, "/api/support/faq", r#"{"userId":"emp-1"}"#);
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_jd_requires_fields() {
        let app = build_router(test_state());
        let req = json_request(
            Method::POST,
            "/api/recruitment/generate-jd",
            r#"{"title":"Backend Engineer"}"#,
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_task_patch_is_bad_request() {
        let app = build_router(test_state());
        let req = json_request(Method::PATCH, "/api/onboarding/tasks/1", "{}");
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = error_body(resp).await;
        assert_eq!(body["error"]["message"], "No fields to update");
    }

    #[tokio::test]
    async fn test_ws_route_requires_upgrade() {
        let app = build_router(test_state());
        let req = Request::builder().uri("/ws?userId=emp-1").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
    }
}
