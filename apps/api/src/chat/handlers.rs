//! Axum route handlers for the support chat.

use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chat::connection::run_connection;
use crate::chat::relay::Peer;
use crate::chat::store::list_messages;
use crate::errors::AppError;
use crate::models::support::ChatMessageRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqRequest {
    pub query: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FaqResponse {
    pub response: String,
}

/// GET /ws?userId=
///
/// Upgrades to the support-chat socket. Without a userId the socket is
/// anonymous: it still gets answers, recorded without a user.
pub async fn handle_ws_upgrade(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let peer = Peer::from_user_id(params.user_id);
    info!(user_id = %peer.key, "Support chat upgrade requested");

    let relay = state.relay.clone();
    ws.on_upgrade(move |socket| run_connection(socket, relay, peer))
}

/// POST /api/support/faq
///
/// Synchronous path for clients without a live socket.
pub async fn handle_faq(
    State(state): State<AppState>,
    Json(request): Json<FaqRequest>,
) -> Result<Json<FaqResponse>, AppError> {
    let query = request.query.unwrap_or_default();
    let response = state.relay.answer_query(request.user_id, &query).await?;
    Ok(Json(FaqResponse { response }))
}

/// GET /api/support/chat-messages?userId=
pub async fn handle_chat_messages(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ChatMessageRow>>, AppError> {
    let user_id = params.user_id.as_deref().filter(|id| !id.is_empty());
    Ok(Json(list_messages(&state.db, user_id).await?))
}
