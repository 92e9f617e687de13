//! Chat relay: one inbound question in, one answered and recorded exchange out.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::chat::protocol::{parse_client_frame, ClientFrame, ServerFrame};
use crate::chat::registry::ConnectionRegistry;
use crate::chat::responder::Responder;
use crate::chat::store::{ExchangeStore, NewExchange};
use crate::errors::AppError;
use crate::llm_client::LlmError;
use crate::models::support::ChatMessageRow;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("query is required")]
    EmptyQuery,

    #[error("responder failed: {0}")]
    Responder(#[from] LlmError),

    #[error("responder timed out after {0:?}")]
    Timeout(Duration),
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::EmptyQuery => AppError::Validation("Query is required".to_string()),
            other => AppError::Llm(format!("Failed to process query: {other}")),
        }
    }
}

/// Identity of one socket.
#[derive(Debug, Clone, PartialEq)]
pub struct Peer {
    /// Registry key. Anonymous sockets get a generated one.
    pub key: String,
    /// User id recorded with exchanges; `None` when anonymous.
    pub user_id: Option<String>,
}

impl Peer {
    pub fn from_user_id(user_id: Option<String>) -> Self {
        match user_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => Peer {
                key: id.clone(),
                user_id: Some(id),
            },
            None => Peer {
                key: format!("anon-{}", Uuid::new_v4()),
                user_id: None,
            },
        }
    }
}

/// Orchestrates exchanges across the socket and synchronous paths.
///
/// Concurrent exchanges for the same user are not ordered: replies are
/// pushed in completion order.
#[derive(Clone)]
pub struct ChatRelay {
    registry: Arc<ConnectionRegistry>,
    responder: Arc<dyn Responder>,
    store: Arc<dyn ExchangeStore>,
    timeout: Duration,
}

impl ChatRelay {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        responder: Arc<dyn Responder>,
        store: Arc<dyn ExchangeStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            responder,
            store,
            timeout,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Socket path entry point for one text frame.
    ///
    /// Chat frames are answered on a spawned task so a slow responder never
    /// holds up the connection's reader or anyone else's. Anything else is
    /// dropped without a reply; the socket stays open.
    pub fn dispatch_frame(&self, peer: &Peer, text: &str) -> Option<JoinHandle<()>> {
        match parse_client_frame(text) {
            Ok(ClientFrame::Chat { content, user_id }) => {
                if user_id.is_some() && user_id != peer.user_id {
                    debug!(
                        conn_user = %peer.key,
                        frame_user = ?user_id,
                        "Frame userId differs from connection; using connection identity"
                    );
                }
                let relay = self.clone();
                let peer = peer.clone();
                Some(tokio::spawn(async move {
                    relay.socket_exchange(peer, content).await;
                }))
            }
            Ok(ClientFrame::Other(kind)) => {
                debug!(user_id = %peer.key, kind = %kind, "Ignoring non-chat frame");
                None
            }
            Err(e) => {
                debug!(user_id = %peer.key, error = %e, "Dropping invalid frame");
                None
            }
        }
    }

    /// Answers `content`, records the exchange and pushes the answer to
    /// whatever connection is registered for the peer at that moment.
    /// Failures end the exchange here; there is no caller to report to.
    pub async fn socket_exchange(&self, peer: Peer, content: String) {
        let response = match self.ask(&content).await {
            Ok(response) => response,
            Err(e) => {
                warn!(user_id = %peer.key, error = %e, "Support chat exchange failed, no reply sent");
                return;
            }
        };

        self.persist(peer.user_id.clone(), content, response.clone())
            .await;

        match self.registry.lookup(&peer.key) {
            Some(conn) => {
                if !conn.push(ServerFrame::chat_response(response)) {
                    debug!(user_id = %peer.key, "Connection closed before reply, dropping it");
                }
            }
            None => debug!(user_id = %peer.key, "No live connection, reply dropped"),
        }
    }

    /// Synchronous path: answers `query` and returns the answer directly.
    ///
    /// A blank query is rejected before the responder is called. A responder
    /// failure is returned and nothing is recorded. A failure to record is
    /// logged but does not withhold the answer.
    pub async fn answer_query(
        &self,
        user_id: Option<String>,
        query: &str,
    ) -> Result<String, RelayError> {
        if query.trim().is_empty() {
            return Err(RelayError::EmptyQuery);
        }

        let response = self.ask(query).await?;
        self.persist(user_id, query.to_string(), response.clone())
            .await;
        Ok(response)
    }

    async fn ask(&self, text: &str) -> Result<String, RelayError> {
        tokio::time::timeout(self.timeout, self.responder.answer(text))
            .await
            .map_err(|_| RelayError::Timeout(self.timeout))?
            .map_err(RelayError::from)
    }

    async fn persist(
        &self,
        user_id: Option<String>,
        message: String,
        response: String,
    ) -> Option<ChatMessageRow> {
        let exchange = NewExchange::support(user_id, message, response);
        match self.store.record_exchange(exchange).await {
            Ok(row) => Some(row),
            Err(e) => {
                error!(error = ?e, "Failed to record support chat exchange");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::{mpsc, Notify};

    use crate::chat::registry::{Outbound, OutboundSender};

    const LEAVE_QUESTION: &str = "How do I submit a leave request?";
    const LEAVE_ANSWER: &str = "File via the HR portal.";

    // ── Responder stubs ─────────────────────────────────────────────────────

    /// Looks answers up by question; optional per-question delay.
    #[derive(Default)]
    struct ScriptedResponder {
        answers: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        calls: AtomicUsize,
    }

    impl ScriptedResponder {
        fn with(mut self, question: &str, answer: &str) -> Self {
            self.answers.insert(question.to_string(), answer.to_string());
            self
        }

        fn delayed(mut self, question: &str, delay: Duration) -> Self {
            self.delays.insert(question.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl Responder for ScriptedResponder {
        async fn answer(&self, text: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(text) {
                tokio::time::sleep(*delay).await;
            }
            self.answers
                .get(text)
                .cloned()
                .ok_or(LlmError::EmptyContent)
        }
    }

    struct FailingResponder;

    #[async_trait]
    impl Responder for FailingResponder {
        async fn answer(&self, _text: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 500,
                message: "upstream exploded".to_string(),
            })
        }
    }

    /// Blocks until the test releases it.
    struct GatedResponder {
        gate: Arc<Notify>,
        answer: String,
    }

    #[async_trait]
    impl Responder for GatedResponder {
        async fn answer(&self, _text: &str) -> Result<String, LlmError> {
            self.gate.notified().await;
            Ok(self.answer.clone())
        }
    }

    // ── Store stubs ─────────────────────────────────────────────────────────

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<NewExchange>>,
        fail: bool,
    }

    impl MemoryStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn records(&self) -> Vec<NewExchange> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExchangeStore for MemoryStore {
        async fn record_exchange(&self, exchange: NewExchange) -> anyhow::Result<ChatMessageRow> {
            if self.fail {
                anyhow::bail!("database unavailable");
            }
            let mut records = self.records.lock().unwrap();
            records.push(exchange.clone());
            Ok(ChatMessageRow {
                id: records.len() as i32,
                user_id: exchange.user_id,
                message: exchange.message,
                response: Some(exchange.response),
                kind: exchange.kind,
                created_at: Utc::now(),
            })
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────────

    fn relay_with(
        responder: Arc<dyn Responder>,
        store: Arc<MemoryStore>,
    ) -> (ChatRelay, Arc<ConnectionRegistry>) {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = ChatRelay::new(
            registry.clone(),
            responder,
            store,
            Duration::from_secs(5),
        );
        (relay, registry)
    }

    fn connect(
        registry: &ConnectionRegistry,
        user_id: &str,
    ) -> (Peer, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx): (OutboundSender, _) = mpsc::unbounded_channel();
        registry.register(user_id, tx);
        (Peer::from_user_id(Some(user_id.to_string())), rx)
    }

    fn chat_frame(content: &str, user_id: &str) -> String {
        serde_json::json!({ "type": "chat", "content": content, "userId": user_id }).to_string()
    }

    fn expect_reply(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> String {
        match rx.try_recv() {
            Ok(Outbound::Frame(ServerFrame::ChatResponse { content, .. })) => content,
            other => panic!("expected chat_response, got {other:?}"),
        }
    }

    // ── Socket path ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_socket_exchange_records_and_pushes_once() {
        let responder = Arc::new(ScriptedResponder::default().with(LEAVE_QUESTION, LEAVE_ANSWER));
        let store = Arc::new(MemoryStore::default());
        let (relay, registry) = relay_with(responder, store.clone());
        let (peer, mut rx) = connect(&registry, "u1");

        relay
            .dispatch_frame(&peer, &chat_frame(LEAVE_QUESTION, "u1"))
            .expect("chat frame should spawn an exchange")
            .await
            .unwrap();

        assert_eq!(
            store.records(),
            vec![NewExchange::support(
                Some("u1".to_string()),
                LEAVE_QUESTION.to_string(),
                LEAVE_ANSWER.to_string(),
            )]
        );
        assert_eq!(expect_reply(&mut rx), LEAVE_ANSWER);
        assert!(rx.try_recv().is_err(), "exactly one frame expected");
    }

    #[tokio::test]
    async fn test_reply_dropped_when_disconnected_mid_exchange() {
        let gate = Arc::new(Notify::new());
        let responder = Arc::new(GatedResponder {
            gate: gate.clone(),
            answer: LEAVE_ANSWER.to_string(),
        });
        let store = Arc::new(MemoryStore::default());
        let (relay, registry) = relay_with(responder, store.clone());
        let (peer, mut rx) = connect(&registry, "u1");

        let exchange = relay
            .dispatch_frame(&peer, &chat_frame(LEAVE_QUESTION, "u1"))
            .unwrap();

        registry.unregister("u1");
        gate.notify_one();
        exchange.await.expect("exchange task must not panic");

        assert_eq!(store.records().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_socket_responder_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::default());
        let (relay, registry) = relay_with(Arc::new(FailingResponder), store.clone());
        let (peer, mut rx) = connect(&registry, "u1");

        relay
            .dispatch_frame(&peer, &chat_frame(LEAVE_QUESTION, "u1"))
            .unwrap()
            .await
            .unwrap();

        assert!(store.records().is_empty());
        assert!(rx.try_recv().is_err());
        assert!(registry.lookup("u1").is_some(), "socket stays registered");
    }

    #[tokio::test]
    async fn test_socket_reply_survives_store_failure() {
        let responder = Arc::new(ScriptedResponder::default().with(LEAVE_QUESTION, LEAVE_ANSWER));
        let (relay, registry) = relay_with(responder, Arc::new(MemoryStore::failing()));
        let (peer, mut rx) = connect(&registry, "u1");

        relay.socket_exchange(peer, LEAVE_QUESTION.to_string()).await;

        assert_eq!(expect_reply(&mut rx), LEAVE_ANSWER);
    }

    #[tokio::test]
    async fn test_invalid_and_foreign_frames_are_dropped() {
        let responder = Arc::new(ScriptedResponder::default());
        let store = Arc::new(MemoryStore::default());
        let (relay, registry) = relay_with(responder.clone(), store.clone());
        let (peer, mut rx) = connect(&registry, "u1");

        for frame in [
            "not json",
            r#"{"type":"chat","userId":"u1"}"#,
            r#"{"type":"chat","content":""}"#,
            r#"{"type":"typing","userId":"u1"}"#,
        ] {
            assert!(relay.dispatch_frame(&peer, frame).is_none(), "{frame}");
        }

        assert_eq!(responder.calls.load(Ordering::SeqCst), 0);
        assert!(store.records().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_concurrent_users_never_see_each_others_replies() {
        // u1's question finishes last so the replies cross in flight.
        let responder = Arc::new(
            ScriptedResponder::default()
                .with("u1 question", "answer for u1")
                .with("u2 question", "answer for u2")
                .delayed("u1 question", Duration::from_millis(50)),
        );
        let store = Arc::new(MemoryStore::default());
        let (relay, registry) = relay_with(responder, store.clone());
        let (peer1, mut rx1) = connect(&registry, "u1");
        let (peer2, mut rx2) = connect(&registry, "u2");

        let first = relay
            .dispatch_frame(&peer1, &chat_frame("u1 question", "u1"))
            .unwrap();
        let second = relay
            .dispatch_frame(&peer2, &chat_frame("u2 question", "u2"))
            .unwrap();
        let (a, b) = tokio::join!(first, second);
        a.unwrap();
        b.unwrap();

        assert_eq!(expect_reply(&mut rx1), "answer for u1");
        assert_eq!(expect_reply(&mut rx2), "answer for u2");
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_err());
        assert_eq!(store.records().len(), 2);
    }

    #[tokio::test]
    async fn test_frame_user_id_cannot_redirect_reply() {
        let responder = Arc::new(ScriptedResponder::default().with(LEAVE_QUESTION, LEAVE_ANSWER));
        let store = Arc::new(MemoryStore::default());
        let (relay, registry) = relay_with(responder, store.clone());
        let (peer1, mut rx1) = connect(&registry, "u1");
        let (_peer2, mut rx2) = connect(&registry, "u2");

        relay
            .dispatch_frame(&peer1, &chat_frame(LEAVE_QUESTION, "u2"))
            .unwrap()
            .await
            .unwrap();

        assert_eq!(expect_reply(&mut rx1), LEAVE_ANSWER);
        assert!(rx2.try_recv().is_err());
        assert_eq!(store.records()[0].user_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_anonymous_peer_records_null_user() {
        let responder = Arc::new(ScriptedResponder::default().with(LEAVE_QUESTION, LEAVE_ANSWER));
        let store = Arc::new(MemoryStore::default());
        let (relay, registry) = relay_with(responder, store.clone());

        let peer = Peer::from_user_id(None);
        assert!(peer.key.starts_with("anon-"));
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(&peer.key, tx);

        relay.socket_exchange(peer, LEAVE_QUESTION.to_string()).await;

        assert_eq!(expect_reply(&mut rx), LEAVE_ANSWER);
        assert_eq!(store.records()[0].user_id, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_socket_timeout_sends_nothing() {
        let responder = Arc::new(
            ScriptedResponder::default()
                .with(LEAVE_QUESTION, LEAVE_ANSWER)
                .delayed(LEAVE_QUESTION, Duration::from_secs(3600)),
        );
        let store = Arc::new(MemoryStore::default());
        let (relay, registry) = relay_with(responder, store.clone());
        let (peer, mut rx) = connect(&registry, "u1");

        relay.socket_exchange(peer, LEAVE_QUESTION.to_string()).await;

        assert!(store.records().is_empty());
        assert!(rx.try_recv().is_err());
    }

    // ── Synchronous path ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_answer_query_returns_and_records() {
        let responder = Arc::new(ScriptedResponder::default().with(LEAVE_QUESTION, LEAVE_ANSWER));
        let store = Arc::new(MemoryStore::default());
        let (relay, _) = relay_with(responder, store.clone());

        let answer = relay
            .answer_query(Some("u1".to_string()), LEAVE_QUESTION)
            .await
            .unwrap();

        assert_eq!(answer, LEAVE_ANSWER);
        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, LEAVE_QUESTION);
        assert_eq!(records[0].kind, "support");
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_responder() {
        let responder = Arc::new(ScriptedResponder::default());
        let store = Arc::new(MemoryStore::default());
        let (relay, _) = relay_with(responder.clone(), store.clone());

        for query in ["", "   \n"] {
            let err = relay.answer_query(None, query).await.unwrap_err();
            assert!(matches!(err, RelayError::EmptyQuery));
        }
        assert_eq!(responder.calls.load(Ordering::SeqCst), 0);
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_responder_failure_surfaces_without_record() {
        let store = Arc::new(MemoryStore::default());
        let (relay, _) = relay_with(Arc::new(FailingResponder), store.clone());

        let err = relay
            .answer_query(Some("u1".to_string()), LEAVE_QUESTION)
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Responder(_)));
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_does_not_withhold_answer() {
        let responder = Arc::new(ScriptedResponder::default().with(LEAVE_QUESTION, LEAVE_ANSWER));
        let (relay, _) = relay_with(responder, Arc::new(MemoryStore::failing()));

        let answer = relay.answer_query(None, LEAVE_QUESTION).await.unwrap();
        assert_eq!(answer, LEAVE_ANSWER);
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_query_timeout_is_an_error() {
        let responder = Arc::new(
            ScriptedResponder::default()
                .with(LEAVE_QUESTION, LEAVE_ANSWER)
                .delayed(LEAVE_QUESTION, Duration::from_secs(3600)),
        );
        let store = Arc::new(MemoryStore::default());
        let (relay, _) = relay_with(responder, store.clone());

        let err = relay.answer_query(None, LEAVE_QUESTION).await.unwrap_err();
        assert!(matches!(err, RelayError::Timeout(_)));
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_relay_errors_map_to_http_classes() {
        assert!(matches!(
            AppError::from(RelayError::EmptyQuery),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(RelayError::Timeout(Duration::from_secs(1))),
            AppError::Llm(_)
        ));
    }

    #[test]
    fn test_blank_user_id_is_anonymous() {
        let peer = Peer::from_user_id(Some("  ".to_string()));
        assert_eq!(peer.user_id, None);
        assert!(peer.key.starts_with("anon-"));
    }
}
