//! In-memory table of live support-chat connections, one per user.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::chat::protocol::ServerFrame;

/// Close code sent to a socket that was displaced by a newer connection for
/// the same user.
pub const CLOSE_REPLACED: u16 = 4000;

/// Work item for a connection's writer task.
#[derive(Debug)]
pub enum Outbound {
    Frame(ServerFrame),
    Close { code: u16, reason: &'static str },
}

pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

/// Handle to a registered connection. The registry owns the only long-lived
/// copy; `lookup` hands out short-lived clones for a single push.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: u64,
    tx: OutboundSender,
}

impl ConnectionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// False once the writer task has gone away.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queues a frame for the socket. Returns false if the socket is gone.
    pub fn push(&self, frame: ServerFrame) -> bool {
        self.is_open() && self.tx.send(Outbound::Frame(frame)).is_ok()
    }

    fn close(&self, code: u16, reason: &'static str) {
        let _ = self.tx.send(Outbound::Close { code, reason });
    }
}

/// Maps a user id to at most one live connection.
///
/// Register, unregister and lookup may run concurrently from different
/// connection tasks; DashMap shards the locking.
#[derive(Default)]
pub struct ConnectionRegistry {
    conns: DashMap<String, ConnectionHandle>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `tx` as the connection for `user_id` and returns its connection id.
    ///
    /// A previous connection for the same user is replaced and told to close.
    pub fn register(&self, user_id: &str, tx: OutboundSender) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let previous = self
            .conns
            .insert(user_id.to_string(), ConnectionHandle { id, tx });

        match previous {
            Some(old) => {
                old.close(CLOSE_REPLACED, "Replaced by a newer connection");
                info!(
                    user_id,
                    conn_id = id,
                    replaced_conn_id = old.id,
                    "Replaced support chat connection"
                );
            }
            None => info!(user_id, conn_id = id, "Registered support chat connection"),
        }
        id
    }

    /// Removes whatever connection is registered for `user_id`. No-op if absent.
    /// Socket tasks use `release` instead.
    #[allow(dead_code)]
    pub fn unregister(&self, user_id: &str) {
        if let Some((_, handle)) = self.conns.remove(user_id) {
            debug!(user_id, conn_id = handle.id, "Unregistered support chat connection");
        }
    }

    /// Removes the entry only if it still belongs to `conn_id`, so a socket
    /// closing after being replaced cannot evict its successor.
    pub fn release(&self, user_id: &str, conn_id: u64) -> bool {
        let removed = self
            .conns
            .remove_if(user_id, |_, handle| handle.id == conn_id)
            .is_some();
        if removed {
            debug!(user_id, conn_id, "Released support chat connection");
        }
        removed
    }

    pub fn lookup(&self, user_id: &str) -> Option<ConnectionHandle> {
        self.conns.get(user_id).map(|entry| entry.value().clone())
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.conns.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }
}
