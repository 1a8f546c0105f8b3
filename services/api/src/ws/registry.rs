//! Registry of live WebSocket sessions.

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

pub type SessionId = Uuid;

/// The shared write half of a client socket.
pub type SessionHandle = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// Maps each live connection to its handle.
///
/// Entries are added when a socket is accepted and removed when its handler
/// returns, whatever the reason. All access goes through one mutex.
pub struct SessionRegistry<H = SessionHandle> {
    sessions: Mutex<HashMap<SessionId, H>>,
}

impl<H: Clone> SessionRegistry<H> {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Adds a session. Returns the handle previously stored under `id`, if any.
    pub async fn register(&self, id: SessionId, handle: H) -> Option<H> {
        self.sessions.lock().await.insert(id, handle)
    }

    /// Removes a session, returning its handle if it was registered.
    pub async fn unregister(&self, id: SessionId) -> Option<H> {
        self.sessions.lock().await.remove(&id)
    }

    pub async fn get(&self, id: SessionId) -> Option<H> {
        self.sessions.lock().await.get(&id).cloned()
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.lock().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

impl<H: Clone> Default for SessionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_get_unregister() {
        let registry: SessionRegistry<&'static str> = SessionRegistry::new();
        let id = Uuid::new_v4();

        assert!(registry.is_empty().await);
        assert_eq!(registry.register(id, "socket-a").await, None);
        assert_eq!(registry.get(id).await, Some("socket-a"));
        assert!(registry.contains(id).await);
        assert_eq!(registry.len().await, 1);

        assert_eq!(registry.unregister(id).await, Some("socket-a"));
        assert_eq!(registry.get(id).await, None);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_unregister_unknown_id() {
        let registry: SessionRegistry<u32> = SessionRegistry::default();
        assert_eq!(registry.unregister(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn test_register_same_id_keeps_single_entry() {
        let registry: SessionRegistry<u32> = SessionRegistry::new();
        let id = Uuid::new_v4();

        registry.register(id, 1).await;
        assert_eq!(registry.register(id, 2).await, Some(1));
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.get(id).await, Some(2));
    }

    #[tokio::test]
    async fn test_concurrent_connect_and_disconnect() {
        let registry = Arc::new(SessionRegistry::<usize>::new());
        let ids: Vec<SessionId> = (0..64).map(|_| Uuid::new_v4()).collect();

        let mut tasks = Vec::new();
        for (n, id) in ids.iter().copied().enumerate() {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.register(id, n).await;
                if n % 2 == 0 {
                    registry.unregister(id).await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(registry.len().await, 32);
        for (n, id) in ids.iter().enumerate() {
            assert_eq!(registry.contains(*id).await, n % 2 == 1);
        }
    }
}
