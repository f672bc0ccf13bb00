//! In-memory session store.
//!
//! The default SessionStore backing: a process-local map behind an async
//! RwLock. Sessions live for the lifetime of the process; a persistent
//! implementation slots in behind the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::session::SessionState;
use crate::ports::SessionStore;

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true when no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_id: Option<&str>) -> SessionState {
        let Some(id) = session_id else {
            return SessionState::with_generated_id();
        };

        if let Some(existing) = self.sessions.read().await.get(id) {
            return existing.clone();
        }

        SessionState::new(id)
    }

    async fn upsert(&self, state: SessionState) {
        self.sessions
            .write()
            .await
            .insert(state.session_id.clone(), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::DialogueState;

    #[tokio::test]
    async fn creates_session_on_first_lookup() {
        let store = InMemorySessionStore::new();

        let session = store.get_or_create(Some("s-1")).await;
        assert_eq!(session.session_id, "s-1");
        assert!(session.messages.is_empty());

        // Lookup alone does not persist.
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn upsert_then_lookup_round_trips_state() {
        let store = InMemorySessionStore::new();

        let mut session = store.get_or_create(Some("s-1")).await;
        session.push_user("hello");
        store.upsert(session).await;

        let reloaded = store.get_or_create(Some("s-1")).await;
        assert_eq!(reloaded.messages.len(), 1);
        assert!(matches!(reloaded.dialogue, DialogueState::Idle));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn missing_id_generates_a_fresh_session() {
        let store = InMemorySessionStore::new();

        let a = store.get_or_create(None).await;
        let b = store.get_or_create(None).await;
        assert_ne!(a.session_id, b.session_id);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemorySessionStore::new();

        let mut a = store.get_or_create(Some("a")).await;
        a.push_user("for a");
        store.upsert(a).await;

        let b = store.get_or_create(Some("b")).await;
        assert!(b.messages.is_empty());
    }
}
