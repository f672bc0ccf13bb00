//! Session Store Port - lookup and persistence of per-session state.
//!
//! The dispatcher never touches a global registry; transports resolve a
//! session through this port, run the turn, and write the state back. That
//! keeps the dialogue logic untouched when a persistent or distributed
//! backing store is swapped in.

use async_trait::async_trait;

use crate::domain::session::SessionState;

/// Port for session state storage.
///
/// Sessions are independent: implementations must support concurrent
/// lookups and inserts for different session ids without interference.
/// Serializing turns *within* one session is the caller's responsibility.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session for `session_id`, creating it if absent.
    ///
    /// With no id, a fresh session with a generated id is returned.
    async fn get_or_create(&self, session_id: Option<&str>) -> SessionState;

    /// Writes a session state back to the store.
    async fn upsert(&self, state: SessionState);
}
