//! Session persistence port.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pos_core::result::AppResult;
use pos_core::types::UserId;
use pos_entity::session::Session;

/// Tracks active sessions per user and supports bulk revocation.
///
/// Implementations must be safe for concurrent use. Operations on
/// different users must not serialize behind a single lock.
///
/// `delete_by_user_id` removes every session created before the call.
/// A session created concurrently with it may or may not survive.
#[async_trait]
pub trait SessionStore: Send + Sync + fmt::Debug + 'static {
    /// Insert a new session.
    async fn create(&self, session: Session) -> AppResult<()>;

    /// Delete one session. Returns whether it existed.
    async fn delete(&self, session_id: &str) -> AppResult<bool>;

    /// Look up a session by ID.
    async fn find_by_id(&self, session_id: &str) -> AppResult<Option<Session>>;

    /// All sessions belonging to a user.
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Session>>;

    /// Store a rotated token pair on a live session and push its expiry to
    /// `expires_at`. Returns `false` when the session is missing or already
    /// expired, leaving nothing changed.
    async fn renew(
        &self,
        session_id: &str,
        access_token: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Delete every session of a user and return what was removed.
    async fn delete_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Session>>;

    /// Delete every expired session. Returns the number removed.
    async fn delete_expired(&self) -> AppResult<u64>;
}
