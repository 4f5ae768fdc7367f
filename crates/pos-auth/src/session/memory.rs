//! In-process session store sharded by user.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use pos_core::error::AppError;
use pos_core::result::AppResult;
use pos_core::types::UserId;
use pos_entity::session::Session;

use super::store::SessionStore;

/// Session store backed by two `DashMap`s.
///
/// Sessions are grouped per user so revoking a user's sessions removes a
/// single map entry. A second map indexes session ID to owner for
/// lookups by ID. Writes lock only the shard holding the user, and the
/// two maps are never locked at the same time by a writer.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    by_user: DashMap<UserId, HashMap<String, Session>>,
    owners: DashMap<String, UserId>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of sessions held.
    pub fn len(&self) -> usize {
        self.by_user.iter().map(|entry| entry.value().len()).sum()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> AppResult<()> {
        if self.owners.contains_key(&session.id) {
            return Err(AppError::persistence(format!(
                "Session {} already exists",
                session.id
            )));
        }

        let id = session.id.clone();
        let user_id = session.user_id;
        self.by_user
            .entry(user_id)
            .or_default()
            .insert(id.clone(), session);
        self.owners.insert(id, user_id);
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> AppResult<bool> {
        let Some((_, user_id)) = self.owners.remove(session_id) else {
            return Ok(false);
        };

        let removed = self
            .by_user
            .get_mut(&user_id)
            .and_then(|mut sessions| sessions.remove(session_id))
            .is_some();
        self.by_user.remove_if(&user_id, |_, sessions| sessions.is_empty());

        Ok(removed)
    }

    async fn find_by_id(&self, session_id: &str) -> AppResult<Option<Session>> {
        let Some(user_id) = self.owners.get(session_id).map(|entry| *entry.value()) else {
            return Ok(None);
        };

        Ok(self
            .by_user
            .get(&user_id)
            .and_then(|sessions| sessions.get(session_id).cloned()))
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        Ok(self
            .by_user
            .get(&user_id)
            .map(|sessions| sessions.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn renew(
        &self,
        session_id: &str,
        access_token: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let Some(user_id) = self.owners.get(session_id).map(|entry| *entry.value()) else {
            return Ok(false);
        };
        let Some(mut sessions) = self.by_user.get_mut(&user_id) else {
            return Ok(false);
        };
        let Some(session) = sessions.get_mut(session_id) else {
            return Ok(false);
        };
        if session.is_expired() {
            return Ok(false);
        }

        session.access_token = access_token.to_string();
        session.refresh_token = refresh_token.to_string();
        session.expires_at = expires_at;
        Ok(true)
    }

    async fn delete_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        let removed: Vec<Session> = self
            .by_user
            .remove(&user_id)
            .map(|(_, sessions)| sessions.into_values().collect())
            .unwrap_or_default();

        for session in &removed {
            self.owners.remove(&session.id);
        }

        debug!(user_id = %user_id, count = removed.len(), "Deleted user sessions");
        Ok(removed)
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let now = Utc::now();
        let mut expired = Vec::new();

        self.by_user.retain(|_, sessions| {
            sessions.retain(|id, session| {
                if session.is_expired_at(now) {
                    expired.push(id.clone());
                    false
                } else {
                    true
                }
            });
            !sessions.is_empty()
        });

        for id in &expired {
            self.owners.remove(id);
        }

        // Index entries whose session was removed by a concurrent
        // delete_by_user_id while it was being created.
        self.owners.retain(|id, user_id| {
            self.by_user
                .get(user_id)
                .is_some_and(|sessions| sessions.contains_key(id))
        });

        Ok(expired.len() as u64)
    }
}
