//! Live session bookkeeping in redis.
//!
//! Each issued token pair is bound to a session id. `session:{sid}` holds the
//! owning user and expires with the refresh token; `user_sessions:{user_id}`
//! indexes the ids so every session of a user can be revoked at once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use uuid::Uuid;

use catalog_service_lib::service::SessionRevoker;
use common::{AppResult, CacheConfig};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const SESSION_PREFIX: &str = "session";
const USER_SESSIONS_PREFIX: &str = "user_sessions";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record a new session for the user and return its id
    async fn open(&self, user_id: Uuid, ttl: Duration) -> AppResult<String>;

    async fn is_live(&self, session_id: &str) -> AppResult<bool>;

    /// Revoke every session of the user; returns how many were still live
    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64>;
}

/// The key/value operations the session bookkeeping needs.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> AppResult<()>;

    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Add `member` to the set and push the set's expiry out to `seconds`
    async fn add_member(&self, set: &str, member: &str, seconds: u64) -> AppResult<()>;

    async fn members(&self, set: &str) -> AppResult<Vec<String>>;

    async fn remove_members(&self, set: &str, members: &[String]) -> AppResult<()>;

    /// Delete a key; returns how many keys existed
    async fn delete(&self, key: &str) -> AppResult<u64>;
}

/// Redis connection used as a [`SessionBackend`].
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

#[async_trait]
impl SessionBackend for RedisBackend {
    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let live: bool = conn.exists(key).await?;
        Ok(live)
    }

    async fn add_member(&self, set: &str, member: &str, seconds: u64) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.sadd::<_, _, ()>(set, member).await?;
        conn.expire::<_, ()>(set, i64::try_from(seconds).unwrap_or(i64::MAX))
            .await?;
        Ok(())
    }

    async fn members(&self, set: &str) -> AppResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn.smembers(set).await?;
        Ok(members)
    }

    async fn remove_members(&self, set: &str, members: &[String]) -> AppResult<()> {
        if members.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        conn.srem::<_, _, ()>(set, members).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<u64> {
        let mut conn = self.conn.clone();
        let deleted: u64 = conn.del(key).await?;
        Ok(deleted)
    }
}

/// Session store over any [`SessionBackend`].
#[derive(Clone)]
pub struct KeyedSessionStore<B> {
    backend: B,
}

/// Redis-backed session store.
pub type RedisSessionStore = KeyedSessionStore<RedisBackend>;

impl RedisSessionStore {
    pub async fn connect(config: &CacheConfig) -> Result<Self, RedisError> {
        let client = Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Session store connected");
        Ok(Self::new(RedisBackend { conn }))
    }

    /// Check redis connectivity.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.backend.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

impl<B: SessionBackend> KeyedSessionStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn session_key(session_id: &str) -> String {
        format!("{}:{}", SESSION_PREFIX, session_id)
    }

    fn user_key(user_id: Uuid) -> String {
        format!("{}:{}", USER_SESSIONS_PREFIX, user_id)
    }

    /// Drop ids whose session key has already expired from the user's index.
    async fn prune_expired(&self, user_key: &str) -> AppResult<()> {
        let mut expired = Vec::new();
        for session_id in self.backend.members(user_key).await? {
            if !self.backend.exists(&Self::session_key(&session_id)).await? {
                expired.push(session_id);
            }
        }
        self.backend.remove_members(user_key, &expired).await
    }
}

#[async_trait]
impl<B: SessionBackend> SessionStore for KeyedSessionStore<B> {
    async fn open(&self, user_id: Uuid, ttl: Duration) -> AppResult<String> {
        let session_id = Uuid::new_v4().to_string();
        let seconds = ttl.as_secs().max(1);
        let user_key = Self::user_key(user_id);

        self.prune_expired(&user_key).await?;
        self.backend
            .set_ex(&Self::session_key(&session_id), &user_id.to_string(), seconds)
            .await?;
        self.backend.add_member(&user_key, &session_id, seconds).await?;

        Ok(session_id)
    }

    async fn is_live(&self, session_id: &str) -> AppResult<bool> {
        self.backend.exists(&Self::session_key(session_id)).await
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        let user_key = Self::user_key(user_id);

        let mut revoked = 0u64;
        for session_id in self.backend.members(&user_key).await? {
            revoked += self.backend.delete(&Self::session_key(&session_id)).await?;
        }
        self.backend.delete(&user_key).await?;

        Ok(revoked)
    }
}

/// Exposes a session store as the catalog's revocation hook.
pub struct SessionRevocation {
    store: Arc<dyn SessionStore>,
}

impl SessionRevocation {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SessionRevoker for SessionRevocation {
    async fn revoke_user_sessions(&self, user_id: Uuid) -> AppResult<u64> {
        let revoked = self.store.revoke_all(user_id).await?;
        tracing::info!(user_id = %user_id, revoked, "Sessions revoked");
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory backend; expiry is simulated with `expire_now`.
    #[derive(Default)]
    struct MemoryBackend {
        values: Mutex<HashMap<String, String>>,
        sets: Mutex<HashMap<String, HashSet<String>>>,
    }

    impl MemoryBackend {
        fn expire_now(&self, session_id: &str) {
            self.values
                .lock()
                .unwrap()
                .remove(&format!("{}:{}", SESSION_PREFIX, session_id));
        }

        fn indexed(&self, user_id: Uuid) -> HashSet<String> {
            self.sets
                .lock()
                .unwrap()
                .get(&format!("{}:{}", USER_SESSIONS_PREFIX, user_id))
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl SessionBackend for MemoryBackend {
        async fn set_ex(&self, key: &str, value: &str, _seconds: u64) -> AppResult<()> {
            self.values.lock().unwrap().insert(key.into(), value.into());
            Ok(())
        }

        async fn exists(&self, key: &str) -> AppResult<bool> {
            Ok(self.values.lock().unwrap().contains_key(key)
                || self.sets.lock().unwrap().contains_key(key))
        }

        async fn add_member(&self, set: &str, member: &str, _seconds: u64) -> AppResult<()> {
            self.sets
                .lock()
                .unwrap()
                .entry(set.into())
                .or_default()
                .insert(member.into());
            Ok(())
        }

        async fn members(&self, set: &str) -> AppResult<Vec<String>> {
            Ok(self
                .sets
                .lock()
                .unwrap()
                .get(set)
                .map(|members| members.iter().cloned().collect())
                .unwrap_or_default())
        }

        async fn remove_members(&self, set: &str, members: &[String]) -> AppResult<()> {
            if let Some(stored) = self.sets.lock().unwrap().get_mut(set) {
                for member in members {
                    stored.remove(member);
                }
            }
            Ok(())
        }

        async fn delete(&self, key: &str) -> AppResult<u64> {
            let value = self.values.lock().unwrap().remove(key).is_some();
            let set = self.sets.lock().unwrap().remove(key).is_some();
            Ok(u64::from(value || set))
        }
    }

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn revoke_all_counts_only_live_sessions_of_the_user() {
        let store = KeyedSessionStore::new(MemoryBackend::default());
        let user_id = Uuid::new_v4();
        let other = Uuid::new_v4();

        let first = store.open(user_id, TTL).await.unwrap();
        let second = store.open(user_id, TTL).await.unwrap();
        let lapsed = store.open(user_id, TTL).await.unwrap();
        let foreign = store.open(other, TTL).await.unwrap();
        store.backend.expire_now(&lapsed);

        assert_eq!(store.revoke_all(user_id).await.unwrap(), 2);

        assert!(!store.is_live(&first).await.unwrap());
        assert!(!store.is_live(&second).await.unwrap());
        assert!(store.is_live(&foreign).await.unwrap());
        assert!(store.backend.indexed(user_id).is_empty());
        assert_eq!(store.revoke_all(user_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn open_prunes_expired_ids_from_the_index() {
        let store = KeyedSessionStore::new(MemoryBackend::default());
        let user_id = Uuid::new_v4();

        let stale = store.open(user_id, TTL).await.unwrap();
        store.backend.expire_now(&stale);
        let fresh = store.open(user_id, TTL).await.unwrap();

        assert_eq!(store.backend.indexed(user_id), HashSet::from([fresh]));
    }

    #[tokio::test]
    async fn revocation_reports_store_count() {
        let user_id = Uuid::new_v4();
        let mut store = MockSessionStore::new();
        store
            .expect_revoke_all()
            .with(eq(user_id))
            .times(1)
            .returning(|_| Ok(3));

        let revoker = SessionRevocation::new(Arc::new(store));

        assert_eq!(revoker.revoke_user_sessions(user_id).await.unwrap(), 3);
    }
}
