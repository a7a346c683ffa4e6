//! Key-value storage boundary
//!
//! The state layer talks to its backing store through [`KvStore`]: four
//! primitives over string keys and nothing else. The store offers no
//! multi-key transactions or compare-and-swap, so any atomicity above a
//! single key is the callers' responsibility.

use crate::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

/// Minimal key-value interface the state layer is built against
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value at `key`; `None` if the key does not exist
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` at `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Append `value` to the list at `key`, creating the list if absent
    async fn append_to_list(&self, key: &str, value: &str) -> Result<()>;

    /// Read the whole list at `key` in append order; empty if absent
    async fn list_range(&self, key: &str) -> Result<Vec<String>>;
}

/// Redis-backed store
///
/// Values are JSON strings; lists are native Redis lists. The connection
/// manager multiplexes and reconnects internally, so clones are cheap and
/// every call works on its own handle.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis and verify the connection with a PING
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let mut conn = ConnectionManager::new(client).await?;

        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        info!("Connected to Redis at {}", url);

        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn append_to_list(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn list_range(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.lrange::<_, Vec<String>>(key, 0, -1).await?)
    }
}

/// In-memory store for tests and local runs
///
/// Scalar values and lists occupy disjoint key spaces, the same way the
/// corresponding Redis types do.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: DashMap<String, String>,
    lists: DashMap<String, Vec<String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn append_to_list(&self, key: &str, value: &str) -> Result<()> {
        self.lists
            .entry(key.to_string())
            .or_insert_with(Vec::new)
            .push(value.to_string());
        Ok(())
    }

    async fn list_range(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .lists
            .get(key)
            .map(|l| l.value().clone())
            .unwrap_or_default())
    }
}
