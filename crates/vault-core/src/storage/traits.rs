//! Storage trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Generic string key-value store the vault persists its envelope into
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Retrieve the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key` (no-op if absent)
    async fn remove(&self, key: &str) -> Result<()>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
