use async_trait::async_trait;
use thiserror::Error;

use crate::models::Client;

/// Key scheme shared by every cache implementation.
pub fn cache_key(slug: &str) -> String {
    format!("client:{slug}")
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Best-effort cache capability for client snapshots.
///
/// Entries persist until explicitly invalidated; there is no expiration.
/// Implementations must provide atomic set/get/delete per key, nothing more.
#[async_trait]
pub trait ClientCache: Send + Sync {
    /// Serializes the client and stores it under its slug.
    async fn set(&self, slug: &str, client: &Client) -> CacheResult<()>;

    /// Returns the raw serialized snapshot, or `None` on a miss.
    async fn get(&self, slug: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Removes the entry; an absent key is not an error.
    async fn delete(&self, slug: &str) -> CacheResult<()>;
}
