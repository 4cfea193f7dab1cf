use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::service::{cache_key, CacheResult, ClientCache};
use crate::models::Client;

/// Redis-backed cache sharing one [`ConnectionManager`] across requests.
///
/// The manager reconnects on its own after connection loss; individual
/// command failures during an outage surface as `CacheError` and are
/// absorbed by the service layer.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and verifies the connection with a PING.
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let mut connection = ConnectionManager::new(client).await?;
        let _: () = redis::cmd("PING").query_async(&mut connection).await?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl ClientCache for RedisCache {
    async fn set(&self, slug: &str, client: &Client) -> CacheResult<()> {
        let payload = serde_json::to_vec(client)?;
        let mut connection = self.connection.clone();
        let _: () = connection.set(cache_key(slug), payload).await?;
        Ok(())
    }

    async fn get(&self, slug: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut connection = self.connection.clone();
        let payload: Option<Vec<u8>> = connection.get(cache_key(slug)).await?;
        Ok(payload)
    }

    async fn delete(&self, slug: &str) -> CacheResult<()> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(cache_key(slug)).await?;
        Ok(())
    }
}
