use async_trait::async_trait;

use super::service::{CacheResult, ClientCache};
use crate::models::Client;

/// No-op cache used when Redis is disabled or unreachable at startup.
///
/// Every read is a miss and every write succeeds without storing anything,
/// so lookups always fall through to the store.
#[derive(Debug, Default, Clone)]
pub struct NullCache;

#[async_trait]
impl ClientCache for NullCache {
    async fn set(&self, _slug: &str, _client: &Client) -> CacheResult<()> {
        Ok(())
    }

    async fn get(&self, _slug: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn delete(&self, _slug: &str) -> CacheResult<()> {
        Ok(())
    }
}
