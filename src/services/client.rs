//! Client record service
//!
//! The only component with business logic: it orchestrates the store, the
//! cache and the blob storage to implement create/read/update/delete and
//! logo upload with defined consistency rules.
//!
//! Consistency discipline: the store is authoritative and every store
//! failure aborts the operation; cache calls around it are best-effort and
//! only ever degrade to warnings. Reads go cache-first and populate the
//! cache on a miss; writes invalidate the old slug before refreshing the
//! current one, so a partial failure can leave a stale-or-missing entry but
//! never one with wrong data under a live key.

use std::sync::Arc;

use tracing::warn;

use crate::cache::ClientCache;
use crate::errors::{AppError, AppResult};
use crate::models::{Client, ClientCreateRequest, ClientUpdateRequest};
use crate::repositories::ClientRepository;
use crate::storage::LogoStorage;
use crate::utils::generate_slug;

#[derive(Clone)]
pub struct ClientService {
    repository: Arc<dyn ClientRepository>,
    cache: Arc<dyn ClientCache>,
    logo_storage: Option<Arc<dyn LogoStorage>>,
}

impl ClientService {
    pub fn new(
        repository: Arc<dyn ClientRepository>,
        cache: Arc<dyn ClientCache>,
        logo_storage: Option<Arc<dyn LogoStorage>>,
    ) -> Self {
        Self {
            repository,
            cache,
            logo_storage,
        }
    }

    /// Creates a record, deriving a slug when the request carries none, and
    /// populates the cache under the new slug.
    pub async fn create(&self, request: ClientCreateRequest) -> AppResult<Client> {
        if request.name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }

        let slug = match request.slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => generate_slug(&request.name),
        };

        let client = self.repository.insert(&request, &slug).await?;
        self.cache_set(&client).await;

        Ok(client)
    }

    /// Looks a record up by slug, cache first.
    ///
    /// A cache hit is returned without consulting the store, so an entry
    /// populated by a racing stale read can persist until the next write
    /// touches that slug. An undecodable cache payload counts as a miss and
    /// gets overwritten on the way back.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Client> {
        match self.cache.get(slug).await {
            Ok(Some(payload)) => match serde_json::from_slice::<Client>(&payload) {
                Ok(client) => return Ok(client),
                Err(e) => warn!("Discarding undecodable cache entry for '{}': {}", slug, e),
            },
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for '{}': {}", slug, e),
        }

        let client = self
            .repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("client", slug))?;
        self.cache_set(&client).await;

        Ok(client)
    }

    pub async fn list(&self) -> AppResult<Vec<Client>> {
        self.repository.find_all().await
    }

    /// Applies a patch to the record at `slug`.
    ///
    /// The cache entry at the original slug is invalidated before the entry
    /// at the record's current slug is written; the patch may have changed
    /// the slug, in which case those are different keys.
    pub async fn update(&self, slug: &str, patch: ClientUpdateRequest) -> AppResult<Client> {
        let current = self
            .repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("client", slug))?;

        let updated = self.repository.update_fields(&current, &patch).await?;

        self.cache_delete(slug).await;
        self.cache_set(&updated).await;

        Ok(updated)
    }

    /// Tombstones the record and evicts its cache entry.
    pub async fn delete(&self, slug: &str) -> AppResult<()> {
        let client = self
            .repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("client", slug))?;

        self.repository.soft_delete(&client).await?;
        self.cache_delete(slug).await;

        Ok(())
    }

    /// Stores the logo bytes, persists the returned URL on the record and
    /// re-syncs the cache from the store.
    ///
    /// The cache entry is not patched in place: the record is re-read so the
    /// snapshot cannot drift from what the store holds.
    pub async fn upload_logo(
        &self,
        slug: &str,
        data: Vec<u8>,
        file_name: &str,
    ) -> AppResult<String> {
        let client = self
            .repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("client", slug))?;

        let storage = self
            .logo_storage
            .as_ref()
            .ok_or(AppError::BlobStoreUnavailable)?;

        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let logo_url = storage
            .store(data, extension)
            .await
            .map_err(|e| AppError::blob_store(e.to_string()))?;

        self.repository.set_logo_url(&client, &logo_url).await?;

        match self.repository.find_by_slug(slug).await {
            Ok(Some(fresh)) => self.cache_set(&fresh).await,
            Ok(None) => {}
            Err(e) => warn!("Failed to re-read client '{}' for cache refresh: {}", slug, e),
        }

        Ok(logo_url)
    }

    async fn cache_set(&self, client: &Client) {
        if let Err(e) = self.cache.set(&client.slug, client).await {
            warn!("Failed to cache client '{}': {}", client.slug, e);
        }
    }

    async fn cache_delete(&self, slug: &str) {
        if let Err(e) = self.cache.delete(slug).await {
            warn!("Failed to evict cached client '{}': {}", slug, e);
        }
    }
}
