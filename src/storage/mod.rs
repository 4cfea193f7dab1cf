//! Blob storage for uploaded client logos.
//!
//! The capability is optional at construction time: without it, only the
//! upload-logo operation fails, everything else is unaffected.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use image::ImageFormat;
use tokio::fs;
use uuid::Uuid;

/// Blob storage capability: store raw bytes, hand back a retrieval URL.
#[async_trait]
pub trait LogoStorage: Send + Sync {
    /// Stores the file under a generated name and returns its public URL.
    async fn store(&self, data: Vec<u8>, extension: &str) -> Result<String>;

    /// Reads a previously stored file by its generated name.
    async fn read(&self, file_name: &str) -> Result<Vec<u8>>;
}

/// Filesystem-backed logo storage served through the web layer.
#[derive(Clone)]
pub struct FilesystemLogoStorage {
    logo_dir: PathBuf,
    base_url: String,
}

impl FilesystemLogoStorage {
    pub fn new(logo_dir: PathBuf, base_url: String) -> Self {
        Self {
            logo_dir,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn ensure_storage_dir(&self) -> Result<(), std::io::Error> {
        if !self.logo_dir.exists() {
            fs::create_dir_all(&self.logo_dir).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl LogoStorage for FilesystemLogoStorage {
    async fn store(&self, data: Vec<u8>, extension: &str) -> Result<String> {
        self.ensure_storage_dir().await?;

        let extension = if extension.is_empty() {
            sniff_extension(&data).to_string()
        } else {
            extension.to_lowercase()
        };

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let file_path = self.logo_dir.join(&file_name);
        fs::write(&file_path, &data).await?;

        Ok(format!("{}/logos/{}", self.base_url, file_name))
    }

    async fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        // Stored names are UUID-based; anything path-like is hostile input.
        if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
            anyhow::bail!("invalid logo file name: {file_name}");
        }

        Ok(fs::read(self.logo_dir.join(file_name)).await?)
    }
}

/// Picks an extension from the image magic bytes when the upload has none.
fn sniff_extension(data: &[u8]) -> &'static str {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => "png",
        Ok(ImageFormat::Jpeg) => "jpg",
        Ok(ImageFormat::Gif) => "gif",
        Ok(ImageFormat::WebP) => "webp",
        _ => "bin",
    }
}

/// Maps a stored file name to the content type it is served with.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
