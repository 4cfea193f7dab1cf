//! Error type definitions for the client registry service
//!
//! Store failures always abort the running operation. Cache failures are
//! deliberately absent from this taxonomy: they live in `crate::cache` as
//! [`crate::cache::CacheError`] and never cross into an `AppError`, because
//! a degraded cache must not fail a request.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation errors, surfaced before any persistence attempt
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// No active record at the given slug
    #[error("Not found: {resource} with slug {slug}")]
    NotFound { resource: String, slug: String },

    /// Logo upload requested but no blob storage is configured
    #[error("Blob storage not configured")]
    BlobStoreUnavailable,

    /// Blob storage failed while storing the uploaded bytes
    #[error("Blob storage error: {message}")]
    BlobStore { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found<R: Into<String>, S: Into<String>>(resource: R, slug: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
            slug: slug.into(),
        }
    }

    /// Create a blob storage error
    pub fn blob_store<S: Into<String>>(message: S) -> Self {
        Self::BlobStore {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
