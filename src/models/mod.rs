use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client record.
///
/// The numeric `id` is assigned by the store and never used as a lookup key;
/// the slug is the external identifier for every HTTP operation. A non-null
/// `deleted_at` tombstones the record, which then never appears in reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_project: String,
    pub self_capture: String,
    pub client_prefix: String,
    pub logo_url: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCreateRequest {
    pub name: String,
    /// Used verbatim when supplied; derived from the name otherwise.
    pub slug: Option<String>,
    pub is_project: Option<String>,
    pub self_capture: Option<String>,
    pub client_prefix: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
}

/// Patch applied to an existing record; only supplied fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientUpdateRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub is_project: Option<String>,
    pub self_capture: Option<String>,
    pub client_prefix: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoUploadResponse {
    pub message: String,
    pub logo_url: String,
}
