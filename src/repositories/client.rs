use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::models::{Client, ClientCreateRequest, ClientUpdateRequest};

/// Persistent store capability for client records.
///
/// The store is the source of truth. Tombstoned rows are invisible to every
/// read; implementations provide per-row atomicity and the service layer
/// adds no locking on top.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn insert(&self, request: &ClientCreateRequest, slug: &str) -> AppResult<Client>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Client>>;

    async fn find_all(&self) -> AppResult<Vec<Client>>;

    /// Merges the supplied fields into the record and returns the stored result.
    async fn update_fields(
        &self,
        current: &Client,
        patch: &ClientUpdateRequest,
    ) -> AppResult<Client>;

    /// Tombstones the record; subsequent reads will not see it.
    async fn soft_delete(&self, client: &Client) -> AppResult<()>;

    async fn set_logo_url(&self, client: &Client, logo_url: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct SqliteClientRepository {
    pool: Pool<Sqlite>,
}

impl SqliteClientRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

// Helper function to parse datetime from either RFC3339 or SQLite format
fn parse_datetime(s: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    Err(AppError::internal(format!("failed to parse datetime: {s}")))
}

fn map_client_row(row: &SqliteRow) -> AppResult<Client> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    let deleted_at: Option<String> = row.get("deleted_at");

    Ok(Client {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        is_project: row.get("is_project"),
        self_capture: row.get("self_capture"),
        client_prefix: row.get("client_prefix"),
        logo_url: row.get("logo_url"),
        address: row.get("address"),
        phone_number: row.get("phone_number"),
        city: row.get("city"),
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
        deleted_at: deleted_at.as_deref().map(parse_datetime).transpose()?,
    })
}

const CLIENT_COLUMNS: &str = "id, name, slug, is_project, self_capture, client_prefix, \
     logo_url, address, phone_number, city, created_at, updated_at, deleted_at";

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn insert(&self, request: &ClientCreateRequest, slug: &str) -> AppResult<Client> {
        let now = Utc::now();
        let client = Client {
            id: 0,
            name: request.name.clone(),
            slug: slug.to_string(),
            is_project: request.is_project.clone().unwrap_or_else(|| "0".to_string()),
            self_capture: request
                .self_capture
                .clone()
                .unwrap_or_else(|| "1".to_string()),
            client_prefix: request.client_prefix.clone().unwrap_or_default(),
            logo_url: "no-image.jpg".to_string(),
            address: request.address.clone(),
            phone_number: request.phone_number.clone(),
            city: request.city.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO clients (name, slug, is_project, self_capture, client_prefix,
                                 logo_url, address, phone_number, city, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.name)
        .bind(&client.slug)
        .bind(&client.is_project)
        .bind(&client.self_capture)
        .bind(&client.client_prefix)
        .bind(&client.logo_url)
        .bind(&client.address)
        .bind(&client.phone_number)
        .bind(&client.city)
        .bind(client.created_at.to_rfc3339())
        .bind(client.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Client {
            id: result.last_insert_rowid(),
            ..client
        })
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Client>> {
        let row = sqlx::query(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients
             WHERE slug = ? AND deleted_at IS NULL ORDER BY id LIMIT 1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_client_row).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Client>> {
        let rows = sqlx::query(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients
             WHERE deleted_at IS NULL ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_client_row).collect()
    }

    async fn update_fields(
        &self,
        current: &Client,
        patch: &ClientUpdateRequest,
    ) -> AppResult<Client> {
        let mut updated = current.clone();
        if let Some(name) = &patch.name {
            updated.name = name.clone();
        }
        if let Some(slug) = &patch.slug {
            updated.slug = slug.clone();
        }
        if let Some(is_project) = &patch.is_project {
            updated.is_project = is_project.clone();
        }
        if let Some(self_capture) = &patch.self_capture {
            updated.self_capture = self_capture.clone();
        }
        if let Some(client_prefix) = &patch.client_prefix {
            updated.client_prefix = client_prefix.clone();
        }
        if let Some(address) = &patch.address {
            updated.address = Some(address.clone());
        }
        if let Some(phone_number) = &patch.phone_number {
            updated.phone_number = Some(phone_number.clone());
        }
        if let Some(city) = &patch.city {
            updated.city = Some(city.clone());
        }
        updated.updated_at = Utc::now();

        sqlx::query(
            "UPDATE clients SET name = ?, slug = ?, is_project = ?, self_capture = ?,
             client_prefix = ?, address = ?, phone_number = ?, city = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&updated.name)
        .bind(&updated.slug)
        .bind(&updated.is_project)
        .bind(&updated.self_capture)
        .bind(&updated.client_prefix)
        .bind(&updated.address)
        .bind(&updated.phone_number)
        .bind(&updated.city)
        .bind(updated.updated_at.to_rfc3339())
        .bind(updated.id)
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn soft_delete(&self, client: &Client) -> AppResult<()> {
        sqlx::query("UPDATE clients SET deleted_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(client.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_logo_url(&self, client: &Client, logo_url: &str) -> AppResult<()> {
        sqlx::query("UPDATE clients SET logo_url = ?, updated_at = ? WHERE id = ?")
            .bind(logo_url)
            .bind(Utc::now().to_rfc3339())
            .bind(client.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
