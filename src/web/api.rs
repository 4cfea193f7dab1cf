use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::error;

use super::AppState;
use crate::errors::AppError;
use crate::models::{Client, ClientCreateRequest, ClientUpdateRequest, LogoUploadResponse};

fn error_status(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::BlobStoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<ClientCreateRequest>,
) -> Result<(StatusCode, Json<Client>), StatusCode> {
    match state.client_service.create(payload).await {
        Ok(client) => Ok((StatusCode::CREATED, Json(client))),
        Err(e) => {
            error!("Failed to create client: {}", e);
            Err(error_status(&e))
        }
    }
}

pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>, StatusCode> {
    match state.client_service.list().await {
        Ok(clients) => Ok(Json(clients)),
        Err(e) => {
            error!("Failed to list clients: {}", e);
            Err(error_status(&e))
        }
    }
}

pub async fn get_client_by_slug(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Client>, StatusCode> {
    match state.client_service.get_by_slug(&slug).await {
        Ok(client) => Ok(Json(client)),
        Err(AppError::NotFound { .. }) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to get client '{}': {}", slug, e);
            Err(error_status(&e))
        }
    }
}

pub async fn update_client(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ClientUpdateRequest>,
) -> Result<Json<Client>, StatusCode> {
    match state.client_service.update(&slug, payload).await {
        Ok(client) => Ok(Json(client)),
        Err(AppError::NotFound { .. }) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to update client '{}': {}", slug, e);
            Err(error_status(&e))
        }
    }
}

pub async fn delete_client(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, StatusCode> {
    match state.client_service.delete(&slug).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(AppError::NotFound { .. }) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to delete client '{}': {}", slug, e);
            Err(error_status(&e))
        }
    }
}

pub async fn upload_client_logo(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<LogoUploadResponse>, StatusCode> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    // Process all multipart fields
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        match field.name() {
            Some("logo") => {
                let file_name = field
                    .file_name()
                    .ok_or(StatusCode::BAD_REQUEST)?
                    .to_string();

                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;

                // Validate file type
                if !content_type.starts_with("image/") {
                    return Err(StatusCode::BAD_REQUEST);
                }

                file_data = Some((file_name, data.to_vec()));
            }
            _ => {} // Ignore other fields
        }
    }

    let (file_name, data) = file_data.ok_or(StatusCode::BAD_REQUEST)?;

    match state
        .client_service
        .upload_logo(&slug, data, &file_name)
        .await
    {
        Ok(logo_url) => Ok(Json(LogoUploadResponse {
            message: "Logo uploaded successfully".to_string(),
            logo_url,
        })),
        Err(AppError::NotFound { .. }) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to upload logo for client '{}': {}", slug, e);
            Err(error_status(&e))
        }
    }
}
