use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use super::AppState;
use crate::storage::content_type_for;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn serve_logo(
    Path(file_name): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let Some(storage) = &state.logo_storage else {
        return Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("Logo storage not configured"))
            .unwrap();
    };

    match storage.read(&file_name).await {
        Ok(data) => Response::builder()
            .header(header::CONTENT_TYPE, content_type_for(&file_name))
            .header(header::CACHE_CONTROL, "public, max-age=3600")
            .body(Body::from(data))
            .unwrap(),
        Err(_) => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("Logo not found"))
            .unwrap(),
    }
}
