use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use regex::Regex;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use client_registry::{
    cache::NullCache,
    database,
    repositories::SqliteClientRepository,
    services::ClientService,
    storage::{FilesystemLogoStorage, LogoStorage},
    web::{create_router, AppState},
};

async fn test_app(logo_storage: Option<Arc<dyn LogoStorage>>) -> Router {
    let db_path = std::env::temp_dir().join(format!("client-registry-test-{}.db", Uuid::new_v4()));
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite://{}?mode=rwc", db_path.display()))
        .await
        .unwrap();
    database::apply_migrations(&pool).await.unwrap();

    let repository = Arc::new(SqliteClientRepository::new(pool));
    let client_service = ClientService::new(repository, Arc::new(NullCache), logo_storage.clone());

    create_router(AppState {
        client_service,
        logo_storage,
    })
}

fn temp_logo_dir() -> PathBuf {
    std::env::temp_dir().join(format!("client-registry-logos-{}", Uuid::new_v4()))
}

// Helper function to send requests to the app
async fn send_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request_builder = Request::builder().method(method).uri(uri);

    let request = if let Some(body) = body {
        request_builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        request_builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

fn multipart_body(boundary: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"logo\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app(None).await;

    let (status, response) = send_request(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert!(response.get("timestamp").is_some());
}

#[tokio::test]
async fn test_full_client_lifecycle() {
    let app = test_app(None).await;

    // Create with a derived slug
    let (status, created) = send_request(
        &app,
        Method::POST,
        "/api/v1/clients",
        Some(json!({"name": "Acme Corp", "client_prefix": "ACME"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let slug = created["slug"].as_str().unwrap().to_string();
    let pattern = Regex::new(r"^acme-corp-[0-9a-f]{8}$").unwrap();
    assert!(pattern.is_match(&slug), "unexpected slug: {slug}");
    assert_eq!(created["logo_url"], "no-image.jpg");

    // The listing includes it
    let (status, listed) = send_request(&app, Method::GET, "/api/v1/clients", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Acme Corp"));

    // Get by slug returns the same record
    let (status, fetched) =
        send_request(&app, Method::GET, &format!("/api/v1/clients/{slug}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Acme Corp");

    // Patch a single field
    let (status, updated) = send_request(
        &app,
        Method::PUT,
        &format!("/api/v1/clients/{slug}"),
        Some(json!({"city": "NYC"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["city"], "NYC");
    assert_eq!(updated["name"], "Acme Corp");

    let (status, fetched) =
        send_request(&app, Method::GET, &format!("/api/v1/clients/{slug}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["city"], "NYC");

    // Delete, then the slug is gone
    let (status, _) =
        send_request(&app, Method::DELETE, &format!("/api/v1/clients/{slug}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
        send_request(&app, Method::GET, &format!("/api/v1/clients/{slug}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_with_explicit_slug_and_rename() {
    let app = test_app(None).await;

    let (status, created) = send_request(
        &app,
        Method::POST,
        "/api/v1/clients",
        Some(json!({"name": "Acme Corp", "slug": "acme"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "acme");

    // Changing the slug moves the record to the new key
    let (status, updated) = send_request(
        &app,
        Method::PUT,
        "/api/v1/clients/acme",
        Some(json!({"slug": "acme-renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], "acme-renamed");

    let (status, _) = send_request(&app, Method::GET, "/api/v1/clients/acme", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, fetched) =
        send_request(&app, Method::GET, "/api/v1/clients/acme-renamed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Acme Corp");
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let app = test_app(None).await;

    let (status, _) = send_request(
        &app,
        Method::POST,
        "/api/v1/clients",
        Some(json!({"name": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_slug_is_not_found() {
    let app = test_app(None).await;

    let (status, _) = send_request(&app, Method::GET, "/api/v1/clients/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_request(
        &app,
        Method::PUT,
        "/api/v1/clients/missing",
        Some(json!({"city": "NYC"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_request(&app, Method::DELETE, "/api/v1/clients/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logo_upload_and_serving() {
    let storage: Arc<dyn LogoStorage> = Arc::new(FilesystemLogoStorage::new(
        temp_logo_dir(),
        "http://localhost:3222".to_string(),
    ));
    let app = test_app(Some(storage)).await;

    let (status, created) = send_request(
        &app,
        Method::POST,
        "/api/v1/clients",
        Some(json!({"name": "Acme Corp"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let slug = created["slug"].as_str().unwrap().to_string();

    let boundary = "test-boundary";
    let logo_bytes = b"fake png bytes";
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/clients/{slug}/logo"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(
            boundary,
            "logo.png",
            "image/png",
            logo_bytes,
        )))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let uploaded: Value = serde_json::from_slice(&body_bytes).unwrap();

    let logo_url = uploaded["logo_url"].as_str().unwrap();
    assert!(logo_url.starts_with("http://localhost:3222/logos/"));
    assert!(logo_url.ends_with(".png"));

    // The record now carries the URL
    let (status, fetched) =
        send_request(&app, Method::GET, &format!("/api/v1/clients/{slug}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["logo_url"], logo_url);

    // The stored bytes are served back
    let file_name = logo_url.rsplit('/').next().unwrap();
    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/logos/{file_name}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "image/png",
        "served content type must follow the stored extension"
    );
    let served = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&served[..], logo_bytes);
}

#[tokio::test]
async fn test_logo_upload_without_storage_is_unavailable() {
    let app = test_app(None).await;

    let (status, created) = send_request(
        &app,
        Method::POST,
        "/api/v1/clients",
        Some(json!({"name": "Acme Corp"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let slug = created["slug"].as_str().unwrap().to_string();

    let boundary = "test-boundary";
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/clients/{slug}/logo"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(
            boundary,
            "logo.png",
            "image/png",
            b"fake png bytes",
        )))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_logo_upload_rejects_non_image_content() {
    let storage: Arc<dyn LogoStorage> = Arc::new(FilesystemLogoStorage::new(
        temp_logo_dir(),
        "http://localhost:3222".to_string(),
    ));
    let app = test_app(Some(storage)).await;

    let (_, created) = send_request(
        &app,
        Method::POST,
        "/api/v1/clients",
        Some(json!({"name": "Acme Corp"})),
    )
    .await;
    let slug = created["slug"].as_str().unwrap().to_string();

    let boundary = "test-boundary";
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/clients/{slug}/logo"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(
            boundary,
            "notes.txt",
            "text/plain",
            b"not an image",
        )))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
