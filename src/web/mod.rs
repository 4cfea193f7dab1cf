//! Web layer module
//!
//! Thin axum handlers over the service layer: handlers validate the request
//! envelope, delegate to [`ClientService`] and map errors to status codes.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, services::ClientService, storage::LogoStorage};

pub mod api;
pub mod handlers;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub client_service: ClientService,
    pub logo_storage: Option<Arc<dyn LogoStorage>>,
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(
        config: &Config,
        client_service: ClientService,
        logo_storage: Option<Arc<dyn LogoStorage>>,
    ) -> Result<Self> {
        let app = create_router(AppState {
            client_service,
            logo_storage,
        });

        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;

        Ok(Self { app, addr })
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Builds the full router; public so tests can drive it directly.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_v1_routes())
        .route("/logos/:file_name", get(handlers::serve_logo))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(api::list_clients).post(api::create_client))
        .route(
            "/clients/:slug",
            get(api::get_client_by_slug)
                .put(api::update_client)
                .delete(api::delete_client),
        )
        .route("/clients/:slug/logo", post(api::upload_client_logo))
}
