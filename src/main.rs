use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client_registry::{
    cache::{ClientCache, NullCache, RedisCache},
    config::Config,
    database::Database,
    repositories::SqliteClientRepository,
    services::ClientService,
    storage::{FilesystemLogoStorage, LogoStorage},
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "client-registry")]
#[command(version = "0.1.0")]
#[command(about = "A client record service with slug-based lookups, Redis caching and logo storage")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Database URL (overrides config file)
    #[arg(short = 'd', long, value_name = "URL")]
    database_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("client_registry={},tower_http=trace", cli.log_level)
    } else {
        format!("client_registry={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting client registry service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }

    info!("Using database: {}", config.database.url);

    let database = Database::new(&config.database).await?;
    database.migrate().await?;
    info!("Database connection established and migrations applied");

    // The cache is optional: an unreachable backend degrades to no caching.
    let cache: Arc<dyn ClientCache> = if config.cache.enabled {
        match RedisCache::connect(&config.cache.url).await {
            Ok(cache) => {
                info!("Connected to Redis at {}", config.cache.url);
                Arc::new(cache)
            }
            Err(e) => {
                warn!("Redis connection failed, continuing without caching: {}", e);
                Arc::new(NullCache)
            }
        }
    } else {
        info!("Caching disabled by configuration");
        Arc::new(NullCache)
    };

    let logo_storage: Arc<dyn LogoStorage> = Arc::new(FilesystemLogoStorage::new(
        config.storage.uploaded_logo_path.clone(),
        config.web.base_url.clone(),
    ));
    info!(
        "Logo storage initialized at {}",
        config.storage.uploaded_logo_path.display()
    );

    let repository = Arc::new(SqliteClientRepository::new(database.pool()));
    let client_service = ClientService::new(repository, cache, Some(logo_storage.clone()));

    let web_server = WebServer::new(&config, client_service, Some(logo_storage))?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
