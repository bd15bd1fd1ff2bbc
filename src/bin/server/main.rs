use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use listing_catalog::{
    adapters::inbound::http::router::{create_router_with_limit, with_static_files},
    app::{AppBuilder, AppConfig, ImageBackend, RepositoryBackend},
};
use std::{net::SocketAddr, path::PathBuf};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Memory,
    #[value(alias = "db")]
    Database,
}

#[derive(Parser, Debug)]
#[command(name = "listing-catalog-server")]
#[command(about = "Real-estate listing catalog HTTP server", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3001")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Repository backend type
    #[arg(long, env = "REPOSITORY_BACKEND", value_enum, default_value = "memory")]
    repository_backend: Backend,

    /// Database URL for the database backend (SQLite)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Directory served as static files; uploaded images are written below it
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    public_dir: PathBuf,

    /// Subdirectory of the public directory for uploaded images
    #[arg(long, env = "IMAGE_PREFIX", default_value = "images")]
    image_prefix: String,

    /// Insert the demo listings on startup
    #[arg(long, env = "SEED_SAMPLE_LISTINGS", default_value_t = false)]
    seed: bool,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    max_upload_bytes: usize,

    /// Log level or filter directive (e.g. `info,sqlx=warn`)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let repository_backend = match self.repository_backend {
            Backend::Memory => RepositoryBackend::InMemory,
            Backend::Database => {
                let connection_string = self
                    .database_url
                    .clone()
                    .context("DATABASE_URL is required for database backend")?;
                RepositoryBackend::Database { connection_string }
            }
        };

        Ok(AppConfig::builder()
            .repository_backend(repository_backend)
            .image_backend(ImageBackend::LocalFileSystem {
                root: self.public_dir.clone(),
            })
            .image_prefix(self.image_prefix.clone())
            .seed_sample_listings(self.seed)
            .build())
    }

    fn init_logging(&self) -> Result<()> {
        let env_filter = EnvFilter::try_new(&self.log_level)
            .with_context(|| format!("Invalid log level: {}", self.log_level))?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting listing catalog server");
    info!("Repository backend: {:?}", cli.repository_backend);
    info!("Public directory: {}", cli.public_dir.display());

    let config = cli.to_app_config()?;

    let app_services = AppBuilder::new()
        .with_config(config)
        .build()
        .await
        .context("Failed to build application")?;

    let router = create_router_with_limit(app_services.into_state(), cli.max_upload_bytes);
    let router = with_static_files(router, &cli.public_dir);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to start server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "listing-catalog-server",
            "--port",
            "8080",
            "--repository-backend",
            "database",
            "--database-url",
            "sqlite://listings.db",
            "--seed",
        ]);

        assert_eq!(cli.port, 8080);
        assert_eq!(cli.repository_backend, Backend::Database);
        assert_eq!(cli.database_url.as_deref(), Some("sqlite://listings.db"));
        assert!(cli.seed);
    }

    #[test]
    fn test_memory_config() {
        let cli = Cli::parse_from(["listing-catalog-server"]);

        let config = cli.to_app_config().unwrap();
        assert!(matches!(config.repository_backend, RepositoryBackend::InMemory));
        match config.image_backend {
            ImageBackend::LocalFileSystem { root } => assert_eq!(root, PathBuf::from("public")),
            _ => panic!("Expected local image backend"),
        }
        assert_eq!(config.image_prefix, "images");
    }

    #[test]
    fn test_database_requires_url() {
        let cli = Cli::parse_from([
            "listing-catalog-server",
            "--repository-backend",
            "database",
        ]);
        assert!(cli.to_app_config().is_err());
    }
}
