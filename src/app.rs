use bon::Builder;
use std::{path::PathBuf, sync::Arc};
use tracing::info;

use crate::{
    adapters::{
        inbound::http::router::AppState,
        outbound::{
            persistence::{seed_sample_listings, InMemoryListingRepository, SqlListingRepository},
            storage::ObjectStoreImageAdapter,
        },
    },
    ports::{repositories::ListingRepository, storage::ImageStore},
    services::{ListingServiceBuilder, ListingServiceImpl, DEFAULT_IMAGE_ROOT},
};

/// Configuration for the application
#[derive(Debug, Clone, Builder)]
pub struct AppConfig {
    #[builder(default)]
    pub repository_backend: RepositoryBackend,

    #[builder(default)]
    pub image_backend: ImageBackend,

    /// Directory under the image backend's root that uploads go into
    #[builder(default = DEFAULT_IMAGE_ROOT.to_string(), into)]
    pub image_prefix: String,

    /// Insert the demo listings once the repository is ready
    #[builder(default)]
    pub seed_sample_listings: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Repository backend configuration
#[derive(Debug, Clone, Default)]
pub enum RepositoryBackend {
    #[default]
    InMemory,
    /// SQLite database, e.g. `sqlite://listings.db`
    Database { connection_string: String },
}

/// Where uploaded image bytes are written
#[derive(Debug, Clone, Default)]
pub enum ImageBackend {
    #[default]
    InMemory,
    /// Public directory served by the HTTP layer
    LocalFileSystem { root: PathBuf },
}

/// Application dependencies container
pub struct AppDependencies {
    pub listing_repository: Arc<dyn ListingRepository>,
    pub image_store: Arc<dyn ImageStore>,
}

/// Application services container
pub struct AppServices {
    pub listing_service: ListingServiceImpl,
}

impl AppServices {
    /// Router state sharing these services
    pub fn into_state(self) -> AppState {
        AppState::new(Arc::new(self.listing_service))
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure repository backend
    pub fn with_repository_backend(mut self, backend: RepositoryBackend) -> Self {
        self.config.repository_backend = backend;
        self
    }

    /// Configure image backend
    pub fn with_image_backend(mut self, backend: ImageBackend) -> Self {
        self.config.image_backend = backend;
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        let listing_repository = self.create_repository().await?;
        let image_store = self.create_image_store()?;

        if self.config.seed_sample_listings {
            seed_sample_listings(listing_repository.as_ref())
                .await
                .map_err(|e| AppError::RepositoryInit {
                    message: format!("Failed to seed sample listings: {}", e),
                })?;
        }

        Ok(AppDependencies {
            listing_repository,
            image_store,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies().await?;

        let listing_service = ListingServiceBuilder::new()
            .repository(deps.listing_repository)
            .images(deps.image_store)
            .image_root(self.config.image_prefix.clone())
            .build()
            .map_err(|message| AppError::ServiceInit {
                message: message.to_string(),
            })?;

        Ok(AppServices { listing_service })
    }

    /// Create the repository based on configuration
    async fn create_repository(&self) -> Result<Arc<dyn ListingRepository>, AppError> {
        match &self.config.repository_backend {
            RepositoryBackend::InMemory => {
                info!("Using in-memory listing repository");
                Ok(Arc::new(InMemoryListingRepository::new()))
            }
            RepositoryBackend::Database { connection_string } => {
                let repository = SqlListingRepository::connect(connection_string)
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("Failed to connect to database: {}", e),
                    })?;

                info!("Using SQLite listing repository");
                Ok(Arc::new(repository))
            }
        }
    }

    /// Create the image store based on configuration
    fn create_image_store(&self) -> Result<Arc<dyn ImageStore>, AppError> {
        match &self.config.image_backend {
            ImageBackend::InMemory => Ok(Arc::new(ObjectStoreImageAdapter::in_memory())),
            ImageBackend::LocalFileSystem { root } => {
                let adapter =
                    ObjectStoreImageAdapter::local(root).map_err(|e| AppError::StorageInit {
                        message: e.to_string(),
                    })?;
                Ok(Arc::new(adapter))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Repository initialization error: {message}")]
    RepositoryInit { message: String },

    #[error("Service initialization error: {message}")]
    ServiceInit { message: String },
}

/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_repository_backend(RepositoryBackend::InMemory)
        .with_image_backend(ImageBackend::InMemory)
        .build()
        .await
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_config(config_from_env()?)
        .build()
        .await
}

/// Read `REPOSITORY_BACKEND`, `DATABASE_URL`, `PUBLIC_DIR`, `IMAGE_PREFIX`
/// and `SEED_SAMPLE_LISTINGS`
pub fn config_from_env() -> Result<AppConfig, AppError> {
    config_from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from any key/value source using the environment's keys
pub fn config_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, AppError> {
    let repository_backend = match lookup("REPOSITORY_BACKEND").as_deref() {
        Some("database") | Some("db") => {
            let connection_string =
                lookup("DATABASE_URL").ok_or_else(|| AppError::Configuration {
                    message: "DATABASE_URL environment variable required".to_string(),
                })?;
            RepositoryBackend::Database { connection_string }
        }
        Some("memory") | None => RepositoryBackend::InMemory,
        Some(other) => {
            return Err(AppError::Configuration {
                message: format!("Unknown repository backend: {}", other),
            })
        }
    };

    let image_backend = match lookup("PUBLIC_DIR") {
        Some(root) => ImageBackend::LocalFileSystem { root: root.into() },
        None => ImageBackend::InMemory,
    };

    let image_prefix = lookup("IMAGE_PREFIX").unwrap_or_else(|| DEFAULT_IMAGE_ROOT.to_string());

    let seed_sample_listings = lookup("SEED_SAMPLE_LISTINGS")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    Ok(AppConfig::builder()
        .repository_backend(repository_backend)
        .image_backend(image_backend)
        .image_prefix(image_prefix)
        .seed_sample_listings(seed_sample_listings)
        .build())
}
