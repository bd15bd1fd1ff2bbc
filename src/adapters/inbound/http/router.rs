use axum::{Router, extract::DefaultBodyLimit, routing::get};
use std::{path::Path, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::handlers::{create_listing, delete_listing, get_listing, list_listings, update_listing};
use crate::ports::services::ListingService;

/// Upload ceiling when none is configured
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub listing_service: Arc<dyn ListingService>,
}

impl AppState {
    pub fn new(listing_service: Arc<dyn ListingService>) -> Self {
        Self { listing_service }
    }
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    create_router_with_limit(state, DEFAULT_MAX_UPLOAD_BYTES)
}

/// Same as [`create_router`] with an explicit request body ceiling
pub fn create_router_with_limit(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .nest("/api/listings", create_listing_router())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Add state for dependency injection
        .with_state(state)
}

/// Create a router with just listing operations
pub fn create_listing_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_listings).post(create_listing))
        .route(
            "/{id}",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
}

/// Serve the public directory (stored images included) for any path the
/// API does not claim
pub fn with_static_files(router: Router, public_dir: impl AsRef<Path>) -> Router {
    router.fallback_service(ServeDir::new(public_dir.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::outbound::{
            persistence::InMemoryListingRepository, storage::ObjectStoreImageAdapter,
        },
        services::ListingServiceImpl,
    };
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let service = ListingServiceImpl::new(
            Arc::new(InMemoryListingRepository::new()),
            Arc::new(ObjectStoreImageAdapter::in_memory()),
        );
        create_router(AppState::new(Arc::new(service)))
    }

    #[tokio::test]
    async fn test_list_route_is_mounted() {
        let response = router()
            .oneshot(Request::get("/api/listings").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_listing_is_404() {
        let response = router()
            .oneshot(Request::get("/api/listings/7").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_fallback_serves_public_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images").join("default.jpg"), b"jpeg").unwrap();

        let app = with_static_files(router(), dir.path());
        let response = app
            .oneshot(
                Request::get("/images/default.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
