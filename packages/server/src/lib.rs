pub mod complaint;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use common::config::StorageBackend;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AppConfig, CorsConfig};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HotelOps Complaints API",
        version = "1.0.0",
        description = "Worker and customer complaints with photo evidence"
    ),
    tags(
        (name = "Complaints", description = "Complaint creation, lookup, status changes and deletion"),
    ),
)]
struct ApiDoc;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));

    if config.allow_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Serve filesystem-backed images when their public URL is a local path.
fn media_router(config: &AppConfig) -> Option<axum::Router> {
    let storage = &config.storage;
    if storage.backend != StorageBackend::Filesystem {
        return None;
    }
    let prefix = storage.filesystem.public_base_url.trim_end_matches('/');
    if !prefix.starts_with('/') {
        return None;
    }

    let dir = storage.filesystem.base_path.join("complaints");
    Some(axum::Router::new().nest_service(&format!("{prefix}/complaints"), ServeDir::new(dir)))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes(&state.config))
        .split_for_parts();

    let media = media_router(&state.config);
    let cors = cors_layer(&state.config.server.cors);

    let mut app = router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api));
    if let Some(media) = media {
        app = app.merge(media);
    }

    app.layer(cors)
}
