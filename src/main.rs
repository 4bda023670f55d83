//! Admin server: loads the site content, serves the admin API, and flushes pending
//! remote writes on shutdown.

use cozy_store::storage::{self, FileCache, LocalCache};
use cozy_store::{transport, AppConfig, Collections, ContentState, PersistenceCoordinator};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    cozy_store::infra::logging::init(cozy_store::infra::config::log_json());
    let config = AppConfig::from_env();

    // --- Backend selection (once per session) ---
    let active = storage::select_backend(&config).await;
    let cache: Arc<dyn LocalCache> = Arc::new(FileCache::new(&config.cache_dir));
    let coordinator = Arc::new(PersistenceCoordinator::new(
        active,
        cache,
        config.save_delay,
    ));

    // --- Load content: remote, else cache, else built-in defaults ---
    let content = ContentState::bootstrap(coordinator.clone(), Collections::defaults()).await;

    if config.admin_token.is_none() {
        warn!("ADMIN_TOKEN is not set; write and admin routes will refuse every request");
    }
    let app_state = transport::http::AppState::new(content.clone(), config.admin_token.clone());
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "admin API listening");
    info!("Swagger UI available at /swagger-ui");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, flushing pending writes");
            match coordinator.flush().await {
                Ok(()) => info!("all pending writes synced"),
                Err(e) => error!(error = %e, "shutdown flush incomplete; local cache holds the latest content"),
            }
        }
    }

    Ok(())
}
