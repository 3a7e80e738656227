pub mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

use crate::activities::ActivityService;
use crate::db::Database;
use crate::fallback::FallbackStore;
use crate::models::Config;
use crate::config;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) service: Arc<ActivityService>,
}

pub(crate) fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/activities", get(handlers::list_activities_handler))
        .route(
            "/activities/{activity_name}/signup",
            post(handlers::signup_handler),
        )
        .route(
            "/activities/{activity_name}/unregister",
            delete(handlers::unregister_handler),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

pub async fn serve(cfg: Config, addr: &str) -> Result<()> {
    let url = config::database_url(&cfg);
    let db = Database::connect_lazy(&url)
        .with_context(|| format!("Invalid database URL {url}"))?;
    info!("Using database {}", url);

    let state = AppState {
        service: Arc::new(ActivityService::new(db, FallbackStore::seeded())),
    };
    let app = router(state, &cfg.web.static_dir);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Activities API listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
