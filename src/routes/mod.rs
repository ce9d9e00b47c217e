mod entity;
mod health;
mod swagger;
use crate::database::{self, EntityStore, MemoryDatabase, PostgreDatabase};
use crate::services::EntityService;
use health::health_checker_handler;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{AppState, Config};

use axum::{routing::get, Router};
use std::sync::Arc;

/// Connects the configured store and builds the full application router
pub async fn make_app(config: Config) -> anyhow::Result<Router> {
    let store: Arc<dyn EntityStore> = if config.uses_memory_store() {
        warn!("Using the in-memory entity store; data is lost on shutdown");
        Arc::new(MemoryDatabase::new())
    } else {
        info!("Connecting to PostgreSQL...");
        let sqlx_db_connection = database::connect_sqlx(&config).await?;
        info!("Connected to PostgreSQL!");
        database::migrate(&sqlx_db_connection).await?;
        Arc::new(PostgreDatabase::new(sqlx_db_connection))
    };

    if config.token_service().is_some() {
        info!(
            maxage_minutes = config.jwt_maxage_minutes,
            "Token service configured"
        );
    } else {
        info!("JWT_SECRET not set, token service disabled");
    }

    let state = Arc::new(AppState {
        entities: EntityService::new(store),
        config,
    });
    Ok(build_router(state))
}

/// Routes, documentation and request tracing over an already-built state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api", get(health_checker_handler))
        .route("/api/health", get(health_checker_handler))
        .nest("/api/entities", entity::entity_routes())
        .merge(swagger::build_documentation())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn make_app_serves_memory_store() {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("memory".to_string()),
            "JWT_SECRET" => Some("s3cret".to_string()),
            _ => None,
        })
        .unwrap();
        let app = make_app(config).await.unwrap();

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "UP");
        assert_eq!(body["storage"], "memory");
    }
}
