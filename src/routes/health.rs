use std::sync::Arc;

use axum::{extract::State, Json};
use utoipa::OpenApi;

use crate::{
    models::{dto::HealthResponse, Error},
    AppState,
};

#[derive(OpenApi)]
#[openapi(paths(health_checker_handler))]
/// Defines the OpenAPI spec for the health check
pub struct HealthApi;

/// Reports UP only when the entity store answers
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "HEALTH",
    responses(
        (status = 200, description = "Service and storage are reachable", body = HealthResponse),
        (status = 503, description = "Storage is unavailable"),
    )
)]
pub async fn health_checker_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, Error> {
    state.entities.ping().await?;
    let storage = if state.config.uses_memory_store() {
        "memory"
    } else {
        "postgres"
    };
    Ok(Json(HealthResponse {
        status: "UP".to_string(),
        storage: storage.to_string(),
    }))
}
