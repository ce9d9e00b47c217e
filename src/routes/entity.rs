use std::sync::Arc;

use crate::{
    models::{
        dto::{CreateEntityInfo, EntityPageResponse, EntityResponse, ListEntitiesQuery},
        page::DEFAULT_PAGE_SIZE,
        Error,
    },
    AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(
    list_entities_handler,
    create_entity_handler,
    get_entity_handler,
    delete_entity_handler
))]
/// Defines the OpenAPI spec for entity endpoints
pub struct EntityApi;

/// Used to group entity endpoints together in the OpenAPI documentation
pub const ENTITY_API_GROUP: &str = "ENTITY";

/// Builds a router for all the entity routes
pub fn entity_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_entities_handler).post(create_entity_handler))
        .route("/:id", get(get_entity_handler).delete(delete_entity_handler))
}

#[utoipa::path(
    get,
    path = "/api/entities",
    tag = ENTITY_API_GROUP,
    params(
        ("page" = Option<i64>, Query, description = "0-based page index, defaults to 0"),
        ("size" = Option<i64>, Query, description = "Page size of at least 1, capped at 2000, defaults to 20")
    ),
    responses(
        (status = 200, description = "One page of entities", body = EntityPageResponse),
        (status = 400, description = "Invalid page or size"),
    )
)]
pub async fn list_entities_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListEntitiesQuery>, QueryRejection>,
) -> Result<Json<EntityPageResponse>, Error> {
    let Query(query) = query?;
    let page = state
        .entities
        .list(
            query.page.unwrap_or(0),
            query.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(EntityPageResponse::from(page)))
}

#[utoipa::path(
    post,
    path = "/api/entities",
    tag = ENTITY_API_GROUP,
    request_body = CreateEntityInfo,
    responses(
        (status = 200, description = "Entity successfully created", body = EntityResponse),
        (status = 400, description = "Malformed body or blank name"),
    )
)]
pub async fn create_entity_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateEntityInfo>, JsonRejection>,
) -> Result<Json<EntityResponse>, Error> {
    let Json(body) = body?;
    if body.name.trim().is_empty() {
        return Err(Error::new(StatusCode::BAD_REQUEST, "name must not be blank"));
    }
    let entity = state.entities.create(&body.name).await?;
    Ok(Json(EntityResponse::from(entity)))
}

#[utoipa::path(
    get,
    path = "/api/entities/{id}",
    tag = ENTITY_API_GROUP,
    responses(
        (status = 200, description = "Entity found", body = EntityResponse),
        (status = 404, description = "Entity not found"),
    ),
    params(
        ("id" = i64, Path, description = "Entity ID")
    )
)]
pub async fn get_entity_handler(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<EntityResponse>, Error> {
    let Path(id) = id?;
    let entity = state.entities.get_by_id(id).await?;
    let entity = entity.ok_or((StatusCode::NOT_FOUND, "Entity not found"))?;

    Ok(Json(EntityResponse::from(entity)))
}

#[utoipa::path(
    delete,
    path = "/api/entities/{id}",
    tag = ENTITY_API_GROUP,
    responses(
        (status = 204, description = "Entity deleted, or it did not exist"),
    ),
    params(
        ("id" = i64, Path, description = "Entity ID")
    )
)]
pub async fn delete_entity_handler(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, Error> {
    let Path(id) = id?;
    state.entities.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
