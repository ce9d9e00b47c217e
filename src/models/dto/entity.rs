use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Entity, Page};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEntityInfo {
    #[schema(example = "Entity1")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct EntityResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Entity1")]
    pub name: String,
}

impl From<Entity> for EntityResponse {
    fn from(entity: Entity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListEntitiesQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityPageResponse {
    pub content: Vec<EntityResponse>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl From<Page<Entity>> for EntityPageResponse {
    fn from(page: Page<Entity>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(EntityResponse::from);
        Self {
            content: page.items,
            page: page.page,
            size: page.size,
            total_elements: page.total,
            total_pages,
        }
    }
}
