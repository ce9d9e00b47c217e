use std::sync::Arc;

use tracing::{info, instrument};

use crate::database::{EntityStore, Result};
use crate::models::{Entity, Page};

/// Thin orchestration over an [`EntityStore`]. Errors pass through untouched.
#[derive(Clone)]
pub struct EntityService {
    store: Arc<dyn EntityStore>,
}

impl EntityService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: i64, size: i64) -> Result<Page<Entity>> {
        self.store.list_page(page, size).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Entity>> {
        self.store.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Entity>> {
        self.store.find_by_name(name).await
    }

    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<Entity> {
        let entity = self.store.create(name).await?;
        info!(id = entity.id, "entity created");
        Ok(entity)
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.store.delete_by_id(id).await?;
        info!(id, "entity deleted");
        Ok(())
    }
}
