use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EntityStore, Result};
use crate::models::{Entity, Page, PageRequest};

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Entity>,
}

impl Table {
    fn insert(&mut self, name: &str) -> Entity {
        self.last_id += 1;
        let entity = Entity {
            id: self.last_id,
            name: name.to_owned(),
        };
        self.rows.insert(entity.id, entity.clone());
        entity
    }
}

/// Process-local store keyed by id. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryDatabase {
    table: RwLock<Table>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryDatabase {
    async fn list_page(&self, page: i64, size: i64) -> Result<Page<Entity>> {
        let request = PageRequest::new(page, size)?;
        let offset = usize::try_from(request.offset()?).unwrap_or(usize::MAX);
        let table = self.table.read().await;
        let items = table
            .rows
            .values()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, table.rows.len() as i64, request))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Entity>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Entity>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|e| e.name == name).cloned())
    }

    async fn create(&self, name: &str) -> Result<Entity> {
        Ok(self.table.write().await.insert(name))
    }

    async fn save(&self, entity: &Entity) -> Result<Entity> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&entity.id) {
            Some(row) => {
                row.name = entity.name.clone();
                Ok(row.clone())
            }
            None => Ok(table.insert(&entity.name)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.table.write().await.rows.remove(&id);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let _table = self.table.read().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoreError;
    use std::sync::Arc;

    async fn seeded(names: &[&str]) -> MemoryDatabase {
        let store = MemoryDatabase::new();
        for name in names {
            store.create(name).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn ping_succeeds() {
        seeded(&["a"]).await.ping().await.unwrap();
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = seeded(&[]).await;
        let first = store.create("Entity1").await.unwrap();
        let second = store.create("Entity2").await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn create_then_find_returns_same_entity() {
        let store = seeded(&[]).await;
        let created = store.create("Entity1").await.unwrap();
        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn find_by_id_misses_are_empty() {
        let store = seeded(&["a"]).await;
        assert_eq!(store.find_by_id(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn find_by_name_is_exact() {
        let store = seeded(&["Entity One", "Entity Two"]).await;
        let found = store.find_by_name("Entity One").await.unwrap().unwrap();
        assert_eq!(found.name, "Entity One");
        assert_eq!(store.find_by_name("entity one").await.unwrap(), None);
        assert_eq!(store.find_by_name("Entity").await.unwrap(), None);
    }

    #[tokio::test]
    async fn find_by_name_prefers_lowest_id() {
        let store = seeded(&["other", "dup", "dup"]).await;
        let found = store.find_by_name("dup").await.unwrap().unwrap();
        assert_eq!(found.id, 2);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = seeded(&["a", "b"]).await;
        store.delete_by_id(1).await.unwrap();
        let after_first = store.list_page(0, 10).await.unwrap();
        store.delete_by_id(1).await.unwrap();
        let after_second = store.list_page(0, 10).await.unwrap();

        assert_eq!(after_first, after_second);
        assert_eq!(store.find_by_id(1).await.unwrap(), None);
        // never existed
        store.delete_by_id(99).await.unwrap();
        assert_eq!(store.find_by_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = seeded(&["a", "b"]).await;
        store.delete_by_id(2).await.unwrap();
        assert_eq!(store.create("c").await.unwrap().id, 3);
    }

    #[tokio::test]
    async fn pages_cover_every_entity_once() {
        let names: Vec<String> = (0..23).map(|i| format!("entity-{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let store = seeded(&refs).await;

        let mut seen = Vec::new();
        let mut page = 0;
        loop {
            let slice = store.list_page(page, 5).await.unwrap();
            assert!(slice.items.len() <= 5);
            assert_eq!(slice.total, 23);
            if slice.items.is_empty() {
                break;
            }
            seen.extend(slice.items.into_iter().map(|e| e.id));
            page += 1;
        }
        assert_eq!(page, 5);
        assert_eq!(seen, (1..=23).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn list_page_rejects_negative_arguments() {
        let store = seeded(&["a"]).await;
        assert!(matches!(
            store.list_page(-1, 5).await,
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.list_page(0, -5).await,
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn save_updates_existing_or_inserts() {
        let store = seeded(&["a"]).await;
        let updated = store
            .save(&Entity {
                id: 1,
                name: "renamed".into(),
            })
            .await
            .unwrap();
        assert_eq!(updated, Entity { id: 1, name: "renamed".into() });

        let inserted = store
            .save(&Entity {
                id: 500,
                name: "fresh".into(),
            })
            .await
            .unwrap();
        assert_eq!(inserted.id, 2);
        assert_eq!(store.find_by_id(500).await.unwrap(), None);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let store = Arc::new(MemoryDatabase::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(&format!("n{i}")).await.unwrap().id })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        assert_eq!(ids, (1..=16).collect::<Vec<i64>>());
    }
}
