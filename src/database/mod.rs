mod memory;

pub use memory::MemoryDatabase;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::models::{Entity, Page, PageRequest, StoreError};
use crate::Config;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Storage accessor for entities. Implementations own all persisted state and
/// must be safe to call from concurrent requests.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Slice of all entities ordered by ascending id
    async fn list_page(&self, page: i64, size: i64) -> Result<Page<Entity>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Entity>>;
    /// Exact match on name; the lowest id wins when several entities share it
    async fn find_by_name(&self, name: &str) -> Result<Option<Entity>>;
    async fn create(&self, name: &str) -> Result<Entity>;
    /// Replaces the name of an existing row, or inserts a new row with a fresh id
    async fn save(&self, entity: &Entity) -> Result<Entity>;
    /// Removing an id that does not exist is not an error
    async fn delete_by_id(&self, id: i64) -> Result<()>;
    /// Succeeds when the backing storage can serve requests
    async fn ping(&self) -> Result<()>;
}

/// Connects to a PostgreSQL database with the settings in `config`, returning a connection pool for accessing it
pub async fn connect_sqlx(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .acquire_timeout(config.db_acquire_timeout)
        .idle_timeout(config.db_idle_timeout)
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect(&config.db_url)
        .await
}

/// Applies the embedded migrations under `migrations/`
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

pub struct PostgreDatabase {
    sqlx_db: PgPool,
}

impl PostgreDatabase {
    pub fn new(sqlx_db: PgPool) -> Self {
        PostgreDatabase { sqlx_db }
    }
}

#[async_trait]
impl EntityStore for PostgreDatabase {
    async fn list_page(&self, page: i64, size: i64) -> Result<Page<Entity>> {
        let request = PageRequest::new(page, size)?;
        let rows = sqlx::query_as::<_, Entity>(
            r#"
            SELECT id, name
            FROM entity
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(request.size)
        .bind(request.offset()?)
        .fetch_all(&self.sqlx_db)
        .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entity")
            .fetch_one(&self.sqlx_db)
            .await?;
        Ok(Page::new(rows, total, request))
    }

    /// Get an entity by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Entity>> {
        let row = sqlx::query_as::<_, Entity>(
            r#"
            SELECT id, name
            FROM entity
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.sqlx_db)
        .await?;
        Ok(row)
    }

    /// Get an entity by name
    async fn find_by_name(&self, name: &str) -> Result<Option<Entity>> {
        let row = sqlx::query_as::<_, Entity>(
            r#"
            SELECT id, name
            FROM entity
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.sqlx_db)
        .await?;
        Ok(row)
    }

    // Create a new entity, letting the table assign its id
    async fn create(&self, name: &str) -> Result<Entity> {
        let row = sqlx::query_as::<_, Entity>(
            r#"
            INSERT INTO entity (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.sqlx_db)
        .await?;
        Ok(row)
    }

    async fn save(&self, entity: &Entity) -> Result<Entity> {
        let updated = sqlx::query_as::<_, Entity>(
            r#"
            UPDATE entity
            SET name = $1
            WHERE id = $2
            RETURNING id, name
            "#,
        )
        .bind(&entity.name)
        .bind(entity.id)
        .fetch_optional(&self.sqlx_db)
        .await?;

        match updated {
            Some(row) => Ok(row),
            None => self.create(&entity.name).await,
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM entity WHERE id = $1")
            .bind(id)
            .execute(&self.sqlx_db)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.sqlx_db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Connects to `TEST_DATABASE_URL`; tests return early when it is not set
    async fn test_store() -> Option<PostgreDatabase> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect test database");
        migrate(&pool).await.expect("migrate test database");
        Some(PostgreDatabase::new(pool))
    }

    #[tokio::test]
    async fn postgres_create_then_find() {
        let Some(store) = test_store().await else {
            return;
        };
        let created = store.create("postgres create").await.unwrap();
        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created.clone()));

        store.delete_by_id(created.id).await.unwrap();
        store.delete_by_id(created.id).await.unwrap();
        assert_eq!(store.find_by_id(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn postgres_save_updates_existing_row() {
        let Some(store) = test_store().await else {
            return;
        };
        let created = store.create("before").await.unwrap();
        let saved = store
            .save(&Entity {
                id: created.id,
                name: "after".into(),
            })
            .await
            .unwrap();
        assert_eq!(saved.id, created.id);
        assert_eq!(saved.name, "after");
        store.delete_by_id(created.id).await.unwrap();
    }

    #[tokio::test]
    async fn postgres_ping_succeeds() {
        let Some(store) = test_store().await else {
            return;
        };
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn closed_pool_is_unavailable() {
        let Some(store) = test_store().await else {
            return;
        };
        store.sqlx_db.close().await;
        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn postgres_rejects_negative_page() {
        let Some(store) = test_store().await else {
            return;
        };
        let err = store.list_page(-1, 10).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }
}
