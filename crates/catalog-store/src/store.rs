//! Main store implementation for database operations.
//!
//! The `Store` type provides all CRUD operations for users and items.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::{StoreError, StoreResult};
use crate::models::{ItemRow, NewItem, NewUser, UserRow};
use crate::schema;

/// Configuration for connecting to the database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Run migrations on connect.
    pub run_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://catalog.db".to_string(),
            max_connections: 10,
            run_migrations: true,
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `DATABASE_URL` - Required database connection string
    /// - `DATABASE_MAX_CONNECTIONS` - Optional, defaults to 10
    /// - `DATABASE_RUN_MIGRATIONS` - Optional, defaults to true
    pub fn from_env() -> StoreResult<Self> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            StoreError::Config("DATABASE_URL environment variable not set".to_string())
        })?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let run_migrations = std::env::var("DATABASE_RUN_MIGRATIONS")
            .ok()
            .map(|s| s.to_lowercase() != "false" && s != "0")
            .unwrap_or(true);

        Ok(Self {
            database_url,
            max_connections,
            run_migrations,
        })
    }

    /// In-memory configuration for tests.
    ///
    /// Limited to a single connection: every pooled connection would
    /// otherwise open its own private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        }
    }
}

/// Database store for the catalog service.
///
/// Provides type-safe operations for the users and items tables.
/// Cloning is cheap; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Connect to the database with the given configuration.
    ///
    /// Creates the database file if it does not exist, and optionally
    /// runs migrations if `config.run_migrations` is true.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        tracing::info!("Connecting to database...");

        let options =
            SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database");

        if config.run_migrations {
            schema::run_migrations(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Create a store from an existing connection pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ==================== User Operations ====================

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>> {
        Ok(sqlx::query_as::<_, UserRow>(
            r#"
            SELECT username, name, password_hash, location, gender
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Insert a new user.
    ///
    /// Callers check for an existing username before inserting; the
    /// primary key is the final arbiter.
    pub async fn insert_user(&self, user: &NewUser) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (username, name, password_hash, location, gender)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.location)
        .bind(user.gender.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== Item Operations ====================

    /// List all items ordered by id ascending.
    pub async fn list_items(&self) -> StoreResult<Vec<ItemRow>> {
        Ok(
            sqlx::query_as::<_, ItemRow>(r#"SELECT id, name, description FROM items ORDER BY id"#)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Get a single item by id.
    pub async fn get_item(&self, id: i64) -> StoreResult<Option<ItemRow>> {
        Ok(
            sqlx::query_as::<_, ItemRow>(
                r#"SELECT id, name, description FROM items WHERE id = $1"#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?,
        )
    }

    /// Insert a new item, returning the assigned id.
    pub async fn insert_item(&self, item: &NewItem) -> StoreResult<i64> {
        let result = sqlx::query(r#"INSERT INTO items (name, description) VALUES ($1, $2)"#)
            .bind(item.name.as_deref())
            .bind(item.description.as_deref())
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Replace an item's name and description, returning rows affected.
    ///
    /// Zero rows affected means no item with this id exists.
    pub async fn update_item(&self, id: i64, item: &NewItem) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = $1, description = $2
            WHERE id = $3
            "#,
        )
        .bind(item.name.as_deref())
        .bind(item.description.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete an item by id, returning rows affected.
    pub async fn delete_item(&self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query(r#"DELETE FROM items WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    async fn test_store() -> Store {
        Store::connect(StoreConfig::in_memory()).await.unwrap()
    }

    fn sample_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            name: "Sample User".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            location: "Zurich".to_string(),
            gender: Gender::Other,
        }
    }

    #[tokio::test]
    async fn test_schema_applied_on_connect() {
        let store = test_store().await;
        assert!(schema::is_schema_initialized(store.pool()).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_and_get_user() {
        let store = test_store().await;

        store.insert_user(&sample_user("alice")).await.unwrap();

        let user = store.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.name, "Sample User");
        assert_eq!(user.gender, "Other");
    }

    #[tokio::test]
    async fn test_get_user_missing_returns_none() {
        let store = test_store().await;
        assert!(store.get_user_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_by_primary_key() {
        let store = test_store().await;

        store.insert_user(&sample_user("bob")).await.unwrap();
        let result = store.insert_user(&sample_user("bob")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_insert_item_assigns_increasing_ids() {
        let store = test_store().await;

        let first = store
            .insert_item(&NewItem {
                name: Some("first".to_string()),
                description: None,
            })
            .await
            .unwrap();
        let second = store
            .insert_item(&NewItem {
                name: Some("second".to_string()),
                description: None,
            })
            .await
            .unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_list_items_ordered_by_id() {
        let store = test_store().await;

        for name in ["a", "b", "c"] {
            store
                .insert_item(&NewItem {
                    name: Some(name.to_string()),
                    description: None,
                })
                .await
                .unwrap();
        }

        let items = store.list_items().await.unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_item_nulls_round_trip() {
        let store = test_store().await;

        let id = store.insert_item(&NewItem::default()).await.unwrap();

        let item = store.get_item(id).await.unwrap().unwrap();
        assert!(item.name.is_none());
        assert!(item.description.is_none());
    }

    #[tokio::test]
    async fn test_update_item_replaces_fields() {
        let store = test_store().await;

        let id = store
            .insert_item(&NewItem {
                name: Some("before".to_string()),
                description: Some("old".to_string()),
            })
            .await
            .unwrap();

        let affected = store
            .update_item(
                id,
                &NewItem {
                    name: Some("after".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let item = store.get_item(id).await.unwrap().unwrap();
        assert_eq!(item.name.as_deref(), Some("after"));
        assert!(item.description.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_item_affects_zero_rows() {
        let store = test_store().await;

        let affected = store.update_item(9999, &NewItem::default()).await.unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_delete_item() {
        let store = test_store().await;

        let id = store
            .insert_item(&NewItem {
                name: Some("doomed".to_string()),
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(store.delete_item(id).await.unwrap(), 1);
        assert!(store.get_item(id).await.unwrap().is_none());

        // Deleting again is a no-op at the store level.
        assert_eq!(store.delete_item(id).await.unwrap(), 0);
    }
}
