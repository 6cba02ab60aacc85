//! catalog-store: SQLite storage layer for the catalog service
//!
//! This crate provides:
//! - SQLite persistence for users and items
//! - Embedded, idempotent schema application
//! - Type-safe database operations via sqlx
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_store::{Store, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = Store::connect(config).await?;
//!
//! // Insert an item
//! let id = store.insert_item(&item).await?;
//!
//! // Query items
//! let items = store.list_items().await?;
//! ```

pub mod error;
pub mod models;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use store::{Store, StoreConfig};
