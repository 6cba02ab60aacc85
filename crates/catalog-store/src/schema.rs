//! Schema definitions and migration utilities.
//!
//! This module provides the embedded SQL schema and utilities for
//! applying it at startup.

use sqlx::SqlitePool;

use crate::error::{StoreError, StoreResult};

/// Embedded migration SQL for the core schema (001_schema.sql).
pub const SCHEMA_MIGRATION: &str = include_str!("../../../migrations/001_schema.sql");

/// Run all pending migrations against the database.
///
/// This function is idempotent - it can be run multiple times safely.
/// Every statement guards with IF NOT EXISTS.
///
/// # Errors
///
/// Returns an error if the migration fails to execute.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    tracing::info!("Running database migrations...");

    sqlx::raw_sql(SCHEMA_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| StoreError::Migration(format!("Schema migration failed: {}", e)))?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Check if the schema has been initialized.
///
/// Returns true if the `items` table exists.
pub async fn is_schema_initialized(pool: &SqlitePool) -> StoreResult<bool> {
    let result: (bool,) = sqlx::query_as(
        r#"SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'items')"#,
    )
    .fetch_one(pool)
    .await?;

    Ok(result.0)
}
