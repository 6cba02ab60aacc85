//! catalog-server: HTTP API server for the catalog service
//!
//! This crate provides:
//! - REST endpoints for user registration, login, and item CRUD
//! - JWT bearer authentication for the `/api` route group
//! - Per-client rate limiting on the `/api` route group
//! - Best-effort request logging to a JSON file
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - JSON error responses
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_server::{config::ServerConfig, routes, state::AppState};
//! use catalog_store::{Store, StoreConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let store = Store::connect(StoreConfig::from_env()?).await?;
//! let app = routes::build_router(AppState::new(store, config));
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod request_log;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use request_log::{LogEntry, RequestLog};
pub use state::AppState;

// Re-export dependent crates
pub use catalog_store;
