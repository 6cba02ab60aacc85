//! Route definitions for the HTTP API.

pub mod health;
pub mod items;
pub mod users;

use axum::Router;

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Build the complete router with all routes.
///
/// The rate limiter wraps only the `/api` group; registration, login,
/// and health stay outside the quota.
pub fn build_router(state: AppState) -> Router {
    let config = state.config();
    let limiter = RateLimiterLayer::new(
        config.rate_limit_max_requests,
        config.rate_limit_window(),
    );

    let api = items::routes().layer(limiter);

    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(api)
        .with_state(state)
}
