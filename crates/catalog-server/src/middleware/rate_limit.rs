//! Per-client rate limiting middleware.
//!
//! Fixed-window counter keyed by client IP address. The layer wraps the
//! `/api` route group only; registration, login, and health stay outside
//! the quota.

use std::{
    collections::HashMap,
    future::Future,
    net::{IpAddr, SocketAddr},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use axum::{
    Json,
    extract::{ConnectInfo, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::sync::RwLock;
use tower::{Layer, Service};

/// Structured 429 response body.
#[derive(Debug, Serialize)]
struct RateLimitExceeded {
    status: u16,
    error: String,
    message: String,
}

/// Request count within the current window for a single client.
#[derive(Debug, Clone)]
struct WindowCounter {
    window_start: Instant,
    count: u32,
}

/// Shared rate limiter state.
#[derive(Debug)]
pub struct RateLimiterState {
    counters: RwLock<HashMap<IpAddr, WindowCounter>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiterState {
    /// Create a new rate limiter state.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Count a request from the given client.
    ///
    /// Returns false once the client has exhausted the current window's
    /// quota. A window that has fully elapsed resets the count.
    pub async fn check(&self, ip: IpAddr) -> bool {
        let mut counters = self.counters.write().await;

        let counter = counters.entry(ip).or_insert_with(|| WindowCounter {
            window_start: Instant::now(),
            count: 0,
        });

        if counter.window_start.elapsed() >= self.window {
            counter.window_start = Instant::now();
            counter.count = 0;
        }

        counter.count += 1;
        counter.count <= self.max_requests
    }

    /// Clean up client entries whose window expired before the cutoff.
    pub async fn cleanup(&self, older_than: Duration) {
        let mut counters = self.counters.write().await;
        counters.retain(|_, counter| counter.window_start.elapsed() < older_than);
    }
}

/// Layer that applies rate limiting.
#[derive(Clone, Debug)]
pub struct RateLimiterLayer {
    state: Arc<RateLimiterState>,
}

impl RateLimiterLayer {
    /// Create a new rate limiter layer.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            state: Arc::new(RateLimiterState::new(max_requests, window)),
        }
    }

    /// Get a reference to the rate limiter state for cleanup tasks.
    pub fn state(&self) -> Arc<RateLimiterState> {
        Arc::clone(&self.state)
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiter {
            inner,
            state: Arc::clone(&self.state),
        }
    }
}

/// Middleware service for rate limiting.
#[derive(Clone, Debug)]
pub struct RateLimiter<S> {
    inner: S,
    state: Arc<RateLimiterState>,
}

impl<S> Service<Request> for RateLimiter<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let state = Arc::clone(&self.state);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let client_ip = extract_client_ip(&req);

            if state.check(client_ip).await {
                inner.call(req).await
            } else {
                tracing::warn!(client = %client_ip, "Rate limit exceeded");
                Ok(too_many_requests(&state).into_response())
            }
        })
    }
}

/// Build the fixed 429 response.
fn too_many_requests(state: &RateLimiterState) -> impl IntoResponse {
    let minutes = state.window.as_secs() / 60;
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(RateLimitExceeded {
            status: StatusCode::TOO_MANY_REQUESTS.as_u16(),
            error: "Too many requests".to_string(),
            message: format!(
                "You have exceeded {} requests in {} minutes. Please try again later.",
                state.max_requests, minutes
            ),
        }),
    )
}

/// Determine the client identity for rate-limit bookkeeping.
///
/// First `X-Forwarded-For` hop (reverse proxy setups), then the
/// connection peer address, then a localhost fallback.
fn extract_client_ip(req: &Request) -> IpAddr {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(ip) = forwarded
            .split(',')
            .next()
            .and_then(|s| s.trim().parse().ok())
        {
            return ip;
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }

    IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
}
