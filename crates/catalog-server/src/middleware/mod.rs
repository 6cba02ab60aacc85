//! Tower middleware for the HTTP server.

pub mod rate_limit;
pub mod request_id;
