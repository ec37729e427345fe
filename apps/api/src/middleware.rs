//! Request logging middleware.
//!
//! ```text
//! request ──► request_logger ──► router ──► handler
//!                  │                            │
//!                  └──── HTTP request event ◄───┘
//!                        method, path, status, duration_ms, remote_addr
//! ```

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

/// Logs one event per request once the response is ready.
pub async fn request_logger(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    // Absent when the router is driven without a socket (tests).
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(req).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        %remote_addr,
        "HTTP request"
    );
    response
}
