//! Per-IP rate limiting for the signup and login endpoints.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, RwLock},
    time::Duration,
};

use crate::web::error::ApiError;

/// Per-IP rate limiter using Governor.
pub type IpRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Interval between sweeps of idle limiters.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// State for auth endpoint rate limiting.
pub struct RateLimitState {
    limiters: RwLock<HashMap<String, Arc<IpRateLimiter>>>,
    /// Requests per minute allowed per IP.
    requests_per_minute: u32,
    /// Whether forwarding headers identify the client.
    trust_proxy: bool,
}

impl RateLimitState {
    /// Create a new rate limit state.
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            requests_per_minute,
            trust_proxy: false,
        }
    }

    /// Key clients by `X-Forwarded-For`/`X-Real-IP` instead of the peer address.
    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    fn limiter_for(&self, ip: &str) -> Arc<IpRateLimiter> {
        {
            let guard = self.limiters.read().unwrap_or_else(|e| e.into_inner());
            if let Some(limiter) = guard.get(ip) {
                return limiter.clone();
            }
        }

        let mut guard = self.limiters.write().unwrap_or_else(|e| e.into_inner());
        guard
            .entry(ip.to_string())
            .or_insert_with(|| {
                let quota = Quota::per_minute(
                    NonZeroU32::new(self.requests_per_minute).unwrap_or(NonZeroU32::MIN),
                );
                Arc::new(RateLimiter::direct(quota))
            })
            .clone()
    }

    /// Check if a request from `ip` is allowed.
    pub fn check(&self, ip: &str) -> bool {
        self.limiter_for(ip).check().is_ok()
    }

    /// Number of tracked IPs.
    pub fn tracked(&self) -> usize {
        self.limiters.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Drop limiters that are not in use by an in-flight request.
    pub fn cleanup(&self) {
        let mut guard = self.limiters.write().unwrap_or_else(|e| e.into_inner());
        guard.retain(|_, v| Arc::strong_count(v) > 1);
    }

    /// Start a background task to periodically clean up old entries.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                self.cleanup();
                tracing::debug!(tracked = self.tracked(), "Rate limiter cleanup");
            }
        });
    }
}

/// Extract client IP from request.
///
/// Forwarding headers are client-controlled, so they are only read when
/// `trust_proxy` is set.
fn client_ip(req: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        // Behind a reverse proxy the first hop is the client
        if let Some(forwarded) = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
        {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().to_string();
            }
        }

        if let Some(real_ip) = req
            .headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
        {
            return real_ip.to_string();
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Rate limiting middleware for signup and login.
pub async fn auth_rate_limit(
    State(state): State<Arc<RateLimitState>>,
    req: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&req, state.trust_proxy);

    if !state.check(&ip) {
        tracing::warn!(ip = %ip, path = %req.uri().path(), "Auth rate limit exceeded");
        return ApiError::too_many_requests("Too many attempts. Please try again later.")
            .into_response();
    }

    next.run(req).await
}
