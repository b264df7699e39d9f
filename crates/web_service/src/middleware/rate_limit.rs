//! Fixed-window request throttling keyed by client IP.
//!
//! The counters live in a [`RateLimiter`] registered as app data, so every
//! worker shares them. The [`RateLimit`] middleware is attached to the
//! routes that need throttling and passes requests through untouched when
//! no limiter is registered.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::{Duration, Instant};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue},
    web, Error, ResponseError,
};
use dashmap::DashMap;
use futures_util::future::LocalBoxFuture;

use crate::error::AppError;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

const WINDOW: Duration = Duration::from_secs(60);
// Expired windows are swept once this many clients are tracked.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: u64 },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn per_minute(limit: u32) -> Self {
        Self::with_window(limit, WINDOW)
    }

    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: DashMap::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Record one hit for `client` and decide whether it may proceed.
    pub fn check(&self, client: &str) -> Decision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> Decision {
        if self.clients.len() > SWEEP_THRESHOLD {
            let window = self.window;
            self.clients
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
        }

        let mut entry = self.clients.entry(client.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                hits: 0,
            };
        }

        if entry.hits >= self.limit {
            let left = self
                .window
                .saturating_sub(now.saturating_duration_since(entry.started));
            let retry_after = left.as_secs() + u64::from(left.subsec_nanos() > 0);
            return Decision::Limited {
                retry_after: retry_after.max(1),
            };
        }

        entry.hits += 1;
        Decision::Allowed {
            remaining: self.limit - entry.hits,
        }
    }
}

fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn insert_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32) {
    headers.insert(HeaderName::from_static(LIMIT_HEADER), HeaderValue::from(limit));
    headers.insert(
        HeaderName::from_static(REMAINING_HEADER),
        HeaderValue::from(remaining),
    );
}

pub struct RateLimit;

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service: Rc::new(service),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(limiter) = req.app_data::<web::Data<RateLimiter>>().cloned() else {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        };

        let client = client_key(&req);
        match limiter.check(&client) {
            Decision::Limited { retry_after } => {
                tracing::warn!(client = %client, retry_after, "Rate limit exceeded");
                let mut response = AppError::TooManyRequests { retry_after }.error_response();
                insert_limit_headers(response.headers_mut(), limiter.limit(), 0);
                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
            Decision::Allowed { remaining } => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let mut res = fut.await?;
                    insert_limit_headers(res.headers_mut(), limiter.limit(), remaining);
                    Ok(res.map_into_left_body())
                })
            }
        }
    }
}
