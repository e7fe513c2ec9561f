/// HTTP middleware for the Circlo API
///
/// Provides bearer-token authentication and in-process fixed-window rate
/// limiting. Handlers receive the authenticated subject through the
/// `AuthUser` extractor after the auth middleware has run.
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::collections::HashMap;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::auth;
use crate::error::AppError;

// =====================================================================
// Bearer-token authentication
// =====================================================================

/// Authenticated subject stored in request extensions after auth.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

/// Auth middleware settings resolved from configuration at startup.
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    /// When set, validation is bypassed and this subject is injected.
    /// Development only.
    pub dev_subject: Option<String>,
}

/// Actix middleware that validates a Bearer token against the identity
/// provider's public key and stores the subject in request extensions.
pub struct AuthMiddleware {
    settings: AuthSettings,
}

impl AuthMiddleware {
    pub fn new(settings: AuthSettings) -> Self {
        Self { settings }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            settings: self.settings.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    settings: AuthSettings,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let settings = self.settings.clone();

        Box::pin(async move {
            if let Some(dev_subject) = &settings.dev_subject {
                req.extensions_mut().insert(AuthUser(dev_subject.clone()));
                return service.call(req).await;
            }

            // Extract header data before touching extensions_mut to keep
            // the RefCell borrows disjoint.
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned)
                .ok_or_else(|| {
                    Error::from(AppError::Unauthorized(
                        "Missing Authorization header".to_string(),
                    ))
                })?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                Error::from(AppError::Unauthorized(
                    "Invalid Authorization scheme".to_string(),
                ))
            })?;

            let claims = auth::validate_token(token).map_err(|e| {
                tracing::debug!("token validation failed: {}", e);
                Error::from(AppError::Unauthorized(
                    "Invalid or expired token".to_string(),
                ))
            })?;

            req.extensions_mut()
                .insert(AuthUser(claims.claims.sub.clone()));

            service.call(req).await
        })
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| {
                    Error::from(AppError::Unauthorized("Authentication required".to_string()))
                }),
        )
    }
}

// =====================================================================
// Rate limiting
// =====================================================================

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 1000,
            window: Duration::from_secs(60),
        }
    }
}

struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window request counter keyed by client address.
///
/// Single-process only: state lives in memory and resets on restart.
/// Windows reset lazily when a counter is read after its deadline.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, WindowEntry>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Record one request for `client_id`; returns true when the client
    /// has exceeded the window's budget.
    pub fn is_rate_limited(&self, client_id: &str) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("rate limiter lock poisoned");

        match entries.get_mut(client_id) {
            Some(entry) if now <= entry.reset_at => {
                if entry.count >= self.config.max_requests {
                    return true;
                }
                entry.count += 1;
                false
            }
            _ => {
                entries.insert(
                    client_id.to_string(),
                    WindowEntry {
                        count: 1,
                        reset_at: now + self.config.window,
                    },
                );
                false
            }
        }
    }
}

#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client_id = req
            .connection_info()
            .realip_remote_addr()
            .map(|ip| format!("ip:{}", ip))
            .unwrap_or_else(|| "ip:unknown".to_string());

        let limited = self.limiter.is_rate_limited(&client_id);
        let service = self.service.clone();

        Box::pin(async move {
            if limited {
                return Err(AppError::RateLimited.into());
            }
            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_config_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 1000);
        assert_eq!(config.window, Duration::from_secs(60));
    }

    #[test]
    fn limiter_allows_up_to_max_requests() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 3,
            window: Duration::from_secs(60),
        });

        assert!(!limiter.is_rate_limited("ip:10.0.0.1"));
        assert!(!limiter.is_rate_limited("ip:10.0.0.1"));
        assert!(!limiter.is_rate_limited("ip:10.0.0.1"));
        assert!(limiter.is_rate_limited("ip:10.0.0.1"));
        assert!(limiter.is_rate_limited("ip:10.0.0.1"));
    }

    #[test]
    fn limiter_tracks_clients_independently() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        });

        assert!(!limiter.is_rate_limited("ip:10.0.0.1"));
        assert!(limiter.is_rate_limited("ip:10.0.0.1"));
        assert!(!limiter.is_rate_limited("ip:10.0.0.2"));
    }

    #[test]
    fn window_resets_lazily_after_deadline() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_millis(20),
        });

        assert!(!limiter.is_rate_limited("ip:10.0.0.1"));
        assert!(limiter.is_rate_limited("ip:10.0.0.1"));

        std::thread::sleep(Duration::from_millis(30));
        assert!(!limiter.is_rate_limited("ip:10.0.0.1"));
    }

    #[test]
    fn auth_user_extractor_holds_subject() {
        let user = AuthUser("user_2abc".to_string());
        assert_eq!(user.0, "user_2abc");
    }
}
