/// Configuration management for the Circlo API
///
/// All settings come from environment variables with development-friendly
/// defaults. `from_env` fails loudly on values that must not be defaulted
/// in production.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub realtime: RealtimeConfig,
    pub uploads: UploadConfig,
    pub rate_limit: RateLimitSettings,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Identity-provider token validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// RS256 public key (PEM) of the identity provider
    pub jwt_public_key: Option<String>,
    /// When set, token validation is bypassed and this subject is used
    /// for every request. Development only.
    pub dev_subject: Option<String>,
}

/// Credentials for minting real-time provider custom tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    pub service_account_email: Option<String>,
    /// RSA private key (PEM); escaped newlines from .env files are handled
    pub private_key: Option<String>,
}

/// Local upload storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: String,
    pub max_bytes: usize,
}

/// Fixed-window rate limiting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let dev_subject = match std::env::var("AUTH_DEV_SUBJECT") {
            Ok(subject) if !subject.trim().is_empty() => {
                if app_env.eq_ignore_ascii_case("production") {
                    return Err("AUTH_DEV_SUBJECT must not be set in production".to_string());
                }
                Some(subject)
            }
            _ => None,
        };

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("API_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:5173".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/circlo_social".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: AuthConfig {
                jwt_public_key: std::env::var("AUTH_JWT_PUBLIC_KEY").ok(),
                dev_subject,
            },
            realtime: RealtimeConfig {
                service_account_email: std::env::var("REALTIME_CLIENT_EMAIL").ok(),
                private_key: std::env::var("REALTIME_PRIVATE_KEY")
                    .ok()
                    .map(|key| key.replace("\\n", "\n")),
            },
            uploads: UploadConfig {
                dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
                max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(200 * 1024 * 1024),
            },
            rate_limit: RateLimitSettings {
                max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1000),
                window_seconds: std::env::var("RATE_LIMIT_WINDOW_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            },
        })
    }
}
