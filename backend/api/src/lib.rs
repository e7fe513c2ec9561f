/// Circlo API Library
///
/// A single-instance social-networking backend: posts, comments,
/// reactions, follows, direct messages, stories, notifications, profiles,
/// search, and media uploads over PostgreSQL.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures for all entities
/// - `services`: Business logic, including the counter/notification
///   fan-out sequences
/// - `db`: Repositories and schema bootstrap
/// - `jobs`: Background jobs (story expiry sweeper)
/// - `middleware`: Authentication and rate limiting
/// - `auth`: Token validation and real-time custom-token minting
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
