/// HTTP request handlers, one module per resource
pub mod comments;
pub mod follows;
pub mod media;
pub mod messages;
pub mod notifications;
pub mod posts;
pub mod profiles;
pub mod reactions;
pub mod realtime;
pub mod search;
pub mod stories;
