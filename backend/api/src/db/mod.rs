/// Database access layer
///
/// One repository module per entity; each is a set of free async
/// functions over `&PgPool`. Every call is an independent round-trip —
/// the fan-out sequences in the service layer deliberately do not share
/// a transaction.
pub mod comment_repo;
pub mod follow_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod post_repo;
pub mod reaction_repo;
pub mod schema;
pub mod story_repo;
pub mod user_repo;

pub use schema::ensure_schema;
