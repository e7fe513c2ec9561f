use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// Ensure all API tables and indexes exist.
///
/// Tables are created lazily at service startup to unblock environments
/// where no migration has been applied yet (fresh developer machines,
/// CI spins). The unique indexes here are load-bearing: they enforce the
/// one-reaction-per-user and one-follow-per-pair invariants and surface
/// duplicate inserts as conflicts.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    info!("Ensuring database schema exists");

    for ddl in [
        USERS_TABLE,
        USERS_USERNAME_INDEX,
        POSTS_TABLE,
        POSTS_AUTHOR_INDEX,
        POSTS_CREATED_INDEX,
        COMMENTS_TABLE,
        COMMENTS_POST_INDEX,
        REACTIONS_TABLE,
        REACTIONS_UNIQUE_INDEX,
        FOLLOWS_TABLE,
        FOLLOWS_UNIQUE_INDEX,
        FOLLOWS_FOLLOWEE_INDEX,
        MESSAGES_TABLE,
        MESSAGES_THREAD_INDEX,
        MESSAGES_RECIPIENT_INDEX,
        NOTIFICATIONS_TABLE,
        NOTIFICATIONS_RECIPIENT_INDEX,
        STORIES_TABLE,
        STORIES_CREATED_INDEX,
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }

    Ok(())
}

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    subject TEXT NOT NULL UNIQUE,
    username TEXT,
    name TEXT,
    email TEXT,
    avatar_url TEXT,
    bio TEXT,
    links TEXT[] NOT NULL DEFAULT '{}',
    is_verified BOOLEAN NOT NULL DEFAULT FALSE,
    is_private BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const USERS_USERNAME_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS users_username_key
ON users (username) WHERE username IS NOT NULL
"#;

const POSTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    author_id TEXT NOT NULL,
    text TEXT NOT NULL DEFAULT '',
    media JSONB NOT NULL DEFAULT '[]',
    like_count BIGINT NOT NULL DEFAULT 0,
    comment_count BIGINT NOT NULL DEFAULT 0,
    share_count BIGINT NOT NULL DEFAULT 0,
    visibility TEXT NOT NULL DEFAULT 'public',
    hashtags TEXT[] NOT NULL DEFAULT '{}',
    mentions TEXT[] NOT NULL DEFAULT '{}',
    shared_from UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const POSTS_AUTHOR_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS posts_author_created_idx
ON posts (author_id, created_at DESC)
"#;

const POSTS_CREATED_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS posts_created_idx
ON posts (created_at DESC)
"#;

const COMMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS comments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    post_id UUID NOT NULL,
    author_id TEXT NOT NULL,
    text TEXT NOT NULL,
    like_count BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const COMMENTS_POST_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS comments_post_created_idx
ON comments (post_id, created_at DESC)
"#;

const REACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    post_id UUID NOT NULL,
    user_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const REACTIONS_UNIQUE_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS reactions_post_user_key
ON reactions (post_id, user_id)
"#;

const FOLLOWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS follows (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    follower_id TEXT NOT NULL,
    followee_id TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const FOLLOWS_UNIQUE_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS follows_pair_key
ON follows (follower_id, followee_id)
"#;

const FOLLOWS_FOLLOWEE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS follows_followee_idx
ON follows (followee_id)
"#;

const MESSAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    from_id TEXT NOT NULL,
    to_id TEXT NOT NULL,
    text TEXT,
    media_url TEXT,
    read_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const MESSAGES_THREAD_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS messages_thread_idx
ON messages (from_id, to_id, created_at)
"#;

const MESSAGES_RECIPIENT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS messages_recipient_idx
ON messages (to_id, created_at DESC)
"#;

const NOTIFICATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS notifications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    actor_id TEXT NOT NULL,
    post_id UUID,
    comment_id UUID,
    message_id UUID,
    read_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const NOTIFICATIONS_RECIPIENT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS notifications_recipient_created_idx
ON notifications (user_id, created_at DESC)
"#;

const STORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    author_id TEXT NOT NULL,
    url TEXT NOT NULL,
    kind TEXT NOT NULL,
    text TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const STORIES_CREATED_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS stories_created_idx
ON stories (created_at DESC)
"#;
