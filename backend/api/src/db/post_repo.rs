use crate::models::{MediaItem, Post};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str = "id, author_id, text, media, like_count, comment_count, share_count, \
                            visibility, hashtags, mentions, shared_from, created_at, updated_at";

/// Create a new post
pub async fn create_post(
    pool: &PgPool,
    author_id: &str,
    text: &str,
    media: &[MediaItem],
    visibility: &str,
    hashtags: &[String],
    mentions: &[String],
    shared_from: Option<Uuid>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        INSERT INTO posts (author_id, text, media, visibility, hashtags, mentions, shared_from)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        POST_COLUMNS
    ))
    .bind(author_id)
    .bind(text)
    .bind(Json(media))
    .bind(visibility)
    .bind(hashtags)
    .bind(mentions)
    .bind(shared_from)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Get a post by ID
pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(&format!(
        "SELECT {} FROM posts WHERE id = $1",
        POST_COLUMNS
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// List posts newest first, optionally restricted to one author
pub async fn list_posts(
    pool: &PgPool,
    author_id: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {}
        FROM posts
        WHERE $1::text IS NULL OR author_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
        POST_COLUMNS
    ))
    .bind(author_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts, optionally restricted to one author
pub async fn count_posts(pool: &PgPool, author_id: Option<&str>) -> Result<i64, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE $1::text IS NULL OR author_id = $1")
            .bind(author_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

/// Update text and/or media of a post; `None` leaves the column as-is.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    text: Option<&str>,
    media: Option<&[MediaItem]>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        UPDATE posts
        SET text = COALESCE($2, text),
            media = COALESCE($3, media),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        POST_COLUMNS
    ))
    .bind(post_id)
    .bind(text)
    .bind(media.map(Json))
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Delete a post; returns true if a row was removed.
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

/// Atomic per-row counter adjustment. The floor at zero mirrors the
/// counters' at-rest invariant; this is the only concurrency-safety
/// mechanism protecting concurrent reactions on the same post.
pub async fn adjust_like_count(pool: &PgPool, post_id: Uuid, delta: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE posts SET like_count = GREATEST(like_count + $2, 0) WHERE id = $1")
        .bind(post_id)
        .bind(delta)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn adjust_comment_count(
    pool: &PgPool,
    post_id: Uuid,
    delta: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE posts SET comment_count = GREATEST(comment_count + $2, 0) WHERE id = $1")
        .bind(post_id)
        .bind(delta)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn adjust_share_count(
    pool: &PgPool,
    post_id: Uuid,
    delta: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE posts SET share_count = GREATEST(share_count + $2, 0) WHERE id = $1")
        .bind(post_id)
        .bind(delta)
        .execute(pool)
        .await?;

    Ok(())
}

/// Re-read the like counter after a toggle, for the response payload
pub async fn get_like_count(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    let count: Option<i64> = sqlx::query_scalar("SELECT like_count FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    Ok(count.unwrap_or(0))
}

/// Case-insensitive substring search over post text, newest first
pub async fn search(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<Post>, sqlx::Error> {
    let pattern = format!("%{}%", query);
    let posts = sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {}
        FROM posts
        WHERE text ILIKE $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
        POST_COLUMNS
    ))
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}
