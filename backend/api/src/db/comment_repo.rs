use crate::models::Comment;
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str = "id, post_id, author_id, text, like_count, created_at, updated_at";

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    author_id: &str,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(&format!(
        r#"
        INSERT INTO comments (post_id, author_id, text)
        VALUES ($1, $2, $3)
        RETURNING {}
        "#,
        COMMENT_COLUMNS
    ))
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Get all comments for a post, newest first
pub async fn list_by_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(&format!(
        r#"
        SELECT {}
        FROM comments
        WHERE post_id = $1
        ORDER BY created_at DESC
        "#,
        COMMENT_COLUMNS
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Get a single comment by ID
pub async fn find_by_id(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(&format!(
        "SELECT {} FROM comments WHERE id = $1",
        COMMENT_COLUMNS
    ))
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Delete a comment; returns true if a row was removed.
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}
