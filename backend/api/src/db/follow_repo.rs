use crate::models::Follow;
use sqlx::PgPool;

const FOLLOW_COLUMNS: &str = "id, follower_id, followee_id, created_at";

/// Create a follow edge. A duplicate insert violates the unique
/// (follower_id, followee_id) index and surfaces as a conflict — the
/// client is expected to retry as a delete (toggle protocol).
pub async fn create_follow(
    pool: &PgPool,
    follower_id: &str,
    followee_id: &str,
) -> Result<Follow, sqlx::Error> {
    let follow = sqlx::query_as::<_, Follow>(&format!(
        r#"
        INSERT INTO follows (follower_id, followee_id)
        VALUES ($1, $2)
        RETURNING {}
        "#,
        FOLLOW_COLUMNS
    ))
    .bind(follower_id)
    .bind(followee_id)
    .fetch_one(pool)
    .await?;

    Ok(follow)
}

/// Delete a follow edge; returns true if a row was removed.
pub async fn delete_follow(
    pool: &PgPool,
    follower_id: &str,
    followee_id: &str,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
        .bind(follower_id)
        .bind(followee_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

/// Check whether `follower_id` follows `followee_id`
pub async fn exists(
    pool: &PgPool,
    follower_id: &str,
    followee_id: &str,
) -> Result<bool, sqlx::Error> {
    let found: Option<(uuid::Uuid,)> =
        sqlx::query_as("SELECT id FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}

/// Subjects following `followee_id`, newest edge first
pub async fn list_follower_subjects(
    pool: &PgPool,
    followee_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let subjects: Vec<String> = sqlx::query_scalar(
        "SELECT follower_id FROM follows WHERE followee_id = $1 ORDER BY created_at DESC",
    )
    .bind(followee_id)
    .fetch_all(pool)
    .await?;

    Ok(subjects)
}

/// Subjects that `follower_id` follows, newest edge first
pub async fn list_followee_subjects(
    pool: &PgPool,
    follower_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let subjects: Vec<String> = sqlx::query_scalar(
        "SELECT followee_id FROM follows WHERE follower_id = $1 ORDER BY created_at DESC",
    )
    .bind(follower_id)
    .fetch_all(pool)
    .await?;

    Ok(subjects)
}

/// Follower count for a subject
pub async fn count_followers(pool: &PgPool, followee_id: &str) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followee_id = $1")
        .bind(followee_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Following count for a subject
pub async fn count_following(pool: &PgPool, follower_id: &str) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
        .bind(follower_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
