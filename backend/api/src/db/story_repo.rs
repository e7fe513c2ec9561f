use crate::models::Story;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const STORY_COLUMNS: &str = "id, author_id, url, kind, text, created_at";

/// Create a new story
pub async fn create_story(
    pool: &PgPool,
    author_id: &str,
    url: &str,
    kind: &str,
    text: Option<&str>,
) -> Result<Story, sqlx::Error> {
    let story = sqlx::query_as::<_, Story>(&format!(
        r#"
        INSERT INTO stories (author_id, url, kind, text)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        STORY_COLUMNS
    ))
    .bind(author_id)
    .bind(url)
    .bind(kind)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(story)
}

/// Get a story by ID
pub async fn find_by_id(pool: &PgPool, story_id: Uuid) -> Result<Option<Story>, sqlx::Error> {
    let story = sqlx::query_as::<_, Story>(&format!(
        "SELECT {} FROM stories WHERE id = $1",
        STORY_COLUMNS
    ))
    .bind(story_id)
    .fetch_optional(pool)
    .await?;

    Ok(story)
}

/// Stories created after `since`, newest first. This read-side filter is
/// independent of the background expiry sweep; the two can transiently
/// disagree about a story near the window boundary.
pub async fn list_recent(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<Story>, sqlx::Error> {
    let stories = sqlx::query_as::<_, Story>(&format!(
        r#"
        SELECT {}
        FROM stories
        WHERE created_at >= $1
        ORDER BY created_at DESC
        "#,
        STORY_COLUMNS
    ))
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(stories)
}

/// Update story text and/or media; `None` leaves the column as-is.
pub async fn update_story(
    pool: &PgPool,
    story_id: Uuid,
    text: Option<&str>,
    url: Option<&str>,
    kind: Option<&str>,
) -> Result<Story, sqlx::Error> {
    let story = sqlx::query_as::<_, Story>(&format!(
        r#"
        UPDATE stories
        SET text = COALESCE($2, text),
            url = COALESCE($3, url),
            kind = COALESCE($4, kind)
        WHERE id = $1
        RETURNING {}
        "#,
        STORY_COLUMNS
    ))
    .bind(story_id)
    .bind(text)
    .bind(url)
    .bind(kind)
    .fetch_one(pool)
    .await?;

    Ok(story)
}

/// Delete a story; returns true if a row was removed.
pub async fn delete_story(pool: &PgPool, story_id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM stories WHERE id = $1")
        .bind(story_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

/// Expired stories (for the sweeper): created before `cutoff`
pub async fn list_expired(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Story>, sqlx::Error> {
    let stories = sqlx::query_as::<_, Story>(&format!(
        "SELECT {} FROM stories WHERE created_at < $1",
        STORY_COLUMNS
    ))
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(stories)
}

/// Delete all stories created before `cutoff`; returns rows removed.
pub async fn delete_expired(pool: &PgPool, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM stories WHERE created_at < $1")
        .bind(cutoff)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected)
}
