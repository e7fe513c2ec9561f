use crate::models::Reaction;
use sqlx::PgPool;
use uuid::Uuid;

const REACTION_COLUMNS: &str = "id, post_id, user_id, kind, created_at";

/// Find the caller's reaction on a post, if any
pub async fn find_reaction(
    pool: &PgPool,
    post_id: Uuid,
    user_id: &str,
) -> Result<Option<Reaction>, sqlx::Error> {
    let reaction = sqlx::query_as::<_, Reaction>(&format!(
        "SELECT {} FROM reactions WHERE post_id = $1 AND user_id = $2",
        REACTION_COLUMNS
    ))
    .bind(post_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(reaction)
}

/// Create a reaction. The unique (post_id, user_id) index rejects a
/// second reaction from the same user as a conflict.
pub async fn create_reaction(
    pool: &PgPool,
    post_id: Uuid,
    user_id: &str,
    kind: &str,
) -> Result<Reaction, sqlx::Error> {
    let reaction = sqlx::query_as::<_, Reaction>(&format!(
        r#"
        INSERT INTO reactions (post_id, user_id, kind)
        VALUES ($1, $2, $3)
        RETURNING {}
        "#,
        REACTION_COLUMNS
    ))
    .bind(post_id)
    .bind(user_id)
    .bind(kind)
    .fetch_one(pool)
    .await?;

    Ok(reaction)
}

/// Delete the caller's reaction on a post
pub async fn delete_reaction(
    pool: &PgPool,
    post_id: Uuid,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM reactions WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
