use crate::models::User;
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, subject, username, name, email, avatar_url, bio, links, \
                            is_verified, is_private, created_at, updated_at";

/// Find a user by external auth subject
pub async fn find_by_subject(pool: &PgPool, subject: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE subject = $1",
        USER_COLUMNS
    ))
    .bind(subject)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Insert a minimal profile row if the subject is unknown; returns the
/// stored row either way.
pub async fn ensure_user(pool: &PgPool, subject: &str) -> Result<User, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (subject)
        VALUES ($1)
        ON CONFLICT (subject) DO NOTHING
        "#,
    )
    .bind(subject)
    .execute(pool)
    .await?;

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE subject = $1",
        USER_COLUMNS
    ))
    .bind(subject)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Fields accepted by a profile update; `None` leaves the column as-is.
#[derive(Debug, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub links: Option<Vec<String>>,
}

/// Apply a partial profile update and return the stored row.
pub async fn update_profile(
    pool: &PgPool,
    subject: &str,
    patch: &ProfilePatch,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            name = COALESCE($3, name),
            bio = COALESCE($4, bio),
            avatar_url = COALESCE($5, avatar_url),
            links = COALESCE($6, links),
            updated_at = NOW()
        WHERE subject = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(subject)
    .bind(patch.username.as_deref())
    .bind(patch.name.as_deref())
    .bind(patch.bio.as_deref())
    .bind(patch.avatar_url.as_deref())
    .bind(patch.links.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Check whether a username is taken by a different subject
pub async fn username_taken(
    pool: &PgPool,
    username: &str,
    exclude_subject: &str,
) -> Result<bool, sqlx::Error> {
    let existing: Option<(String,)> =
        sqlx::query_as("SELECT subject FROM users WHERE username = $1 AND subject <> $2")
            .bind(username)
            .bind(exclude_subject)
            .fetch_optional(pool)
            .await?;

    Ok(existing.is_some())
}

/// Bulk fetch users by subject, for author/actor enrichment
pub async fn find_by_subjects(
    pool: &PgPool,
    subjects: &[String],
) -> Result<Vec<User>, sqlx::Error> {
    if subjects.is_empty() {
        return Ok(Vec::new());
    }

    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE subject = ANY($1)",
        USER_COLUMNS
    ))
    .bind(subjects)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Users not yet followed by `subject` (excluding the subject itself)
pub async fn find_suggestions(
    pool: &PgPool,
    subject: &str,
    limit: i64,
) -> Result<Vec<User>, sqlx::Error> {
    let users = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {}
        FROM users
        WHERE subject <> $1
          AND subject NOT IN (SELECT followee_id FROM follows WHERE follower_id = $1)
        ORDER BY created_at DESC
        LIMIT $2
        "#,
        USER_COLUMNS
    ))
    .bind(subject)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Case-insensitive substring search over username and display name
pub async fn search(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<User>, sqlx::Error> {
    let pattern = format!("%{}%", query);
    let users = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {}
        FROM users
        WHERE username ILIKE $1 OR name ILIKE $1
        LIMIT $2
        "#,
        USER_COLUMNS
    ))
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
