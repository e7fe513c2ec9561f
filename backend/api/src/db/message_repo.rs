use crate::models::Message;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "id, from_id, to_id, text, media_url, read_at, created_at";

/// Latest message of a conversation, keyed by the other participant
#[derive(Debug, Clone, FromRow)]
pub struct ConversationRow {
    pub partner_id: String,
    #[sqlx(flatten)]
    pub last_message: Message,
}

/// Create a new message
pub async fn create_message(
    pool: &PgPool,
    from_id: &str,
    to_id: &str,
    text: Option<&str>,
    media_url: Option<&str>,
) -> Result<Message, sqlx::Error> {
    let message = sqlx::query_as::<_, Message>(&format!(
        r#"
        INSERT INTO messages (from_id, to_id, text, media_url)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        MESSAGE_COLUMNS
    ))
    .bind(from_id)
    .bind(to_id)
    .bind(text)
    .bind(media_url)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

/// Get a message by ID
pub async fn find_by_id(pool: &PgPool, message_id: Uuid) -> Result<Option<Message>, sqlx::Error> {
    let message = sqlx::query_as::<_, Message>(&format!(
        "SELECT {} FROM messages WHERE id = $1",
        MESSAGE_COLUMNS
    ))
    .bind(message_id)
    .fetch_optional(pool)
    .await?;

    Ok(message)
}

/// Delete a message; returns true if a row was removed.
pub async fn delete_message(pool: &PgPool, message_id: Uuid) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(message_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

/// Full two-way thread between two subjects, oldest first
pub async fn list_thread(
    pool: &PgPool,
    subject_a: &str,
    subject_b: &str,
) -> Result<Vec<Message>, sqlx::Error> {
    let messages = sqlx::query_as::<_, Message>(&format!(
        r#"
        SELECT {}
        FROM messages
        WHERE (from_id = $1 AND to_id = $2) OR (from_id = $2 AND to_id = $1)
        ORDER BY created_at ASC
        "#,
        MESSAGE_COLUMNS
    ))
    .bind(subject_a)
    .bind(subject_b)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Mark all unread messages from `sender` to `recipient` as read
pub async fn mark_thread_read(
    pool: &PgPool,
    sender: &str,
    recipient: &str,
) -> Result<u64, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        UPDATE messages
        SET read_at = NOW()
        WHERE from_id = $1 AND to_id = $2 AND read_at IS NULL
        "#,
    )
    .bind(sender)
    .bind(recipient)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected)
}

/// One row per conversation partner carrying the most recent message
pub async fn list_conversations(
    pool: &PgPool,
    subject: &str,
) -> Result<Vec<ConversationRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT DISTINCT ON (partner_id)
               partner_id, id, from_id, to_id, text, media_url, read_at, created_at
        FROM (
            SELECT m.*,
                   CASE WHEN m.from_id = $1 THEN m.to_id ELSE m.from_id END AS partner_id
            FROM messages m
            WHERE m.from_id = $1 OR m.to_id = $1
        ) conversations
        ORDER BY partner_id, created_at DESC
        "#,
    )
    .bind(subject)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
