use crate::models::Notification;
use sqlx::PgPool;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, actor_id, post_id, comment_id, message_id, read_at, created_at";

/// References carried by a notification to its triggering entities
#[derive(Debug, Default, Clone, Copy)]
pub struct NotificationRefs {
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub message_id: Option<Uuid>,
}

/// Insert a notification record. This is the final step of the fan-out
/// sequence; it runs outside any transaction like the steps before it.
pub async fn create_notification(
    pool: &PgPool,
    recipient: &str,
    kind: &str,
    actor_id: &str,
    refs: NotificationRefs,
) -> Result<Notification, sqlx::Error> {
    let notification = sqlx::query_as::<_, Notification>(&format!(
        r#"
        INSERT INTO notifications (user_id, kind, actor_id, post_id, comment_id, message_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        NOTIFICATION_COLUMNS
    ))
    .bind(recipient)
    .bind(kind)
    .bind(actor_id)
    .bind(refs.post_id)
    .bind(refs.comment_id)
    .bind(refs.message_id)
    .fetch_one(pool)
    .await?;

    Ok(notification)
}

/// Latest notifications for a recipient
pub async fn list_for_recipient(
    pool: &PgPool,
    recipient: &str,
    limit: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    let notifications = sqlx::query_as::<_, Notification>(&format!(
        r#"
        SELECT {}
        FROM notifications
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
        NOTIFICATION_COLUMNS
    ))
    .bind(recipient)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}

/// Mark one notification as read, scoped to its recipient
pub async fn mark_read(
    pool: &PgPool,
    notification_id: Uuid,
    recipient: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE notifications
        SET read_at = NOW()
        WHERE id = $1 AND user_id = $2 AND read_at IS NULL
        "#,
    )
    .bind(notification_id)
    .bind(recipient)
    .execute(pool)
    .await?;

    Ok(())
}

/// Mark every unread notification of a recipient as read
pub async fn mark_all_read(pool: &PgPool, recipient: &str) -> Result<u64, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        UPDATE notifications
        SET read_at = NOW()
        WHERE user_id = $1 AND read_at IS NULL
        "#,
    )
    .bind(recipient)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected)
}
