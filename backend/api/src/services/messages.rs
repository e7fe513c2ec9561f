/// Message service - direct messages persisted through the primary API
///
/// Real-time delivery happens client-to-provider and bypasses this code
/// path entirely; these records are the queryable history plus the
/// notification fan-out source.
use crate::db::{message_repo, notification_repo};
use crate::db::notification_repo::NotificationRefs;
use crate::error::{AppError, Result};
use crate::models::{Message, NotificationKind};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Conversation list entry: the partner and the latest message exchanged
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub partner_id: String,
    pub last_message: Message,
}

pub struct MessageService {
    pool: PgPool,
}

impl MessageService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One entry per conversation partner, carrying the latest message
    pub async fn conversations(&self, subject: &str) -> Result<Vec<ConversationSummary>> {
        let mut rows = message_repo::list_conversations(&self.pool, subject).await?;

        // Most recent conversation first
        rows.sort_by(|a, b| b.last_message.created_at.cmp(&a.last_message.created_at));

        Ok(rows
            .into_iter()
            .map(|row| ConversationSummary {
                partner_id: row.partner_id,
                last_message: row.last_message,
            })
            .collect())
    }

    /// Full thread with another user, oldest first. Reading the thread
    /// marks the partner's unread messages as read.
    pub async fn thread(&self, me: &str, other: &str) -> Result<Vec<Message>> {
        let messages = message_repo::list_thread(&self.pool, me, other).await?;

        message_repo::mark_thread_read(&self.pool, other, me).await?;

        Ok(messages)
    }

    /// Send a message and notify the recipient. Two independent writes,
    /// no transaction.
    pub async fn send(
        &self,
        from_id: &str,
        to_id: &str,
        text: Option<&str>,
        media_url: Option<&str>,
    ) -> Result<Message> {
        if from_id == to_id {
            return Err(AppError::BadRequest("Cannot message yourself".to_string()));
        }

        if text.is_none() && media_url.is_none() {
            return Err(AppError::BadRequest(
                "Either text or mediaUrl must be provided".to_string(),
            ));
        }

        let message = message_repo::create_message(&self.pool, from_id, to_id, text, media_url)
            .await?;

        notification_repo::create_notification(
            &self.pool,
            to_id,
            NotificationKind::Message.as_str(),
            from_id,
            NotificationRefs {
                message_id: Some(message.id),
                ..Default::default()
            },
        )
        .await?;

        Ok(message)
    }

    /// Delete an own (sent) message
    pub async fn delete(&self, message_id: Uuid, subject: &str) -> Result<()> {
        let message = message_repo::find_by_id(&self.pool, message_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()))?;

        if message.from_id != subject {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }

        message_repo::delete_message(&self.pool, message_id).await?;

        Ok(())
    }
}
