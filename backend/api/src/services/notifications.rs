/// Notification service - the read side of the fan-out
use crate::db::{notification_repo, user_repo};
use crate::error::Result;
use crate::models::{Notification, User};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Most notifications a single request returns
const LIST_LIMIT: i64 = 100;

/// Notification enriched with the triggering actor's profile
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationWithActor {
    #[serde(flatten)]
    pub notification: Notification,
    pub actor: Option<User>,
    pub is_read: bool,
}

pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Latest notifications for the caller, actor profiles loaded in bulk
    pub async fn list(&self, recipient: &str) -> Result<Vec<NotificationWithActor>> {
        let notifications =
            notification_repo::list_for_recipient(&self.pool, recipient, LIST_LIMIT).await?;

        let mut actor_ids: Vec<String> = notifications
            .iter()
            .map(|n| n.actor_id.clone())
            .collect();
        actor_ids.sort();
        actor_ids.dedup();

        let actors = user_repo::find_by_subjects(&self.pool, &actor_ids).await?;
        let actor_map: HashMap<String, User> = actors
            .into_iter()
            .map(|u| (u.subject.clone(), u))
            .collect();

        Ok(notifications
            .into_iter()
            .map(|notification| {
                let actor = actor_map.get(&notification.actor_id).cloned();
                let is_read = notification.read_at.is_some();
                NotificationWithActor {
                    notification,
                    actor,
                    is_read,
                }
            })
            .collect())
    }

    /// Mark one notification as read; a stranger's id is a silent no-op
    /// because the update is scoped to the caller.
    pub async fn mark_read(&self, notification_id: Uuid, recipient: &str) -> Result<()> {
        notification_repo::mark_read(&self.pool, notification_id, recipient).await?;
        Ok(())
    }

    /// Mark everything unread as read; returns how many rows changed.
    pub async fn mark_all_read(&self, recipient: &str) -> Result<u64> {
        Ok(notification_repo::mark_all_read(&self.pool, recipient).await?)
    }
}
