/// Follow service - the follow/unfollow toggle protocol
///
/// Edge existence is the state: there is no flag to flip. Following an
/// already-followed user is a conflict (the client retries as a delete),
/// unfollowing a non-existent edge is not-found.
use crate::db::{follow_repo, notification_repo, user_repo};
use crate::db::notification_repo::NotificationRefs;
use crate::error::{AppError, Result};
use crate::models::{NotificationKind, User};
use sqlx::PgPool;

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a follow edge and notify the followee.
    ///
    /// Minimal profile rows are upserted for both parties first so the
    /// edge never dangles. The duplicate check runs before the insert;
    /// the unique index is the backstop for concurrent attempts.
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> Result<()> {
        if follower_id == followee_id {
            return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
        }

        user_repo::ensure_user(&self.pool, follower_id).await?;
        user_repo::ensure_user(&self.pool, followee_id).await?;

        if follow_repo::exists(&self.pool, follower_id, followee_id).await? {
            return Err(AppError::Conflict("Already following".to_string()));
        }

        follow_repo::create_follow(&self.pool, follower_id, followee_id).await?;

        notification_repo::create_notification(
            &self.pool,
            followee_id,
            NotificationKind::Follow.as_str(),
            follower_id,
            NotificationRefs::default(),
        )
        .await?;

        Ok(())
    }

    /// Remove a follow edge; not-found when the edge does not exist.
    pub async fn unfollow(&self, follower_id: &str, followee_id: &str) -> Result<()> {
        if !follow_repo::delete_follow(&self.pool, follower_id, followee_id).await? {
            return Err(AppError::NotFound(
                "Follow relationship not found".to_string(),
            ));
        }

        Ok(())
    }

    /// Profiles of everyone following `subject`
    pub async fn followers(&self, subject: &str) -> Result<Vec<User>> {
        let subjects = follow_repo::list_follower_subjects(&self.pool, subject).await?;
        self.load_in_order(&subjects).await
    }

    /// Profiles of everyone `subject` follows
    pub async fn following(&self, subject: &str) -> Result<Vec<User>> {
        let subjects = follow_repo::list_followee_subjects(&self.pool, subject).await?;
        self.load_in_order(&subjects).await
    }

    /// Bulk-load users and keep the edge ordering; subjects without a
    /// profile row are dropped.
    async fn load_in_order(&self, subjects: &[String]) -> Result<Vec<User>> {
        let users = user_repo::find_by_subjects(&self.pool, subjects).await?;
        let by_subject: std::collections::HashMap<String, User> = users
            .into_iter()
            .map(|u| (u.subject.clone(), u))
            .collect();

        Ok(subjects
            .iter()
            .filter_map(|s| by_subject.get(s).cloned())
            .collect())
    }
}
