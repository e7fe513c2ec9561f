/// Profile service - identity profiles keyed by the external auth subject
use crate::db::user_repo::ProfilePatch;
use crate::db::{follow_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::User;
use serde::Serialize;
use sqlx::PgPool;

/// Denormalized-free counts computed on read
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

/// Profile response with stats; `isFollowing` only appears when the
/// profile is viewed by someone else.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileWithStats {
    #[serde(flatten)]
    pub user: User,
    pub stats: ProfileStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current user's profile; auto-created with minimal data on first
    /// access.
    pub async fn me(&self, subject: &str) -> Result<ProfileWithStats> {
        let user = user_repo::ensure_user(&self.pool, subject).await?;
        let stats = self.stats(subject).await?;

        Ok(ProfileWithStats {
            user,
            stats,
            is_following: None,
        })
    }

    /// Another user's profile as seen by `viewer`
    pub async fn get(&self, subject: &str, viewer: &str) -> Result<ProfileWithStats> {
        let user = user_repo::find_by_subject(&self.pool, subject)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let stats = self.stats(subject).await?;
        let is_following = follow_repo::exists(&self.pool, viewer, subject).await?;

        Ok(ProfileWithStats {
            user,
            stats,
            is_following: Some(is_following),
        })
    }

    /// Partial profile update; username uniqueness surfaces as 409.
    pub async fn update(&self, subject: &str, patch: ProfilePatch) -> Result<User> {
        if let Some(username) = &patch.username {
            if user_repo::username_taken(&self.pool, username, subject).await? {
                return Err(AppError::Conflict("Username already taken".to_string()));
            }
        }

        user_repo::ensure_user(&self.pool, subject).await?;

        Ok(user_repo::update_profile(&self.pool, subject, &patch).await?)
    }

    async fn stats(&self, subject: &str) -> Result<ProfileStats> {
        let post_count = post_repo::count_posts(&self.pool, Some(subject)).await?;
        let follower_count = follow_repo::count_followers(&self.pool, subject).await?;
        let following_count = follow_repo::count_following(&self.pool, subject).await?;

        Ok(ProfileStats {
            post_count,
            follower_count,
            following_count,
        })
    }
}
