/// Story service - time-bounded content
///
/// Visibility is bounded two independent ways: every read filters on a
/// 24-hour recency window, and the background sweeper deletes rows past
/// the same window. Near the boundary the two can disagree; the read
/// filter is what viewers actually observe.
use crate::db::story_repo;
use crate::error::{AppError, Result};
use crate::models::Story;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Story lifetime in hours
pub const STORY_WINDOW_HOURS: i64 = 24;

/// Oldest creation time still visible to readers
pub fn recency_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(STORY_WINDOW_HOURS)
}

pub struct StoriesService {
    pool: PgPool,
}

impl StoriesService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stories from the last 24 hours, newest first
    pub async fn list_recent(&self) -> Result<Vec<Story>> {
        let since = recency_cutoff(Utc::now());
        Ok(story_repo::list_recent(&self.pool, since).await?)
    }

    /// Create a story from an already-stored upload
    pub async fn create_story(
        &self,
        author_id: &str,
        url: &str,
        kind: &str,
        text: Option<&str>,
    ) -> Result<Story> {
        Ok(story_repo::create_story(&self.pool, author_id, url, kind, text).await?)
    }

    /// Update an own story's text and/or media. Returns the updated row
    /// and, when the media was replaced, the previous URL so the caller
    /// can unlink the old file best-effort.
    pub async fn update_story(
        &self,
        story_id: Uuid,
        author_id: &str,
        text: Option<&str>,
        new_url: Option<&str>,
        new_kind: Option<&str>,
    ) -> Result<(Story, Option<String>)> {
        let existing = story_repo::find_by_id(&self.pool, story_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Story not found".to_string()))?;

        if existing.author_id != author_id {
            return Err(AppError::Forbidden(
                "Not authorized to edit this story".to_string(),
            ));
        }

        let replaced_url = new_url.map(|_| existing.url.clone());
        let story =
            story_repo::update_story(&self.pool, story_id, text, new_url, new_kind).await?;

        Ok((story, replaced_url))
    }

    /// Delete an own story; returns the removed row so the caller can
    /// unlink its file.
    pub async fn delete_story(&self, story_id: Uuid, author_id: &str) -> Result<Story> {
        let existing = story_repo::find_by_id(&self.pool, story_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Story not found".to_string()))?;

        if existing.author_id != author_id {
            return Err(AppError::Forbidden(
                "Not authorized to delete this story".to_string(),
            ));
        }

        story_repo::delete_story(&self.pool, story_id).await?;

        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_twenty_four_hours_back() {
        let now = Utc::now();
        let cutoff = recency_cutoff(now);
        assert_eq!(now - cutoff, Duration::hours(24));
    }

    #[test]
    fn story_older_than_window_falls_outside_cutoff() {
        let now = Utc::now();
        let cutoff = recency_cutoff(now);

        let fresh = now - Duration::hours(23);
        let stale = now - Duration::hours(25);

        assert!(fresh >= cutoff);
        assert!(stale < cutoff);
    }
}
