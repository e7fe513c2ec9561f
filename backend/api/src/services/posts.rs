/// Post service - post creation, retrieval, updates, and reposting
use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::models::{MediaItem, Post, Visibility};
use crate::services::text_parser;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(post_repo::find_by_id(&self.pool, post_id).await?)
    }

    /// List posts newest first, optionally restricted to one author.
    /// Returns the page plus the total count for pagination metadata.
    pub async fn list_posts(
        &self,
        author_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Post>, i64)> {
        let posts = post_repo::list_posts(&self.pool, author_id, limit, offset).await?;
        let total = post_repo::count_posts(&self.pool, author_id).await?;

        Ok((posts, total))
    }

    /// Create a new post. Hashtags and mentions are extracted from the
    /// text at write time.
    pub async fn create_post(
        &self,
        author_id: &str,
        text: &str,
        media: &[MediaItem],
        visibility: Visibility,
    ) -> Result<Post> {
        let hashtags = text_parser::extract_hashtags(text);
        let mentions = text_parser::extract_mentions(text);

        let post = post_repo::create_post(
            &self.pool,
            author_id,
            text,
            media,
            visibility.as_str(),
            &hashtags,
            &mentions,
            None,
        )
        .await?;

        Ok(post)
    }

    /// Update text and/or media of an own post
    pub async fn update_post(
        &self,
        post_id: Uuid,
        author_id: &str,
        text: Option<&str>,
        media: Option<&[MediaItem]>,
    ) -> Result<Post> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if post.author_id != author_id {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }

        Ok(post_repo::update_post(&self.pool, post_id, text, media).await?)
    }

    /// Delete an own post
    pub async fn delete_post(&self, post_id: Uuid, author_id: &str) -> Result<()> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if post.author_id != author_id {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }

        post_repo::delete_post(&self.pool, post_id).await?;

        Ok(())
    }

    /// Repost an existing post: a new public post carrying the original
    /// text and media, linked via sharedFrom. The origin's share counter
    /// is adjusted in a second, independent write.
    pub async fn repost(&self, original_id: Uuid, author_id: &str) -> Result<Post> {
        let original = post_repo::find_by_id(&self.pool, original_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Original post not found".to_string()))?;

        let post = post_repo::create_post(
            &self.pool,
            author_id,
            &original.text,
            &original.media.0,
            Visibility::Public.as_str(),
            &original.hashtags,
            &[],
            Some(original_id),
        )
        .await?;

        post_repo::adjust_share_count(&self.pool, original_id, 1).await?;

        Ok(post)
    }
}
