/// Comment service - comment CRUD plus the counter/notification fan-out
use crate::db::{comment_repo, notification_repo, post_repo, user_repo};
use crate::db::notification_repo::NotificationRefs;
use crate::error::{AppError, Result};
use crate::models::{Comment, NotificationKind, User};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Comment enriched with its author's profile for list responses
#[derive(Debug, Serialize)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<User>,
}

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comments for a post, newest first, with author profiles loaded in
    /// bulk to avoid one lookup per comment.
    pub async fn list_post_comments(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        let comments = comment_repo::list_by_post(&self.pool, post_id).await?;

        let mut author_ids: Vec<String> =
            comments.iter().map(|c| c.author_id.clone()).collect();
        author_ids.sort();
        author_ids.dedup();

        let authors = user_repo::find_by_subjects(&self.pool, &author_ids).await?;
        let author_map: HashMap<String, User> = authors
            .into_iter()
            .map(|u| (u.subject.clone(), u))
            .collect();

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = author_map.get(&comment.author_id).cloned();
                CommentWithAuthor { comment, author }
            })
            .collect())
    }

    /// Create a comment.
    ///
    /// Fan-out sequence, each step an independent write with no shared
    /// transaction: insert the comment, bump the post's comment counter,
    /// then notify the post author unless they commented themselves. A
    /// failure mid-sequence leaves the earlier steps applied.
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author_id: &str,
        text: &str,
    ) -> Result<CommentWithAuthor> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let comment = comment_repo::create_comment(&self.pool, post_id, author_id, text).await?;

        post_repo::adjust_comment_count(&self.pool, post_id, 1).await?;

        if post.author_id != author_id {
            notification_repo::create_notification(
                &self.pool,
                &post.author_id,
                NotificationKind::Comment.as_str(),
                author_id,
                NotificationRefs {
                    post_id: Some(post_id),
                    comment_id: Some(comment.id),
                    ..Default::default()
                },
            )
            .await?;
        }

        let author = user_repo::find_by_subject(&self.pool, author_id).await?;

        Ok(CommentWithAuthor { comment, author })
    }

    /// Delete an own comment and decrement the parent's counter. The
    /// second delete of the same comment fails not-found.
    pub async fn delete_comment(&self, comment_id: Uuid, author_id: &str) -> Result<()> {
        let comment = comment_repo::find_by_id(&self.pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        if comment.author_id != author_id {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }

        if !comment_repo::delete_comment(&self.pool, comment_id).await? {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }

        post_repo::adjust_comment_count(&self.pool, comment.post_id, -1).await?;

        Ok(())
    }
}
