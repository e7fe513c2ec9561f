/// Comment handlers - HTTP endpoints for comment operations
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    pub post_id: Option<Uuid>,
}

/// Request body for creating a comment
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

/// Get comments for a post, author profiles included
pub async fn list_comments(
    pool: web::Data<PgPool>,
    query: web::Query<CommentListQuery>,
) -> Result<HttpResponse> {
    let post_id = query
        .post_id
        .ok_or_else(|| AppError::BadRequest("postId required".to_string()))?;

    let service = CommentService::new((**pool).clone());
    let comments = service.list_post_comments(post_id).await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// Create a comment (increments the post counter, notifies the author)
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = CommentService::new((**pool).clone());
    let comment = service
        .create_comment(req.post_id, &user.0, &req.text)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Delete an own comment (decrements the post counter)
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new((**pool).clone());
    service.delete_comment(*comment_id, &user.0).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Comment deleted" })))
}
