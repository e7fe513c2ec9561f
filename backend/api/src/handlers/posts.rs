/// Post handlers - HTTP endpoints for post operations
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{MediaItem, MediaKind, Post, Visibility};
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Most media attachments per post
const MAX_MEDIA_ITEMS: usize = 10;

#[derive(Debug, Deserialize, Validate)]
pub struct MediaItemInput {
    #[validate(url)]
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(max = 5000))]
    pub text: Option<String>,
    pub media: Option<Vec<MediaItemInput>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(max = 5000))]
    pub text: Option<String>,
    pub media: Option<Vec<MediaItemInput>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub author_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub pagination: PaginationMeta,
}

fn convert_media(items: Option<Vec<MediaItemInput>>) -> Result<Vec<MediaItem>> {
    let items = items.unwrap_or_default();

    if items.len() > MAX_MEDIA_ITEMS {
        return Err(AppError::BadRequest(format!(
            "At most {} media items per post",
            MAX_MEDIA_ITEMS
        )));
    }

    let mut media = Vec::with_capacity(items.len());
    for item in items {
        item.validate()?;
        media.push(MediaItem {
            url: item.url,
            kind: item.kind,
        });
    }

    Ok(media)
}

/// Get feed posts or a single author's posts
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let service = PostService::new((**pool).clone());
    let (posts, total) = service
        .list_posts(query.author_id.as_deref(), limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts,
        pagination: PaginationMeta {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        },
    }))
}

/// Get a single post
pub async fn get_post(pool: web::Data<PgPool>, post_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service
        .get_post(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(post))
}

/// Create a new post
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let media = convert_media(req.media)?;
    let text = req.text.unwrap_or_default();

    let service = PostService::new((**pool).clone());
    let post = service
        .create_post(&user.0, &text, &media, Visibility::Public)
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Update an own post
pub async fn update_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let media = match req.media {
        Some(items) => Some(convert_media(Some(items))?),
        None => None,
    };

    let service = PostService::new((**pool).clone());
    let post = service
        .update_post(*post_id, &user.0, req.text.as_deref(), media.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete an own post
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.delete_post(*post_id, &user.0).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Post deleted" })))
}

/// Repost an existing post
pub async fn repost(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service.repost(*post_id, &user.0).await?;

    Ok(HttpResponse::Created().json(post))
}
