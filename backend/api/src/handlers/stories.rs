/// Story handlers - HTTP endpoints for time-bounded content
use crate::error::{AppError, Result};
use crate::handlers::media::read_multipart;
use crate::middleware::AuthUser;
use crate::models::Story;
use crate::services::media::{absolute_url, MediaStorage};
use crate::services::StoriesService;
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

fn with_absolute_url(mut story: Story, req: &HttpRequest) -> Story {
    let info = req.connection_info();
    story.url = absolute_url(info.scheme(), info.host(), &story.url);
    story
}

/// Recent stories (24-hour window)
pub async fn list_stories(req: HttpRequest, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = StoriesService::new((**pool).clone());
    let stories: Vec<Story> = service
        .list_recent()
        .await?
        .into_iter()
        .map(|story| with_absolute_url(story, &req))
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "stories": stories })))
}

/// Create a story from a multipart upload ("file" + optional "text")
pub async fn create_story(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    user: AuthUser,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let (file, fields) = read_multipart(&mut payload, storage.max_bytes()).await?;

    let file = file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let stored = storage
        .save(&file.file_name, &file.content_type, &file.data)
        .await?;

    let service = StoriesService::new((**pool).clone());
    let story = service
        .create_story(
            &user.0,
            &stored.relative_url,
            stored.kind.as_str(),
            fields.get("text").map(String::as_str),
        )
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "story": with_absolute_url(story, &req)
    })))
}

/// Update an own story's text and/or replace its file
pub async fn update_story(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    user: AuthUser,
    story_id: web::Path<Uuid>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let (file, fields) = read_multipart(&mut payload, storage.max_bytes()).await?;

    let stored = match &file {
        Some(file) => Some(
            storage
                .save(&file.file_name, &file.content_type, &file.data)
                .await?,
        ),
        None => None,
    };

    let service = StoriesService::new((**pool).clone());
    let (story, replaced_url) = service
        .update_story(
            *story_id,
            &user.0,
            fields.get("text").map(String::as_str),
            stored.as_ref().map(|s| s.relative_url.as_str()),
            stored.as_ref().map(|s| s.kind.as_str()),
        )
        .await?;

    // Old file removal is best-effort; the row already points elsewhere
    if let Some(old_url) = replaced_url {
        storage.remove_by_url(&old_url).await;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "story": with_absolute_url(story, &req)
    })))
}

/// Delete an own story and its stored file
pub async fn delete_story(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    user: AuthUser,
    story_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = StoriesService::new((**pool).clone());
    let story = service.delete_story(*story_id, &user.0).await?;

    storage.remove_by_url(&story.url).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Story deleted" })))
}
