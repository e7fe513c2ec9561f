/// Message handlers - persisted DM history and the send fan-out
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::MessageService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[validate(length(min = 1))]
    pub to_id: String,
    #[validate(length(min = 1, max = 5000))]
    pub text: Option<String>,
    #[validate(url)]
    pub media_url: Option<String>,
}

/// List conversations: one entry per partner with the latest message
pub async fn list_conversations(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let service = MessageService::new((**pool).clone());
    let conversations = service.conversations(&user.0).await?;

    Ok(HttpResponse::Ok().json(conversations))
}

/// Full thread with one user; reading marks their messages as read
pub async fn get_thread(
    pool: web::Data<PgPool>,
    user: AuthUser,
    other: web::Path<String>,
) -> Result<HttpResponse> {
    let service = MessageService::new((**pool).clone());
    let messages = service.thread(&user.0, &other).await?;

    Ok(HttpResponse::Ok().json(messages))
}

/// Send a message (notifies the recipient)
pub async fn send_message(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = MessageService::new((**pool).clone());
    let message = service
        .send(
            &user.0,
            &req.to_id,
            req.text.as_deref(),
            req.media_url.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(message))
}

/// Delete an own sent message
pub async fn delete_message(
    pool: web::Data<PgPool>,
    user: AuthUser,
    message_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = MessageService::new((**pool).clone());
    service.delete(*message_id, &user.0).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Message deleted" })))
}
