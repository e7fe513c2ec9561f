/// Notification handlers
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::NotificationService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

/// Latest notifications for the caller, actor profiles attached
pub async fn list_notifications(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let service = NotificationService::new((**pool).clone());
    let notifications = service.list(&user.0).await?;

    Ok(HttpResponse::Ok().json(notifications))
}

/// Mark one notification as read
pub async fn mark_read(
    pool: web::Data<PgPool>,
    user: AuthUser,
    notification_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = NotificationService::new((**pool).clone());
    service.mark_read(*notification_id, &user.0).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

/// Mark all notifications as read
pub async fn mark_all_read(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let service = NotificationService::new((**pool).clone());
    service.mark_all_read(&user.0).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}
