/// Follow handlers - the two-step toggle protocol plus edge listings
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::FollowService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    #[validate(length(min = 1))]
    pub followee_id: String,
}

/// Follow a user; a second attempt conflicts and the client retries as
/// an unfollow.
pub async fn follow(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<FollowRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = FollowService::new((**pool).clone());
    service.follow(&user.0, &req.followee_id).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "message": "Followed successfully" })))
}

/// Unfollow a user; not-found when no edge exists.
pub async fn unfollow(
    pool: web::Data<PgPool>,
    user: AuthUser,
    followee_id: web::Path<String>,
) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    service.unfollow(&user.0, &followee_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Unfollowed successfully" })))
}

/// List a user's followers (full profiles)
pub async fn list_followers(
    pool: web::Data<PgPool>,
    subject: web::Path<String>,
) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    let followers = service.followers(&subject).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "followers": followers })))
}

/// List who a user follows (full profiles)
pub async fn list_following(
    pool: web::Data<PgPool>,
    subject: web::Path<String>,
) -> Result<HttpResponse> {
    let service = FollowService::new((**pool).clone());
    let following = service.following(&subject).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "following": following })))
}
