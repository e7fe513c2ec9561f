/// Reaction handlers - the toggle endpoint and the state check
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::ReactionKind;
use crate::services::ReactionService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionRequest {
    pub post_id: Uuid,
    #[serde(rename = "type", default = "default_reaction_kind")]
    pub kind: ReactionKind,
}

fn default_reaction_kind() -> ReactionKind {
    ReactionKind::Love
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReactionQuery {
    pub post_id: Option<Uuid>,
}

/// Toggle the caller's reaction on a post
pub async fn toggle_reaction(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<ToggleReactionRequest>,
) -> Result<HttpResponse> {
    let service = ReactionService::new((**pool).clone());
    let result = service.toggle(req.post_id, &user.0, req.kind).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Check whether the caller has reacted to a post
pub async fn check_reaction(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<CheckReactionQuery>,
) -> Result<HttpResponse> {
    let post_id = query
        .post_id
        .ok_or_else(|| AppError::BadRequest("postId required".to_string()))?;

    let service = ReactionService::new((**pool).clone());
    let existing = service.check(post_id, &user.0).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "isLiked": existing.is_some(),
        "type": existing,
    })))
}
